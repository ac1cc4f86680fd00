//! Rendering of dashboard cards.
//!
//! The render functions are pure and return text; [`TerminalPresenter`]
//! writes them to any `Write` sink.

use std::io::Write;

use agrifeed_location::Location;
use agrifeed_news::{NewsCard, NewsFeed};
use agrifeed_weather::AdvisoryReport;
use chrono::{DateTime, Local, TimeZone, Utc};
use parking_lot::Mutex;

/// Display surface for dashboard updates.
pub trait Presenter: Send + Sync {
    fn show_location_badge(&self, location: &Location);
    fn show_advisory(&self, report: &AdvisoryReport);
    fn show_news(&self, feed: &NewsFeed);
    fn show_date(&self, date_line: &str);
}

/// Date line in `Mon, Jan 5` form.
pub fn format_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%a, %b %-d").to_string()
}

pub fn render_location_badge(location: &Location) -> String {
    format!("\u{1F4CD} {}", location.badge_text())
}

/// Weather card: header, message, and the six stats when a reading exists.
pub fn render_weather_card(report: &AdvisoryReport) -> String {
    let advisory = &report.advisory;
    let mut out = String::new();

    match &report.reading {
        Some(reading) => {
            out.push_str(&format!(
                "{} Weather Alert [{}]\n",
                advisory.icon(),
                advisory.level.label()
            ));
            if !reading.location_name.is_empty() {
                out.push_str(&format!("   {}\n", reading.location_name));
            }
            out.push_str(&format!("\n{}\n\n", advisory.message));

            let pressure = reading
                .pressure
                .map(|p| format!("{} hPa", p))
                .unwrap_or_else(|| "-- hPa".to_string());
            let stats = [
                ("Temperature", format!("{}°C", reading.temp)),
                ("Feels Like", format!("{}°C", reading.feels_like)),
                ("Humidity", format!("{}%", reading.humidity)),
                ("Wind Speed", format!("{} km/h", reading.wind_speed_kmh)),
                ("Pressure", pressure),
                ("Condition", reading.description.clone()),
            ];
            for (label, value) in stats {
                out.push_str(&format!("   {:<12} {}\n", label, value));
            }
        }
        None => {
            out.push_str(&format!(
                "{} Weather Service [{}]\n",
                advisory.icon(),
                advisory.level.label()
            ));
            out.push_str("   Connection Issue\n");
            out.push_str(&format!("\n{}\n", advisory.message));
        }
    }

    out
}

fn render_news_card(card: &NewsCard, now: DateTime<Utc>) -> String {
    let marker = if card.category.is_alert() { "!" } else { " " };
    format!(
        "{}[{}]\n  {}\n  {}\n  {} | {}\n  Read Full Article: {}\n",
        marker,
        card.category,
        card.title,
        card.preview(),
        card.source,
        card.time_ago(now),
        card.link
    )
}

/// News cards in feed order, or the "No News Available" card.
pub fn render_news(feed: &NewsFeed, now: DateTime<Utc>) -> String {
    match feed {
        NewsFeed::Empty => "\u{2139}\u{FE0F} No News Available\n\
             No farming news found for your city at the moment. Please check back later.\n"
            .to_string(),
        NewsFeed::Articles(cards) => cards
            .iter()
            .map(|card| render_news_card(card, now))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Writes plain-text cards to a terminal or any other sink.
pub struct TerminalPresenter<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalPresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn show_location_badge(&self, location: &Location) {
        self.emit(&render_location_badge(location));
    }

    fn show_advisory(&self, report: &AdvisoryReport) {
        self.emit(&render_weather_card(report));
    }

    fn show_news(&self, feed: &NewsFeed) {
        self.emit(&render_news(feed, Utc::now()));
    }

    fn show_date(&self, date_line: &str) {
        self.emit(date_line);
    }
}

/// Current local date line.
pub fn local_date_line() -> String {
    format_date(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrifeed_news::RawArticle;
    use agrifeed_weather::{error_advisory, select_advisory, WeatherReading};

    fn reading() -> WeatherReading {
        WeatherReading {
            temp: 28,
            feels_like: 30,
            humidity: 60,
            wind_speed_kmh: 12,
            pressure: None,
            description: "scattered clouds".to_string(),
            location_name: "Nashik".to_string(),
        }
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).single();
        assert_eq!(date.map(|d| format_date(&d)).as_deref(), Some("Mon, Jan 5"));
    }

    #[test]
    fn test_weather_card_stats() {
        let reading = reading();
        let report = AdvisoryReport {
            advisory: select_advisory(&reading),
            reading: Some(reading),
            fetched_at: Utc::now(),
        };
        let card = render_weather_card(&report);

        assert!(card.contains("Weather Alert [Favorable Conditions]"));
        assert!(card.contains("Nashik"));
        for label in ["Temperature", "Feels Like", "Humidity", "Wind Speed", "Pressure", "Condition"] {
            assert!(card.contains(label), "missing {}", label);
        }
        assert!(card.contains("12 km/h"));
        assert!(card.contains("-- hPa"));
    }

    #[test]
    fn test_error_card() {
        let report = AdvisoryReport {
            advisory: error_advisory("Weather service unavailable"),
            reading: None,
            fetched_at: Utc::now(),
        };
        let card = render_weather_card(&report);
        assert!(card.contains("Weather Service [Error]"));
        assert!(card.contains("Connection Issue"));
        assert!(!card.contains("Temperature"));
    }

    #[test]
    fn test_empty_news_card() {
        let text = render_news(&NewsFeed::Empty, Utc::now());
        assert!(text.contains("No News Available"));
        assert!(text.contains(
            "No farming news found for your city at the moment. Please check back later."
        ));
    }

    #[test]
    fn test_news_cards_mark_alerts() {
        let storm = NewsCard::from_raw(RawArticle {
            title: Some("Cyclone nears coast".into()),
            url: Some("https://n/a".into()),
            ..Default::default()
        });
        let harvest = NewsCard::from_raw(RawArticle {
            title: Some("Wheat harvest begins".into()),
            ..Default::default()
        });
        let text = render_news(&NewsFeed::Articles(vec![storm, harvest]), Utc::now());
        let lines: Vec<_> = text.lines().collect();

        assert!(lines[0].starts_with("![") && lines[0].contains("Storm Alert"));
        assert!(text.contains("Read Full Article: https://n/a"));
        assert!(text.contains(" [\u{1F33E} Farming News]"));
        assert!(text.contains("Unknown | Just now"));
    }

    #[test]
    fn test_terminal_presenter_writes() {
        let presenter = TerminalPresenter::new(Vec::new());
        presenter.show_location_badge(&Location {
            city: Some("Pune".into()),
            state: Some("Maharashtra".into()),
            ..Default::default()
        });
        presenter.show_date("Mon, Jan 5");

        let written = String::from_utf8(presenter.into_inner()).unwrap_or_default();
        assert!(written.contains("Pune, Maharashtra"));
        assert!(written.ends_with("Mon, Jan 5\n"));
    }
}
