//! Dashboard state and refresh cycles.
//!
//! The session location, the latest advisory and the latest news feed live
//! behind one `RwLock`. Only location resolution writes the location. The
//! lock is never held across an await.

use std::sync::Arc;

use agrifeed_core::Config;
use agrifeed_location::{Location, LocationResolver};
use agrifeed_news::{NewsAggregator, NewsFeed};
use agrifeed_weather::{AdvisoryReport, WeatherAdvisor};
use parking_lot::RwLock;
use reqwest::Client;

use crate::presenter::{local_date_line, Presenter};

/// Snapshot of what the dashboard currently shows.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub location: Option<Location>,
    pub report: Option<AdvisoryReport>,
    pub news: Option<NewsFeed>,
}

pub struct Dashboard {
    resolver: LocationResolver,
    advisor: WeatherAdvisor,
    news: NewsAggregator,
    presenter: Arc<dyn Presenter>,
    state: RwLock<DashboardState>,
}

impl Dashboard {
    /// Wire every component from configuration over one shared client.
    pub fn new(config: &Config, client: Client, presenter: Arc<dyn Presenter>) -> Self {
        Self::from_parts(
            LocationResolver::new(config, client.clone()),
            WeatherAdvisor::new(config, client.clone()),
            NewsAggregator::new(config, client),
            presenter,
        )
    }

    pub fn from_parts(
        resolver: LocationResolver,
        advisor: WeatherAdvisor,
        news: NewsAggregator,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            resolver,
            advisor,
            news,
            presenter,
            state: RwLock::new(DashboardState::default()),
        }
    }

    /// Run the fallback chain and merge the result into the session location.
    pub async fn refresh_location(&self) -> Location {
        let resolved = self.resolver.resolve().await;
        let location = {
            let mut state = self.state.write();
            let session = state.location.get_or_insert_with(Location::default);
            session.merge(resolved);
            session.clone()
        };
        self.presenter.show_location_badge(&location);
        location
    }

    /// Advise on the stored location, resolving one first if none exists.
    pub async fn weather_cycle(&self) -> AdvisoryReport {
        let location = match self.location() {
            Some(location) => location,
            None => self.refresh_location().await,
        };

        let report = self.advisor.advise(&location).await;
        self.state.write().report = Some(report.clone());
        self.presenter.show_advisory(&report);
        report
    }

    /// Re-resolve the location, then fetch news for it.
    pub async fn news_cycle(&self) -> NewsFeed {
        let location = self.refresh_location().await;

        let feed = self.news.fetch(&location).await;
        self.state.write().news = Some(feed.clone());
        self.presenter.show_news(&feed);
        feed
    }

    pub fn clock_tick(&self) {
        self.presenter.show_date(&local_date_line());
    }

    pub fn location(&self) -> Option<Location> {
        self.state.read().location.clone()
    }

    pub fn latest_report(&self) -> Option<AdvisoryReport> {
        self.state.read().report.clone()
    }

    pub fn latest_news(&self) -> Option<NewsFeed> {
        self.state.read().news.clone()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.read().clone()
    }
}
