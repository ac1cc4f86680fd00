use agrifeed_core::NetworkError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::Category;

/// Image shown when an article has none
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x200?text=Farming+News";

/// Characters of description shown on a card before the ellipsis
pub const PREVIEW_CHARS: usize = 120;

/// Raw `/v2/everything` response
#[derive(Debug, Clone, Deserialize)]
pub struct EverythingResponse {
    pub status: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// One article as the search service returns it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub url_to_image: Option<String>,
    pub source: Option<ArticleSource>,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArticleSource {
    pub name: Option<String>,
}

/// A display-ready article.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsCard {
    pub category: Category,
    /// Headline in the viewer's language when translation succeeded
    pub title: String,
    pub original_title: String,
    pub description: String,
    pub source: String,
    pub image: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl NewsCard {
    /// Apply display defaults and classify. The headline starts untranslated.
    pub fn from_raw(raw: RawArticle) -> Self {
        let title = non_empty(raw.title).unwrap_or_else(|| "No title".to_string());
        let description =
            non_empty(raw.description).unwrap_or_else(|| "No description available".to_string());
        let category = crate::classify::classify(&title, &description);

        Self {
            category,
            original_title: title.clone(),
            title,
            description,
            source: non_empty(raw.source.and_then(|s| s.name))
                .unwrap_or_else(|| "Unknown".to_string()),
            image: non_empty(raw.url_to_image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            link: non_empty(raw.url).unwrap_or_else(|| "#".to_string()),
            published_at: raw
                .published_at
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Description cut to [`PREVIEW_CHARS`] characters, with "..." when cut.
    pub fn preview(&self) -> String {
        if self.description.chars().count() > PREVIEW_CHARS {
            let cut: String = self.description.chars().take(PREVIEW_CHARS).collect();
            format!("{}...", cut)
        } else {
            self.description.clone()
        }
    }

    /// Relative publish time as of `now`. A missing timestamp reads as now.
    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        time_ago(self.published_at.unwrap_or(now), now)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// "N years ago" down to "N minutes ago", else "Just now". Each unit is used
/// once more than one whole unit has passed.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const UNITS: [(f64, &str); 5] = [
        (31_536_000.0, "years"),
        (2_592_000.0, "months"),
        (86_400.0, "days"),
        (3_600.0, "hours"),
        (60.0, "minutes"),
    ];

    let seconds = (now - then).num_seconds() as f64;
    for (unit_secs, name) in UNITS {
        let interval = seconds / unit_secs;
        if interval > 1.0 {
            return format!("{} {} ago", interval.floor() as i64, name);
        }
    }
    "Just now".to_string()
}

/// What the news panel shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NewsFeed {
    Articles(Vec<NewsCard>),
    /// Every query failed or came back empty
    Empty,
}

impl NewsFeed {
    pub fn articles(&self) -> &[NewsCard] {
        match self {
            Self::Articles(cards) => cards,
            Self::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// News search errors
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("News request failed: {0}")]
    Network(#[from] NetworkError),
    #[error("News service error {code}: {message}")]
    Api { code: String, message: String },
}
