//! Keyword classification of articles.
//!
//! The table is checked in order against the lowercased text and the first
//! category with a matching keyword wins. Keywords match as substrings.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    StormAlert,
    FloodWarning,
    DroughtAlert,
    ColdWeather,
    HeatAlert,
    GovSchemes,
    MarketNews,
    AgriTech,
    PestAlert,
    FarmingNews,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::StormAlert => "Storm Alert",
            Self::FloodWarning => "Flood Warning",
            Self::DroughtAlert => "Drought Alert",
            Self::ColdWeather => "Cold Weather",
            Self::HeatAlert => "Heat Alert",
            Self::GovSchemes => "Gov. Schemes",
            Self::MarketNews => "Market News",
            Self::AgriTech => "AgriTech",
            Self::PestAlert => "Pest Alert",
            Self::FarmingNews => "Farming News",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::StormAlert => "\u{1F32A}\u{FE0F}",
            Self::FloodWarning => "\u{1F30A}",
            Self::DroughtAlert => "\u{2600}\u{FE0F}",
            Self::ColdWeather => "\u{2744}\u{FE0F}",
            Self::HeatAlert => "\u{1F321}\u{FE0F}",
            Self::GovSchemes => "\u{1F3DB}\u{FE0F}",
            Self::MarketNews => "\u{1F4B0}",
            Self::AgriTech => "\u{1F680}",
            Self::PestAlert => "\u{1F41B}",
            Self::FarmingNews => "\u{1F33E}",
        }
    }

    /// Categories highlighted as alerts: storms and anything labelled "Alert".
    pub fn is_alert(&self) -> bool {
        matches!(
            self,
            Self::StormAlert | Self::DroughtAlert | Self::HeatAlert | Self::PestAlert
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}

static CATEGORY_KEYWORDS: [(Category, &[&str]); 9] = [
    (
        Category::StormAlert,
        &["storm", "cyclone", "hurricane", "typhoon", "tornado"],
    ),
    (
        Category::FloodWarning,
        &["flood", "heavy rain", "monsoon", "deluge"],
    ),
    (
        Category::DroughtAlert,
        &["drought", "water shortage", "dry spell"],
    ),
    (Category::ColdWeather, &["frost", "cold wave", "freeze"]),
    (
        Category::HeatAlert,
        &["heatwave", "extreme heat", "high temperature"],
    ),
    (
        Category::GovSchemes,
        &["scheme", "subsidy", "government", "policy", "loan"],
    ),
    (
        Category::MarketNews,
        &["price", "market", "trading", "commodity"],
    ),
    (
        Category::AgriTech,
        &["technology", "innovation", "digital", "app"],
    ),
    (Category::PestAlert, &["disease", "pest", "fungus", "insect"]),
];

/// Classify an article from its title and description.
pub fn classify(title: &str, description: &str) -> Category {
    let text = format!("{} {}", title, description).to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::FarmingNews)
}
