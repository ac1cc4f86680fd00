//! Crop questions answered from local crop data.
//!
//! A question is checked for a greeting first, then for a known crop name.
//! When a crop is named, the topic rules below are tried top to bottom and
//! the first keyword hit picks the answer; with no topic the whole profile
//! is returned.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use agrifeed_core::CropConfig;
use serde::{Deserialize, Serialize};

pub const GREETING_REPLY: &str = "Hello! \u{1F44B} How can I help you with crops or farming today?";

const GREETINGS: [&str; 6] = ["hi", "hello", "hey", "how are you", "good morning", "good evening"];

/// Growing requirements for one crop, as free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropProfile {
    pub ideal_temperature: String,
    pub soil_type: String,
    pub water_requirement: String,
    pub rainfall_requirement: String,
    pub growth_duration: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Crop {
    pub name: String,
    pub profile: CropProfile,
}

/// What a question resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum CropAnswer {
    Greeting,
    Fact(String),
    Profile(Crop),
}

impl CropAnswer {
    /// Where the answer came from: `casual` or `crop_data`.
    pub fn source(&self) -> &'static str {
        match self {
            Self::Greeting => "casual",
            Self::Fact(_) | Self::Profile(_) => "crop_data",
        }
    }
}

impl fmt::Display for CropAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greeting => f.write_str(GREETING_REPLY),
            Self::Fact(text) => f.write_str(text),
            Self::Profile(crop) => {
                let p = &crop.profile;
                writeln!(f, "{}", crop.name)?;
                writeln!(f, "  Ideal temperature: {}", p.ideal_temperature)?;
                writeln!(f, "  Soil: {}", p.soil_type)?;
                writeln!(f, "  Water: {}", p.water_requirement)?;
                writeln!(f, "  Rainfall: {}", p.rainfall_requirement)?;
                write!(f, "  Growth duration: {}", p.growth_duration)
            }
        }
    }
}

struct TopicRule {
    keywords: &'static [&'static str],
    answer: fn(&str, &CropProfile) -> String,
}

static TOPICS: [TopicRule; 5] = [
    TopicRule {
        keywords: &["temperature"],
        answer: temperature_answer,
    },
    TopicRule {
        keywords: &["soil"],
        answer: soil_answer,
    },
    TopicRule {
        keywords: &["water"],
        answer: water_answer,
    },
    TopicRule {
        keywords: &["rain", "rainfall"],
        answer: rainfall_answer,
    },
    TopicRule {
        keywords: &["duration", "time"],
        answer: duration_answer,
    },
];

fn temperature_answer(crop: &str, p: &CropProfile) -> String {
    format!("The ideal temperature for {} is {}.", crop, p.ideal_temperature)
}

fn soil_answer(crop: &str, p: &CropProfile) -> String {
    format!("{} grows best in {}.", crop, p.soil_type)
}

fn water_answer(crop: &str, p: &CropProfile) -> String {
    format!("{} requires {} water.", crop, p.water_requirement)
}

fn rainfall_answer(crop: &str, p: &CropProfile) -> String {
    format!("{} needs {} rainfall.", crop, p.rainfall_requirement)
}

fn duration_answer(crop: &str, p: &CropProfile) -> String {
    format!("{} takes around {} to grow.", crop, p.growth_duration)
}

#[derive(Debug, thiserror::Error)]
pub enum CropDataError {
    #[error("Failed to read crop data: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse crop data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The crops questions can be answered about, in lookup order.
#[derive(Debug, Clone)]
pub struct CropBook {
    crops: Vec<Crop>,
}

impl CropBook {
    pub fn new(crops: Vec<Crop>) -> Self {
        Self { crops }
    }

    /// Load a JSON object of crop name to profile. Crops are looked up in
    /// name order.
    pub fn from_file(path: &Path) -> Result<Self, CropDataError> {
        let contents = std::fs::read_to_string(path)?;
        let table: BTreeMap<String, CropProfile> = serde_json::from_str(&contents)?;
        Ok(Self::new(
            table
                .into_iter()
                .map(|(name, profile)| Crop { name, profile })
                .collect(),
        ))
    }

    /// The configured data file, or the built-in table when none is set or
    /// it cannot be loaded.
    pub fn from_config(config: &CropConfig) -> Self {
        let Some(path) = &config.data_file else {
            return Self::builtin();
        };
        match Self::from_file(path) {
            Ok(book) => {
                tracing::info!("Loaded {} crops from {}", book.len(), path.display());
                book
            }
            Err(e) => {
                tracing::warn!("{}; using built-in crop data", e);
                Self::builtin()
            }
        }
    }

    pub fn builtin() -> Self {
        let crop = |name: &str, temp: &str, soil: &str, water: &str, rain: &str, days: &str| Crop {
            name: name.to_string(),
            profile: CropProfile {
                ideal_temperature: temp.to_string(),
                soil_type: soil.to_string(),
                water_requirement: water.to_string(),
                rainfall_requirement: rain.to_string(),
                growth_duration: days.to_string(),
            },
        };
        Self::new(vec![
            crop("Rice", "20-35°C", "clayey or loamy soil", "high", "150-300 cm", "3-6 months"),
            crop("Wheat", "10-25°C", "well-drained loamy soil", "moderate", "50-100 cm", "4-5 months"),
            crop("Maize", "18-27°C", "fertile well-drained loam", "moderate", "50-100 cm", "3-4 months"),
            crop("Cotton", "21-30°C", "black soil", "moderate", "50-100 cm", "5-6 months"),
            crop("Sugarcane", "21-27°C", "deep loamy soil", "high", "75-150 cm", "10-18 months"),
            crop("Tomato", "20-27°C", "well-drained sandy loam", "moderate", "60-100 cm", "2-3 months"),
            crop("Onion", "13-24°C", "friable loamy soil", "low to moderate", "65-75 cm", "4-5 months"),
        ])
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    /// Answer from local data, or `None` when the question names no known
    /// crop and is not a greeting.
    pub fn answer(&self, question: &str) -> Option<CropAnswer> {
        let lowered = question.to_lowercase();
        let words = words(&lowered);

        if GREETINGS.iter().any(|g| contains_phrase(&words, g)) {
            return Some(CropAnswer::Greeting);
        }

        let crop = self
            .crops
            .iter()
            .find(|c| contains_phrase(&words, &c.name.to_lowercase()))?;

        let answer = TOPICS
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
            .map(|rule| CropAnswer::Fact((rule.answer)(&crop.name, &crop.profile)))
            .unwrap_or_else(|| CropAnswer::Profile(crop.clone()));
        Some(answer)
    }
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Whole-word match, so "hi" does not fire inside "which".
fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let phrase = self::words(phrase);
    !phrase.is_empty() && words.windows(phrase.len()).any(|w| w == phrase.as_slice())
}
