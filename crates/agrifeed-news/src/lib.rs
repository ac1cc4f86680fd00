//! Agriculture news for AgriFeed
//!
//! Searches a NewsAPI-compatible service with location-scoped queries,
//! deduplicates and caps the results, tags each article with a category and
//! optionally translates headlines for the viewer.

pub mod aggregator;
pub mod classify;
pub mod client;
pub mod query;
pub mod translate;
pub mod types;

pub use aggregator::{dedup_by_url, NewsAggregator};
pub use classify::{classify, Category};
pub use client::NewsClient;
pub use query::build_queries;
pub use translate::{MyMemoryTranslator, NoopTranslator, TranslateError, Translator};
pub use types::*;
