use std::collections::HashSet;

use agrifeed_core::Config;
use agrifeed_location::Location;
use reqwest::Client;

use crate::client::NewsClient;
use crate::query::build_queries;
use crate::translate::{needs_translation, MyMemoryTranslator, NoopTranslator, Translator};
use crate::types::{NewsCard, NewsFeed, RawArticle};

/// Runs the location-scoped searches and assembles the feed.
pub struct NewsAggregator {
    client: NewsClient,
    translator: Box<dyn Translator>,
    locale: String,
    max_articles: usize,
    default_country: String,
}

impl NewsAggregator {
    pub fn new(config: &Config, client: Client) -> Self {
        let locale = config.news.viewer_locale.clone();
        let translator: Box<dyn Translator> = if needs_translation(&locale) {
            Box::new(MyMemoryTranslator::new(
                client.clone(),
                &config.services.translate_url,
            ))
        } else {
            Box::new(NoopTranslator)
        };

        Self {
            client: NewsClient::from_config(config, client),
            translator,
            locale,
            max_articles: config.news.max_articles,
            default_country: config.location.default_country.clone(),
        }
    }

    pub fn with_translator(mut self, translator: Box<dyn Translator>, locale: &str) -> Self {
        self.translator = translator;
        self.locale = locale.to_string();
        self
    }

    /// Fetch, dedupe, classify and translate. Failed queries are skipped.
    pub async fn fetch(&self, location: &Location) -> NewsFeed {
        let term = location.search_term(&self.default_country);
        let mut collected = Vec::new();

        // Sequential so dedup keeps fetch order
        for query in build_queries(&term) {
            match self.client.search(&query).await {
                Ok(articles) => collected.extend(articles),
                Err(e) => tracing::warn!("News query failed: {}", e),
            }
        }

        if collected.is_empty() {
            tracing::info!("No farming news for '{}'", term);
            return NewsFeed::Empty;
        }

        let total = collected.len();
        let mut cards = Vec::new();
        for raw in dedup_by_url(collected, self.max_articles) {
            let mut card = NewsCard::from_raw(raw);
            card.title = self.translate_title(&card.original_title).await;
            cards.push(card);
        }

        tracing::info!(
            "News for '{}': {} fetched, {} shown",
            term,
            total,
            cards.len()
        );
        NewsFeed::Articles(cards)
    }

    async fn translate_title(&self, title: &str) -> String {
        if !needs_translation(&self.locale) {
            return title.to_string();
        }
        match self.translator.translate(title, &self.locale).await {
            Ok(translated) if !translated.trim().is_empty() => translated,
            Ok(_) => title.to_string(),
            Err(e) => {
                tracing::debug!("Keeping untranslated title: {}", e);
                title.to_string()
            }
        }
    }
}

/// Keep the first article seen for each url, in order, up to `max`.
/// Articles without a url share one key.
pub fn dedup_by_url(articles: Vec<RawArticle>, max: usize) -> Vec<RawArticle> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|a| seen.insert(a.url.clone().unwrap_or_default()))
        .take(max)
        .collect()
}
