use agrifeed_core::http::fetch_json;
use agrifeed_core::Config;
use reqwest::Client;
use tracing::instrument;

use crate::types::{EverythingResponse, NewsError, RawArticle};

/// NewsAPI-compatible search client.
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
    page_size: u32,
}

impl NewsClient {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            language: "en".to_string(),
            page_size: 10,
        }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new(
            client,
            &config.services.news_api_url,
            &config.services.news_api_key,
        )
        .with_language(&config.news.language)
        .with_page_size(config.news.page_size)
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Newest-first search across all sources.
    #[instrument(skip(self), level = "info")]
    pub async fn search(&self, query: &str) -> Result<Vec<RawArticle>, NewsError> {
        let url = format!("{}/v2/everything", self.base_url);
        let page_size = self.page_size.to_string();

        let response: EverythingResponse = fetch_json(self.client.get(&url).query(&[
            ("q", query),
            ("language", self.language.as_str()),
            ("sortBy", "publishedAt"),
            ("pageSize", page_size.as_str()),
            ("apiKey", self.api_key.as_str()),
        ]))
        .await?;

        if response.status.as_deref() == Some("error") {
            return Err(NewsError::Api {
                code: response.code.unwrap_or_default(),
                message: response.message.unwrap_or_default(),
            });
        }

        tracing::debug!("News search returned {} articles", response.articles.len());
        Ok(response.articles)
    }
}
