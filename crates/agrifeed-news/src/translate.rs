//! Headline translation.

use agrifeed_core::http::fetch_json;
use agrifeed_core::NetworkError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Translation request failed: {0}")]
    Network(#[from] NetworkError),
    #[error("Translation service returned no text")]
    Empty,
}

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate English `text` into `locale` (e.g. "hi-IN").
    async fn translate(&self, text: &str, locale: &str) -> Result<String, TranslateError>;
}

/// Whether headlines need translating for `locale`.
pub fn needs_translation(locale: &str) -> bool {
    !locale.is_empty() && !locale.starts_with("en")
}

/// Leaves text untouched.
#[derive(Debug, Clone, Default)]
pub struct NoopTranslator;

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, text: &str, _locale: &str) -> Result<String, TranslateError> {
        Ok(text.to_string())
    }
}

/// MyMemory-compatible translation client.
#[derive(Debug, Clone)]
pub struct MyMemoryTranslator {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    response_data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

impl MyMemoryTranslator {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    #[instrument(skip(self), level = "debug")]
    async fn translate(&self, text: &str, locale: &str) -> Result<String, TranslateError> {
        let url = format!(
            "{}/get?q={}&langpair=en|{}",
            self.base_url,
            urlencoding::encode(text),
            urlencoding::encode(locale)
        );

        let response: TranslateResponse = fetch_json(self.client.get(&url)).await?;

        response
            .response_data
            .and_then(|d| d.translated_text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(TranslateError::Empty)
    }
}
