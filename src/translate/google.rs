//! Translation through the public Google Translate web endpoint.
//!
//! The endpoint needs no API key and answers with a nested JSON array whose
//! first element holds the translated sentence fragments.

use crate::error::{Result, TunefetchError};
use crate::translate::Translator;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";

pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the translator at a different host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

/// Join the translated fragments of a `translate_a/single` response.
fn parse_response(body: &Value) -> Option<String> {
    let fragments = body.get(0)?.as_array()?;
    let text: String = fragments
        .iter()
        .filter_map(|fragment| fragment.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        debug!("Translating {:?} to {}", text, target_lang);

        let url = format!("{}/translate_a/single", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TunefetchError::Translation(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TunefetchError::Translation(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(TunefetchError::Translation(format!(
                "Translate API error ({}): {}",
                status, body
            )));
        }

        let json: Value = serde_json::from_str(&body)?;
        parse_response(&json).ok_or_else(|| {
            TunefetchError::Translation("Response contained no translation".to_string())
        })
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
