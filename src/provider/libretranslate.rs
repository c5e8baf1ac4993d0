//! LibreTranslate provider
//!
//! Open-source translation API, usable against the public instance or any
//! self-hosted deployment. No API key required.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use super::TranslationProvider;
use crate::error::{TranslateError, TranslateResult};
use crate::languages::api_lang_code;

/// Public LibreTranslate instance
pub const DEFAULT_URL: &str = "https://libretranslate.com";

/// LibreTranslate HTTP client
#[derive(Debug, Clone)]
pub struct LibreTranslateProvider {
    url: String,
    client: reqwest::Client,
}

impl LibreTranslateProvider {
    /// Create a provider pointed at `url` (trailing slashes stripped)
    pub fn new(url: String) -> TranslateResult<Self> {
        if url.trim().is_empty() {
            return Err(TranslateError::Config(
                "LibreTranslate URL cannot be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TranslateError::Provider(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslateResult<String> {
        let body = json!({
            "q": text,
            "source": api_lang_code(source_lang),
            "target": api_lang_code(target_lang),
            "format": "text",
        });

        let response = self
            .client
            .post(format!("{}/translate", self.url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(TranslateError::Provider(format!(
                "LibreTranslate returned {}: {}",
                status, detail
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Provider(format!("invalid response: {}", e)))?;

        payload["translatedText"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                TranslateError::Provider("response missing 'translatedText'".to_string())
            })
    }

    async fn test_connection(&self) -> bool {
        self.client
            .get(format!("{}/languages", self.url))
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn name(&self) -> &str {
        "LibreTranslate"
    }
}
