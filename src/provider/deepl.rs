//! DeepL Free API provider
//!
//! Best translation quality of the free tiers, limited to 500k characters a
//! month. DeepL uses its own target-language codes and does not cover the
//! whole supported-language table; untranslatable targets fail per entry and
//! the batch moves on.

use async_trait::async_trait;
use std::time::Duration;

use super::TranslationProvider;
use crate::error::{TranslateError, TranslateResult};

const BASE_URL: &str = "https://api-free.deepl.com/v2";

/// Map a language code to DeepL's target code
///
/// Hebrew, Croatian and Icelandic are not offered by DeepL.
fn deepl_target(code: &str) -> Option<&'static str> {
    let target = match code {
        "bg" => "BG",
        "cs" => "CS",
        "da" => "DA",
        "de" => "DE",
        "el" => "EL",
        "en" => "EN-US",
        "es" => "ES",
        "et" => "ET",
        "fi" => "FI",
        "fr" => "FR",
        "hu" => "HU",
        "it" => "IT",
        "ja" => "JA",
        "ko" => "KO",
        "nl" => "NL",
        "no" => "NB",
        "pl" => "PL",
        "pt-BR" => "PT-BR",
        "pt" => "PT-PT",
        "ro" => "RO",
        "ru" => "RU",
        "sk" => "SK",
        "sv" => "SV",
        "tr" => "TR",
        "uk" => "UK",
        "zh" => "ZH",
        _ => return None,
    };
    Some(target)
}

/// DeepL Free HTTP client
#[derive(Clone)]
pub struct DeepLFreeProvider {
    api_key: String,
    client: reqwest::Client,
}

impl DeepLFreeProvider {
    pub fn new(api_key: String) -> TranslateResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslateError::Config(
                "DeepL API key cannot be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TranslateError::Provider(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { api_key, client })
    }
}

impl std::fmt::Debug for DeepLFreeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepLFreeProvider")
            .field("api_key", &"***")
            .finish()
    }
}

#[async_trait]
impl TranslationProvider for DeepLFreeProvider {
    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        target_lang: &str,
    ) -> TranslateResult<String> {
        let target = deepl_target(target_lang).ok_or_else(|| {
            TranslateError::Provider(format!(
                "language '{}' is not supported by DeepL",
                target_lang
            ))
        })?;

        // tag_handling=xml keeps the <xN/> placeholder tokens opaque.
        let form = [
            ("text", text),
            ("source_lang", "EN"),
            ("target_lang", target),
            ("tag_handling", "xml"),
            ("ignore_tags", "x"),
        ];

        let response = self
            .client
            .post(format!("{}/translate", BASE_URL))
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .form(&form)
            .send()
            .await?;

        if response.status().as_u16() == 456 {
            return Err(TranslateError::Provider(
                "DeepL quota exceeded (500k chars/month)".to_string(),
            ));
        }
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(TranslateError::Provider(format!(
                "DeepL returned {}: {}",
                status, detail
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Provider(format!("invalid response: {}", e)))?;

        payload["translations"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                TranslateError::Provider("response missing 'translations[0].text'".to_string())
            })
    }

    async fn test_connection(&self) -> bool {
        self.client
            .get(format!("{}/usage", BASE_URL))
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn name(&self) -> &str {
        "DeepL Free (500k chars/month)"
    }
}
