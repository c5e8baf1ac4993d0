//! Groq provider
//!
//! LLM-backed translation through Groq's OpenAI-compatible chat API. The
//! system prompt pins the `<xN/>` placeholder tokens so the model copies
//! them through verbatim.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use super::TranslationProvider;
use crate::error::{TranslateError, TranslateResult};

const BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Groq chat-completions client
#[derive(Clone)]
pub struct GroqProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GroqProvider {
    pub fn new(api_key: String, model: Option<String>) -> TranslateResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslateError::Config(
                "Groq API key cannot be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TranslateError::Provider(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client,
        })
    }
}

impl std::fmt::Debug for GroqProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqProvider")
            .field("api_key", &"***")
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl TranslationProvider for GroqProvider {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslateResult<String> {
        let system = format!(
            "Translate from {} to {}. Return ONLY the translation. IMPORTANT: \
             preserve any XML tags like <x1/>, <x2/> etc. exactly as they are, \
             do not translate or modify them.",
            source_lang, target_lang
        );
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": text },
            ],
            "temperature": 0.3,
            "max_tokens": 512,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", BASE_URL))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(TranslateError::Provider(format!(
                "Groq returned {}: {}",
                status, detail
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Provider(format!("invalid response: {}", e)))?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| {
                TranslateError::Provider("response missing 'choices[0].message.content'".to_string())
            })
    }

    async fn test_connection(&self) -> bool {
        self.client
            .get(format!("{}/models", BASE_URL))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn name(&self) -> &str {
        "Groq (14.4k req/day)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_key() {
        let result = GroqProvider::new(String::new(), None);
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_default_model() {
        let provider = GroqProvider::new("key".to_string(), None).unwrap();
        assert_eq!(provider.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_model_override() {
        let provider =
            GroqProvider::new("key".to_string(), Some("mixtral-8x7b".to_string())).unwrap();
        assert_eq!(provider.model, "mixtral-8x7b");
    }

    #[test]
    fn test_debug_masks_key() {
        let provider = GroqProvider::new("secret".to_string(), None).unwrap();
        let debug = format!("{:?}", provider);
        assert!(debug.contains("***"));
        assert!(!debug.contains("secret"));
    }
}
