//! OpenAI provider
//!
//! Paid-tier translation through OpenAI's chat completions API. Same wire
//! shape as the Groq backend; the system prompt pins the `<xN/>` placeholder
//! tokens so the model copies them through verbatim.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use super::TranslationProvider;
use crate::error::{TranslateError, TranslateResult};

const BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI chat-completions client
#[derive(Clone)]
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    name: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: Option<String>) -> TranslateResult<Self> {
        if api_key.trim().is_empty() {
            return Err(TranslateError::Config(
                "OpenAI API key cannot be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TranslateError::Provider(format!("failed to create HTTP client: {}", e)))?;
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self {
            api_key,
            name: format!("OpenAI ({})", model),
            model,
            client,
        })
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"***")
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl TranslationProvider for OpenAiProvider {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslateResult<String> {
        let system = format!(
            "You are a professional translator specializing in software \
             localization. Translate the following text from {} to {}. Use \
             natural, contextual translation appropriate for a software UI. \
             IMPORTANT: preserve any XML tags like <x1/>, <x2/> etc. exactly \
             as they are, do not translate or modify them. Return ONLY the \
             translated text, nothing else.",
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
                "OpenAI returned {}: {}",
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
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty_key() {
        let result = OpenAiProvider::new(String::new(), None);
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_default_model() {
        let provider = OpenAiProvider::new("key".to_string(), None).unwrap();
        assert_eq!(provider.model, DEFAULT_MODEL);
        assert_eq!(provider.name(), "OpenAI (gpt-4o-mini)");
    }

    #[test]
    fn test_model_override() {
        let provider = OpenAiProvider::new("key".to_string(), Some("gpt-4o".to_string())).unwrap();
        assert_eq!(provider.model, "gpt-4o");
        assert_eq!(provider.name(), "OpenAI (gpt-4o)");
    }

    #[test]
    fn test_debug_masks_key() {
        let provider = OpenAiProvider::new("secret".to_string(), None).unwrap();
        let debug = format!("{:?}", provider);
        assert!(debug.contains("***"));
        assert!(!debug.contains("secret"));
    }
}
