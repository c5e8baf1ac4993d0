//! Translation provider capability and registry
//!
//! The engine is agnostic to which backend performs the actual translation.
//! Every backend implements [`TranslationProvider`]; the registry maps a
//! configuration key to a constructor so callers never instantiate concrete
//! providers directly.

pub mod deepl;
pub mod groq;
pub mod libretranslate;
pub mod mock;
pub mod openai;

pub use deepl::DeepLFreeProvider;
pub use groq::GroqProvider;
pub use libretranslate::LibreTranslateProvider;
pub use mock::{MockMode, MockProvider};
pub use openai::OpenAiProvider;

use crate::error::{TranslateError, TranslateResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Capability interface for machine translation backends
///
/// All methods are async: every real provider is network-bound. Providers
/// enforce their own request timeouts, so an engine-side call is bounded.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate a single text between language codes
    ///
    /// Fails with [`TranslateError::Provider`] on network, auth, quota or
    /// malformed-response problems.
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslateResult<String>;

    /// Probe whether the backend is reachable and credentials work
    async fn test_connection(&self) -> bool;

    /// Display name for logs and UIs
    fn name(&self) -> &str;
}

/// Options consumed by the provider registry
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// API key, required by key-based providers
    pub api_key: String,
    /// Service URL, used by self-hostable providers
    pub url: String,
    /// Model override for LLM-backed providers
    pub model: Option<String>,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        ProviderOptions {
            api_key: String::new(),
            url: libretranslate::DEFAULT_URL.to_string(),
            model: None,
        }
    }
}

/// Configuration keys accepted by [`create`]
pub const PROVIDER_KEYS: &[&str] = &["libretranslate", "deepl-free", "groq", "openai"];

/// Build a provider from its configuration key
///
/// Unknown keys fail with a configuration error; nothing is attempted.
pub fn create(key: &str, options: &ProviderOptions) -> TranslateResult<Arc<dyn TranslationProvider>> {
    match key {
        "libretranslate" => Ok(Arc::new(LibreTranslateProvider::new(options.url.clone())?)),
        "deepl-free" => Ok(Arc::new(DeepLFreeProvider::new(options.api_key.clone())?)),
        "groq" => Ok(Arc::new(GroqProvider::new(
            options.api_key.clone(),
            options.model.clone(),
        )?)),
        "openai" => Ok(Arc::new(OpenAiProvider::new(
            options.api_key.clone(),
            options.model.clone(),
        )?)),
        other => Err(TranslateError::Config(format!(
            "unknown provider '{}', expected one of {:?}",
            other, PROVIDER_KEYS
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_unknown_provider() {
        let result = create("babelfish", &ProviderOptions::default());
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_create_libretranslate() {
        let provider = create("libretranslate", &ProviderOptions::default()).unwrap();
        assert_eq!(provider.name(), "LibreTranslate");
    }

    #[test]
    fn test_create_deepl_requires_key() {
        let result = create("deepl-free", &ProviderOptions::default());
        assert!(matches!(result, Err(TranslateError::Config(_))));
    }

    #[test]
    fn test_create_groq_with_key() {
        let options = ProviderOptions {
            api_key: "test-key".to_string(),
            ..ProviderOptions::default()
        };
        let provider = create("groq", &options).unwrap();
        assert!(provider.name().starts_with("Groq"));
    }

    #[test]
    fn test_create_openai_with_key() {
        let options = ProviderOptions {
            api_key: "test-key".to_string(),
            ..ProviderOptions::default()
        };
        let provider = create("openai", &options).unwrap();
        assert!(provider.name().starts_with("OpenAI"));
    }

    #[test]
    fn test_default_settings_providers_are_registered() {
        // Both tiers of a fresh config must resolve through the registry.
        let settings = crate::settings::Settings::default();
        assert!(PROVIDER_KEYS.contains(&settings.free_api.provider.as_str()));
        assert!(PROVIDER_KEYS.contains(&settings.paid_api.provider.as_str()));

        let options = ProviderOptions {
            api_key: "test-key".to_string(),
            ..ProviderOptions::default()
        };
        assert!(create(&settings.paid_api.provider, &options).is_ok());
    }
}
