//! Persistent application settings
//!
//! Stored as JSON under the user configuration directory. Missing or
//! unreadable files fall back to defaults so a fresh install works without
//! any setup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{TranslateError, TranslateResult};
use crate::provider::{ProviderOptions, libretranslate};

/// Which provider tier is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiTier {
    #[default]
    Free,
    Paid,
}

/// Settings for one provider tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub libretranslate_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Persisted application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_type: ApiTier,
    pub free_api: ApiSettings,
    pub paid_api: ApiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_type: ApiTier::Free,
            free_api: ApiSettings {
                provider: "groq".to_string(),
                api_key: String::new(),
                libretranslate_url: Some(libretranslate::DEFAULT_URL.to_string()),
                model: Some("llama-3.3-70b-versatile".to_string()),
            },
            paid_api: ApiSettings {
                provider: "openai".to_string(),
                api_key: String::new(),
                libretranslate_url: None,
                model: Some("gpt-4o-mini".to_string()),
            },
        }
    }
}

impl Settings {
    /// Default settings file location
    pub fn default_path() -> PathBuf {
        let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
        home.join(".config").join("langforge").join("config.json")
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// malformed
    pub fn load(path: &Path) -> Settings {
        fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Write settings, creating parent directories as needed
    pub fn save(&self, path: &Path) -> TranslateResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| TranslateError::Persistence(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Provider settings for the active tier
    pub fn active_api(&self) -> &ApiSettings {
        match self.api_type {
            ApiTier::Free => &self.free_api,
            ApiTier::Paid => &self.paid_api,
        }
    }

    /// Registry options for the active tier
    pub fn provider_options(&self) -> ProviderOptions {
        let api = self.active_api();
        ProviderOptions {
            api_key: api.api_key.clone(),
            url: api
                .libretranslate_url
                .clone()
                .unwrap_or_else(|| libretranslate::DEFAULT_URL.to_string()),
            model: api.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_type, ApiTier::Free);
        assert_eq!(settings.free_api.provider, "groq");
        assert_eq!(
            settings.free_api.libretranslate_url.as_deref(),
            Some(libretranslate::DEFAULT_URL)
        );
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/config.json"));
        assert_eq!(settings.free_api.provider, "groq");
    }

    #[test]
    fn test_load_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let settings = Settings::load(&path);
        assert_eq!(settings.api_type, ApiTier::Free);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut settings = Settings::default();
        settings.free_api.provider = "libretranslate".to_string();
        settings.free_api.api_key = "k".to_string();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path);
        assert_eq!(loaded.free_api.provider, "libretranslate");
        assert_eq!(loaded.free_api.api_key, "k");
    }

    #[test]
    fn test_provider_options_from_active_tier() {
        let mut settings = Settings::default();
        settings.free_api.api_key = "abc".to_string();
        let options = settings.provider_options();
        assert_eq!(options.api_key, "abc");
        assert_eq!(options.model.as_deref(), Some("llama-3.3-70b-versatile"));
    }
}
