//! Deterministic mock provider for tests and dry runs
//!
//! Simulates the translation behaviors the engine must survive (echoes,
//! reorderings, token corruption, dropped tokens, hard failures) without
//! any network access. Also counts calls so tests can assert that already
//! translated entries are never re-sent.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::TranslationProvider;
use crate::error::{TranslateError, TranslateResult};

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<x\d+/>").unwrap());

/// Behaviors the mock can simulate
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Return the input unchanged; every entry validates
    Echo,
    /// Append `_<target>` to the text, placeholder tokens untouched
    Suffix,
    /// Reverse word order, simulating word-order-changing languages
    Reorder,
    /// Strip every `<xN/>` token, simulating a provider that eats markup
    DropTokens,
    /// Rewrite `<xN/>` as `<xN />`, the common corruption restore must fix
    MangleTokens,
    /// Fail every call with a provider error
    Error(String),
}

/// API-free provider used by tests and `--mock` runs
#[derive(Debug)]
pub struct MockProvider {
    mode: MockMode,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(mode: MockMode) -> Self {
        MockProvider {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of translate calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        target_lang: &str,
    ) -> TranslateResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            MockMode::Echo => Ok(text.to_string()),
            MockMode::Suffix => Ok(format!("{}_{}", text, target_lang)),
            MockMode::Reorder => {
                let words: Vec<&str> = text.split_whitespace().collect();
                Ok(words
                    .iter()
                    .rev()
                    .copied()
                    .collect::<Vec<_>>()
                    .join(" "))
            }
            MockMode::DropTokens => Ok(TOKEN_RE.replace_all(text, "").trim().to_string()),
            MockMode::MangleTokens => Ok(text.replace("/>", " />")),
            MockMode::Error(msg) => Err(TranslateError::Provider(msg.clone())),
        }
    }

    async fn test_connection(&self) -> bool {
        !matches!(self.mode, MockMode::Error(_))
    }

    fn name(&self) -> &str {
        "Mock Translator"
    }
}
