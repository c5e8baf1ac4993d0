//! Batch translation orchestrator
//!
//! Drives the merge/translate/validate/repair cycle: per entry inside one
//! language, then per language across the supported set. Failure is contained
//! at the smallest useful scope: a provider error costs one entry, a
//! filesystem error costs one language, and only a configuration error aborts
//! the batch before it starts.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Entry, EntryState, merge};
use crate::error::{TranslateError, TranslateResult};
use crate::placeholder;
use crate::po;
use crate::provider::TranslationProvider;
use crate::verify;

/// Source language of every template catalog
const SOURCE_LANG: &str = "en";

/// Progress callback: `(language_code, status, current, total)`
///
/// Invoked once per completed language, success or not. Never invoked
/// concurrently: the batch is sequential.
pub type ProgressFn<'a> = dyn FnMut(&str, &str, usize, usize) + Send + 'a;

/// Outcome of one language batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageResult {
    /// Language code, e.g. `pt-BR`
    pub code: String,
    /// Whether the language completed without an uncaught error
    pub success: bool,
    /// Human-readable status: translated count or error text
    pub message: String,
}

/// Orchestrates catalog merging and provider calls for a whole project
pub struct TranslationEngine {
    provider: Arc<dyn TranslationProvider>,
    textdomain: String,
    cancel: Arc<AtomicBool>,
}

impl TranslationEngine {
    pub fn new(provider: Arc<dyn TranslationProvider>, textdomain: impl Into<String>) -> Self {
        TranslationEngine {
            provider,
            textdomain: textdomain.into(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag for cooperative cancellation
    ///
    /// Checked before each entry and each language; the in-flight provider
    /// call is not aborted but is bounded by the provider's own timeout.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Run the protect → translate → restore → validate → repair cycle for
    /// one entry. Returns true when the entry counts as translated; fallback
    /// entries keep the batch going but are not counted.
    async fn translate_entry(&self, entry: &mut Entry, lang: &str) -> bool {
        let (protected, tokens) = placeholder::protect(&entry.msgid);

        let raw = match self
            .provider
            .translate(&protected, SOURCE_LANG, lang)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(msgid = %entry.msgid, lang, error = %e, "provider call failed");
                entry.fallback_to_source();
                return false;
            }
        };

        let restored = placeholder::restore(&raw, &tokens);
        if verify::validate(&entry.msgid, &restored) {
            entry.commit_translation(restored);
            return true;
        }

        let repaired = verify::repair(&entry.msgid, &restored);
        if verify::validate(&entry.msgid, &repaired) {
            debug!(msgid = %entry.msgid, lang, "placeholders repaired");
            entry.commit_translation(repaired);
            return true;
        }

        // Never commit a translation with provably wrong placeholders.
        warn!(msgid = %entry.msgid, lang, "placeholder repair failed, keeping source text");
        entry.msgstr = entry.msgid.clone();
        entry.state = EntryState::Fuzzy;
        false
    }

    /// Translate one language: merge the template into the persisted catalog,
    /// translate every untranslated or fuzzy entry, persist once at the end.
    ///
    /// Returns the number of entries successfully translated in this run.
    pub async fn translate_language(
        &self,
        template: &Catalog,
        lang: &str,
        locale_dir: &Path,
    ) -> TranslateResult<usize> {
        std::fs::create_dir_all(locale_dir).map_err(|e| {
            TranslateError::Persistence(format!("{}: {}", locale_dir.display(), e))
        })?;
        let po_path = locale_dir.join(format!("{}.po", lang));

        let existing = if po_path.exists() {
            Some(po::load(&po_path, lang)?)
        } else {
            None
        };
        let mut catalog = merge(template, existing, &self.textdomain, lang);

        let queue = catalog.entries_needing_translation();
        info!(lang, pending = queue.len(), "translating language");

        let mut translated = 0;
        for idx in queue {
            if self.cancelled() {
                break;
            }
            if self.translate_entry(&mut catalog.entries[idx], lang).await {
                translated += 1;
            }
        }

        po::save(&catalog, &po_path)?;
        Ok(translated)
    }

    /// Translate the project into every language in `languages`, in order
    ///
    /// Per-language failures are recorded, not propagated; the progress
    /// callback fires after every completed language. Fatal only when the
    /// template has no translatable entries or the language set is empty.
    pub async fn translate_project(
        &self,
        template: &Catalog,
        languages: &[&str],
        locale_dir: &Path,
        mut progress: Option<&mut ProgressFn<'_>>,
    ) -> TranslateResult<Vec<LanguageResult>> {
        if !template.entries.iter().any(|e| !e.msgid.is_empty()) {
            return Err(TranslateError::Config(
                "template catalog has no translatable entries".to_string(),
            ));
        }
        if languages.is_empty() {
            return Err(TranslateError::Config(
                "language set is empty".to_string(),
            ));
        }

        let total = languages.len();
        let mut results = Vec::with_capacity(total);

        for (i, lang) in languages.iter().enumerate() {
            if self.cancelled() {
                info!("batch cancelled after {} of {} languages", i, total);
                break;
            }

            let (success, message) = match self.translate_language(template, lang, locale_dir).await
            {
                Ok(count) => (true, format!("success: {} strings", count)),
                Err(e) => {
                    warn!(lang, error = %e, "language batch failed");
                    (false, format!("error: {}", e))
                }
            };

            if let Some(cb) = progress.as_mut() {
                cb(lang, &message, i + 1, total);
            }
            results.push(LanguageResult {
                code: lang.to_string(),
                success,
                message,
            });
        }

        Ok(results)
    }
}
