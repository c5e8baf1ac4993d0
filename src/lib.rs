//! langforge: machine translation for gettext catalogs
//!
//! Automates translation of message catalogs into a fixed set of target
//! languages through pluggable providers, while guaranteeing that embedded
//! format placeholders (`%s`, `%(name)d`, `{0}`) survive the round trip
//! through a free-text translation service.
//!
//! The pipeline for each entry is protect → translate → restore → validate →
//! repair: placeholders are swapped for opaque `<xN/>` tokens before the
//! provider call and verified as a multiset afterwards. Entries that cannot
//! be verified fall back to the source text and are flagged fuzzy, so a
//! later run retries them and nothing provably broken is ever persisted.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use langforge::engine::TranslationEngine;
//! use langforge::provider::{MockMode, MockProvider};
//! use langforge::{languages, po};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let template = po::load(Path::new("messages.pot"), "en")?;
//!     let provider = Arc::new(MockProvider::new(MockMode::Echo));
//!     let engine = TranslationEngine::new(provider, "myapp");
//!
//!     let codes: Vec<&str> = languages::SUPPORTED_LANGUAGES
//!         .iter()
//!         .map(|(code, _)| *code)
//!         .collect();
//!     let results = engine
//!         .translate_project(&template, &codes, Path::new("locale"), None)
//!         .await?;
//!
//!     println!("{} languages ok", results.iter().filter(|r| r.success).count());
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod languages;
pub mod placeholder;
pub mod po;
pub mod provider;
pub mod settings;
pub mod verify;

pub use catalog::{Catalog, CatalogMetadata, Entry, EntryState, merge};
pub use engine::{LanguageResult, TranslationEngine};
pub use error::{TranslateError, TranslateResult};
pub use placeholder::{PlaceholderFamily, TokenMap, protect, restore};
pub use provider::TranslationProvider;
pub use verify::{repair, validate};
