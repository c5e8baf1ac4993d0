//! Translation catalog data model and the template merge engine
//!
//! A [`Catalog`] holds the ordered entries for one target language plus
//! header metadata. Merging a template into an existing catalog is what makes
//! re-runs incremental: translated entries are never sent back to a provider,
//! while entries flagged for review are queued again on the next run.

use chrono::Local;
use std::collections::HashSet;

use crate::languages;

/// Review state of a single catalog entry
///
/// Modeled as an explicit enum rather than the loose "empty msgstr plus fuzzy
/// flag" convention of PO files, which cannot distinguish a failed fallback
/// translation from a genuinely untranslated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryState {
    /// No translation yet; msgstr is empty
    #[default]
    Untranslated,
    /// Translation present and placeholder-verified
    Translated,
    /// Translation is unverified or a fallback; re-queued on the next run
    Fuzzy,
}

/// Comment block attached to an entry, preserved across merges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryComments {
    /// `# ` translator comments
    pub translator: Vec<String>,
    /// `#.` comments extracted from source code
    pub extracted: Vec<String>,
    /// `#:` source references
    pub references: Vec<String>,
    /// `#,` flags other than fuzzy (fuzzy is derived from [`EntryState`])
    pub extra_flags: Vec<String>,
}

impl EntryComments {
    pub fn is_empty(&self) -> bool {
        self.translator.is_empty()
            && self.extracted.is_empty()
            && self.references.is_empty()
            && self.extra_flags.is_empty()
    }
}

/// One source-string/translation pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Source text, immutable, non-empty for regular entries
    pub msgid: String,
    /// Target text; empty when untranslated
    pub msgstr: String,
    /// Review state, serialized as the fuzzy flag
    pub state: EntryState,
    /// Attached comments and flags
    pub comments: EntryComments,
}

impl Entry {
    /// A fresh untranslated entry
    pub fn untranslated(msgid: impl Into<String>) -> Self {
        Entry {
            msgid: msgid.into(),
            msgstr: String::new(),
            state: EntryState::Untranslated,
            comments: EntryComments::default(),
        }
    }

    /// Untranslated and fuzzy entries are both eligible for (re)translation
    pub fn needs_translation(&self) -> bool {
        matches!(self.state, EntryState::Untranslated | EntryState::Fuzzy)
    }

    /// Commit a verified translation and clear the review flag
    pub fn commit_translation(&mut self, msgstr: String) {
        self.msgstr = msgstr;
        self.state = EntryState::Translated;
    }

    /// Fall back to the source text and flag the entry for review
    ///
    /// Used when the provider failed or placeholders could not be verified.
    /// The source text preserves every placeholder verbatim, so nothing
    /// provably wrong reaches the compiled catalog.
    pub fn fallback_to_source(&mut self) {
        if self.msgstr.is_empty() {
            self.msgstr = self.msgid.clone();
        }
        self.state = EntryState::Fuzzy;
    }
}

/// Catalog header metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMetadata {
    pub project_id_version: String,
    pub report_msgid_bugs_to: String,
    pub pot_creation_date: String,
    pub po_revision_date: String,
    pub last_translator: String,
    pub language_team: String,
    pub language: String,
    pub charset: String,
}

impl CatalogMetadata {
    /// Header for a freshly created per-language catalog
    pub fn new(textdomain: &str, lang: &str) -> Self {
        let now = Local::now().format("%Y-%m-%d %H:%M%z").to_string();
        let team = languages::display_name(lang).unwrap_or(lang);
        CatalogMetadata {
            project_id_version: textdomain.to_string(),
            report_msgid_bugs_to: String::new(),
            pot_creation_date: now.clone(),
            po_revision_date: now,
            last_translator: "Translation Automator <auto@translator.ai>".to_string(),
            language_team: format!("{} <{}@li.org>", team, lang),
            language: lang.to_string(),
            charset: "UTF-8".to_string(),
        }
    }

    /// Refresh the revision timestamp, e.g. after a merge
    pub fn touch_revision(&mut self) {
        self.po_revision_date = Local::now().format("%Y-%m-%d %H:%M%z").to_string();
    }
}

/// Ordered collection of entries for one target language
///
/// Invariant: msgids are unique within a catalog. The header pseudo-entry of
/// the PO format lives in [`CatalogMetadata`], never in `entries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub metadata: CatalogMetadata,
    pub entries: Vec<Entry>,
}

impl Catalog {
    pub fn new(metadata: CatalogMetadata) -> Self {
        Catalog {
            metadata,
            entries: Vec::new(),
        }
    }

    /// Append an entry, keeping msgids unique
    ///
    /// Returns false and leaves the catalog unchanged when the msgid is
    /// already present.
    pub fn push(&mut self, entry: Entry) -> bool {
        if self.entries.iter().any(|e| e.msgid == entry.msgid) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn get(&self, msgid: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.msgid == msgid)
    }

    /// Indices of entries that are untranslated or fuzzy, in catalog order
    ///
    /// Entries with an empty msgid are excluded; the header never reaches a
    /// provider.
    pub fn entries_needing_translation(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.msgid.is_empty() && e.needs_translation())
            .map(|(i, _)| i)
            .collect()
    }

    /// Count of committed, verified translations
    pub fn translated_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state == EntryState::Translated)
            .count()
    }
}

/// Merge a template catalog into the persisted per-language catalog
///
/// With no existing catalog, the template's entries seed a fresh catalog with
/// language-specific metadata, all untranslated. With an existing catalog,
/// the template is authoritative for the string set: entries still present
/// keep their msgstr and state untouched, new template entries are appended
/// untranslated, and entries gone from the template are dropped.
pub fn merge(
    template: &Catalog,
    existing: Option<Catalog>,
    textdomain: &str,
    lang: &str,
) -> Catalog {
    let template_ids: HashSet<&str> = template
        .entries
        .iter()
        .map(|e| e.msgid.as_str())
        .filter(|id| !id.is_empty())
        .collect();

    match existing {
        None => {
            let mut catalog = Catalog::new(CatalogMetadata::new(textdomain, lang));
            for entry in &template.entries {
                if entry.msgid.is_empty() {
                    continue;
                }
                let mut fresh = Entry::untranslated(entry.msgid.clone());
                fresh.comments = entry.comments.clone();
                catalog.push(fresh);
            }
            catalog
        }
        Some(existing) => {
            let mut catalog = Catalog::new(existing.metadata.clone());
            catalog.metadata.touch_revision();

            // Prior work survives as long as the template still has the string.
            for entry in existing.entries {
                if template_ids.contains(entry.msgid.as_str()) {
                    catalog.push(entry);
                }
            }

            // Strings new in the template start untranslated.
            for entry in &template.entries {
                if entry.msgid.is_empty() || catalog.get(&entry.msgid).is_some() {
                    continue;
                }
                let mut fresh = Entry::untranslated(entry.msgid.clone());
                fresh.comments = entry.comments.clone();
                catalog.push(fresh);
            }

            catalog
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_with(msgids: &[&str]) -> Catalog {
        let mut catalog = Catalog::new(CatalogMetadata::new("testdomain", "en"));
        for id in msgids {
            catalog.push(Entry::untranslated(*id));
        }
        catalog
    }

    // ========== Entry State Tests ==========

    #[test]
    fn test_untranslated_needs_translation() {
        let entry = Entry::untranslated("Hello");
        assert!(entry.needs_translation());
    }

    #[test]
    fn test_committed_entry_is_done() {
        let mut entry = Entry::untranslated("Hello");
        entry.commit_translation("Bonjour".to_string());
        assert!(!entry.needs_translation());
        assert_eq!(entry.state, EntryState::Translated);
        assert_eq!(entry.msgstr, "Bonjour");
    }

    #[test]
    fn test_fuzzy_entry_requeued() {
        let mut entry = Entry::untranslated("Hello");
        entry.fallback_to_source();
        assert_eq!(entry.state, EntryState::Fuzzy);
        assert_eq!(entry.msgstr, "Hello");
        assert!(entry.needs_translation());
    }

    #[test]
    fn test_fallback_keeps_existing_msgstr() {
        let mut entry = Entry::untranslated("Hello");
        entry.commit_translation("Bonjour".to_string());
        entry.fallback_to_source();
        assert_eq!(entry.msgstr, "Bonjour");
        assert_eq!(entry.state, EntryState::Fuzzy);
    }

    // ========== Catalog Tests ==========

    #[test]
    fn test_push_rejects_duplicate_msgid() {
        let mut catalog = template_with(&["Hello"]);
        assert!(!catalog.push(Entry::untranslated("Hello")));
        assert_eq!(catalog.entries.len(), 1);
    }

    #[test]
    fn test_entries_needing_translation_excludes_header_and_done() {
        let mut catalog = template_with(&["A", "B", "C"]);
        catalog.entries[1].commit_translation("b".to_string());
        catalog.entries[2].fallback_to_source();
        // A fake empty-msgid entry must never be queued.
        catalog.entries.push(Entry::untranslated(""));

        let queue = catalog.entries_needing_translation();
        assert_eq!(queue, vec![0, 2]);
    }

    #[test]
    fn test_metadata_header_fields() {
        let meta = CatalogMetadata::new("myapp", "de");
        assert_eq!(meta.project_id_version, "myapp");
        assert_eq!(meta.language, "de");
        assert_eq!(meta.language_team, "German <de@li.org>");
        assert_eq!(meta.charset, "UTF-8");
        assert!(!meta.po_revision_date.is_empty());
    }

    // ========== Merge Tests ==========

    #[test]
    fn test_merge_creates_fresh_catalog() {
        let template = template_with(&["One", "Two"]);
        let merged = merge(&template, None, "myapp", "fr");

        assert_eq!(merged.metadata.language, "fr");
        assert_eq!(merged.entries.len(), 2);
        assert!(merged.entries.iter().all(|e| e.needs_translation()));
        assert!(merged.entries.iter().all(|e| e.msgstr.is_empty()));
    }

    #[test]
    fn test_merge_preserves_translations_and_adds_new() {
        let mut existing = Catalog::new(CatalogMetadata::new("myapp", "fr"));
        let mut done = Entry::untranslated("X");
        done.commit_translation("X-fr".to_string());
        existing.push(done);

        let template = template_with(&["X", "Y"]);
        let merged = merge(&template, Some(existing), "myapp", "fr");

        let x = merged.get("X").unwrap();
        assert_eq!(x.msgstr, "X-fr");
        assert_eq!(x.state, EntryState::Translated);

        let y = merged.get("Y").unwrap();
        assert_eq!(y.state, EntryState::Untranslated);
        assert!(y.msgstr.is_empty());
    }

    #[test]
    fn test_merge_drops_obsolete_entries() {
        let mut existing = Catalog::new(CatalogMetadata::new("myapp", "fr"));
        existing.push(Entry::untranslated("Kept"));
        existing.push(Entry::untranslated("Gone"));

        let template = template_with(&["Kept"]);
        let merged = merge(&template, Some(existing), "myapp", "fr");

        assert!(merged.get("Kept").is_some());
        assert!(merged.get("Gone").is_none());
    }

    #[test]
    fn test_merge_preserves_fuzzy_state() {
        let mut existing = Catalog::new(CatalogMetadata::new("myapp", "fr"));
        let mut fuzzy = Entry::untranslated("F");
        fuzzy.fallback_to_source();
        existing.push(fuzzy);

        let template = template_with(&["F"]);
        let merged = merge(&template, Some(existing), "myapp", "fr");

        assert_eq!(merged.get("F").unwrap().state, EntryState::Fuzzy);
        assert_eq!(merged.entries_needing_translation().len(), 1);
    }

    #[test]
    fn test_merge_copies_template_comments() {
        let mut template = template_with(&[]);
        let mut entry = Entry::untranslated("Open file");
        entry.comments.references.push("src/ui.rs:42".to_string());
        template.push(entry);

        let merged = merge(&template, None, "myapp", "it");
        assert_eq!(
            merged.get("Open file").unwrap().comments.references,
            vec!["src/ui.rs:42"]
        );
    }

    #[test]
    fn test_merge_keeps_existing_entry_order() {
        let mut existing = Catalog::new(CatalogMetadata::new("myapp", "fr"));
        existing.push(Entry::untranslated("B"));
        existing.push(Entry::untranslated("A"));

        let template = template_with(&["A", "B", "C"]);
        let merged = merge(&template, Some(existing), "myapp", "fr");

        let order: Vec<&str> = merged.entries.iter().map(|e| e.msgid.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }
}
