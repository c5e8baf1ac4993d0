//! GNU PO catalog reading and writing
//!
//! Covers the subset of the PO format the merge engine needs: a header
//! pseudo-entry, translator/extracted/reference comments, flags, and
//! msgid/msgstr pairs with quoted continuation lines. Plural forms and
//! message contexts are rejected; the catalogs here are produced by our own
//! extraction step and never carry them.
//!
//! Writes go through a temporary file in the target directory followed by a
//! rename, so an interrupted save never leaves a truncated catalog behind.

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::catalog::{Catalog, CatalogMetadata, Entry, EntryComments, EntryState};
use crate::error::{TranslateError, TranslateResult};

static MESSAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(msgid|msgstr|msgctxt|msgid_plural|msgstr\[\d\])\s+"(.*)"\s*$"#).unwrap());

static CONTINUATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^"(.*)"\s*$"#).unwrap());

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out
}

#[derive(Debug, Default)]
struct PendingEntry {
    comments: EntryComments,
    fuzzy: bool,
    msgid: Option<String>,
    msgstr: Option<String>,
}

impl PendingEntry {
    fn started(&self) -> bool {
        self.msgid.is_some() || self.msgstr.is_some() || self.fuzzy || !self.comments.is_empty()
    }

    fn finish(self, line: usize) -> TranslateResult<Entry> {
        let msgid = self.msgid.ok_or(TranslateError::Parse {
            line,
            message: "entry without msgid".to_string(),
        })?;
        let msgstr = self.msgstr.unwrap_or_default();
        let state = if self.fuzzy {
            EntryState::Fuzzy
        } else if msgstr.is_empty() {
            EntryState::Untranslated
        } else {
            EntryState::Translated
        };
        Ok(Entry {
            msgid,
            msgstr,
            state,
            comments: self.comments,
        })
    }
}

fn parse_header(msgstr: &str, lang_hint: &str) -> CatalogMetadata {
    let mut meta = CatalogMetadata::new("", lang_hint);
    for line in msgstr.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match key.trim() {
            "Project-Id-Version" => meta.project_id_version = value,
            "Report-Msgid-Bugs-To" => meta.report_msgid_bugs_to = value,
            "POT-Creation-Date" => meta.pot_creation_date = value,
            "PO-Revision-Date" => meta.po_revision_date = value,
            "Last-Translator" => meta.last_translator = value,
            "Language-Team" => meta.language_team = value,
            "Language" => meta.language = value,
            "Content-Type" => {
                if let Some(cs) = value.split("charset=").nth(1) {
                    meta.charset = cs.trim().to_string();
                }
            }
            _ => {}
        }
    }
    meta
}

/// Parse PO text into a catalog
///
/// The header pseudo-entry (empty msgid) becomes [`CatalogMetadata`];
/// obsolete (`#~`) entries are skipped.
pub fn parse(content: &str, lang_hint: &str) -> TranslateResult<Catalog> {
    let mut metadata: Option<CatalogMetadata> = None;
    let mut entries: Vec<Entry> = Vec::new();
    let mut pending = PendingEntry::default();
    // Which string the next bare "..." continuation line extends.
    let mut continuing: Option<fn(&mut PendingEntry) -> &mut String> = None;

    let flush = |pending: &mut PendingEntry,
                 metadata: &mut Option<CatalogMetadata>,
                 entries: &mut Vec<Entry>,
                 line: usize|
     -> TranslateResult<()> {
        if !pending.started() {
            return Ok(());
        }
        let entry = std::mem::take(pending).finish(line)?;
        if entry.msgid.is_empty() {
            if metadata.is_none() {
                *metadata = Some(parse_header(&entry.msgstr, lang_hint));
            }
        } else {
            entries.push(entry);
        }
        Ok(())
    };

    for (idx, raw) in content.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.trim_end();
        if line.trim().is_empty() {
            continuing = None;
            flush(&mut pending, &mut metadata, &mut entries, lineno)?;
            continue;
        }

        if let Some(rest) = line.strip_prefix('#') {
            continuing = None;
            if rest.starts_with('~') {
                // Obsolete entry: drop it wholesale.
                flush(&mut pending, &mut metadata, &mut entries, lineno)?;
                continue;
            }
            match rest.chars().next() {
                Some(',') => {
                    for flag in rest[1..].split(',').map(str::trim) {
                        if flag == "fuzzy" {
                            pending.fuzzy = true;
                        } else if !flag.is_empty() {
                            pending.comments.extra_flags.push(flag.to_string());
                        }
                    }
                }
                Some(':') => pending
                    .comments
                    .references
                    .push(rest[1..].trim().to_string()),
                Some('.') => pending
                    .comments
                    .extracted
                    .push(rest[1..].trim().to_string()),
                _ => pending
                    .comments
                    .translator
                    .push(rest.trim_start().to_string()),
            }
            continue;
        }

        if let Some(caps) = MESSAGE_RE.captures(line) {
            let keyword = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let text = unescape(caps.get(2).map(|m| m.as_str()).unwrap_or_default());
            match keyword {
                "msgid" => {
                    // A new msgid closes the previous entry.
                    if pending.msgid.is_some() {
                        flush(&mut pending, &mut metadata, &mut entries, lineno)?;
                    }
                    pending.msgid = Some(text);
                    continuing = Some(|p| p.msgid.get_or_insert_with(String::new));
                }
                "msgstr" => {
                    pending.msgstr = Some(text);
                    continuing = Some(|p| p.msgstr.get_or_insert_with(String::new));
                }
                other => {
                    return Err(TranslateError::Parse {
                        line: lineno,
                        message: format!("unsupported keyword '{}'", other),
                    });
                }
            }
            continue;
        }

        if let Some(caps) = CONTINUATION_RE.captures(line) {
            let text = unescape(caps.get(1).map(|m| m.as_str()).unwrap_or_default());
            match continuing {
                Some(target) => target(&mut pending).push_str(&text),
                None => {
                    return Err(TranslateError::Parse {
                        line: lineno,
                        message: "continuation line outside msgid/msgstr".to_string(),
                    });
                }
            }
            continue;
        }

        return Err(TranslateError::Parse {
            line: lineno,
            message: format!("unrecognized line: {}", line),
        });
    }

    let last_line = content.lines().count();
    flush(&mut pending, &mut metadata, &mut entries, last_line)?;

    let mut catalog = Catalog::new(metadata.unwrap_or_else(|| CatalogMetadata::new("", lang_hint)));
    for entry in entries {
        catalog.push(entry);
    }
    Ok(catalog)
}

fn write_string(out: &mut String, keyword: &str, value: &str) {
    out.push_str(keyword);
    out.push_str(" \"");
    out.push_str(&escape(value));
    out.push_str("\"\n");
}

/// Serialize a catalog to PO text
pub fn serialize(catalog: &Catalog) -> String {
    let meta = &catalog.metadata;
    let mut out = String::new();

    out.push_str("msgid \"\"\nmsgstr \"\"\n");
    for (key, value) in [
        ("Project-Id-Version", meta.project_id_version.as_str()),
        ("Report-Msgid-Bugs-To", meta.report_msgid_bugs_to.as_str()),
        ("POT-Creation-Date", meta.pot_creation_date.as_str()),
        ("PO-Revision-Date", meta.po_revision_date.as_str()),
        ("Last-Translator", meta.last_translator.as_str()),
        ("Language-Team", meta.language_team.as_str()),
        ("Language", meta.language.as_str()),
        ("MIME-Version", "1.0"),
    ] {
        out.push_str(&format!("\"{}: {}\\n\"\n", key, escape(value)));
    }
    out.push_str(&format!(
        "\"Content-Type: text/plain; charset={}\\n\"\n",
        meta.charset
    ));
    out.push_str("\"Content-Transfer-Encoding: 8bit\\n\"\n");

    for entry in &catalog.entries {
        out.push('\n');
        for comment in &entry.comments.translator {
            out.push_str(&format!("# {}\n", comment));
        }
        for comment in &entry.comments.extracted {
            out.push_str(&format!("#. {}\n", comment));
        }
        for reference in &entry.comments.references {
            out.push_str(&format!("#: {}\n", reference));
        }
        let mut flags = entry.comments.extra_flags.clone();
        if entry.state == EntryState::Fuzzy {
            flags.insert(0, "fuzzy".to_string());
        }
        if !flags.is_empty() {
            out.push_str(&format!("#, {}\n", flags.join(", ")));
        }
        write_string(&mut out, "msgid", &entry.msgid);
        write_string(&mut out, "msgstr", &entry.msgstr);
    }

    out
}

/// Load a catalog from disk
pub fn load(path: &Path, lang_hint: &str) -> TranslateResult<Catalog> {
    let content = fs::read_to_string(path)
        .map_err(|e| TranslateError::Persistence(format!("{}: {}", path.display(), e)))?;
    parse(&content, lang_hint)
}

/// Write a catalog to disk atomically
///
/// Serializes to a sibling temporary file, then renames over the target, so
/// the previous catalog survives an interrupted write. Safe to call
/// repeatedly.
pub fn save(catalog: &Catalog, path: &Path) -> TranslateResult<()> {
    let content = serialize(catalog);
    let tmp_path = path.with_extension("po.tmp");
    fs::write(&tmp_path, content)
        .map_err(|e| TranslateError::Persistence(format!("{}: {}", tmp_path.display(), e)))?;
    fs::rename(&tmp_path, path)
        .map_err(|e| TranslateError::Persistence(format!("{}: {}", path.display(), e)))?;
    Ok(())
}
