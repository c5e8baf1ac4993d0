//! Placeholder validation and repair after translation
//!
//! A translation is acceptable only if, for every placeholder family, the
//! multiset of placeholders in the translated text equals the multiset in the
//! source text. Position is free to change; content is not.
//!
//! When validation fails, [`repair`] makes a deterministic best-effort fix:
//! a missing placeholder first claims an unexpected placeholder of the same
//! family (a mangled spelling like `{nmae}` or a flipped conversion like `%s`
//! for `%d`), then a corrupted delimiter fragment, and as a last resort is
//! appended to the end of the text. The caller must re-validate; if repair
//! still fails the entry falls back to the source text so a provably wrong
//! translation is never committed.

use crate::placeholder::{PlaceholderFamily, placeholder_spans};

/// Check that `translated` carries exactly the placeholders of `original`
///
/// Compares the sorted match list of each family independently; all three
/// must match. Extra placeholders fail validation just like missing ones.
pub fn validate(original: &str, translated: &str) -> bool {
    PlaceholderFamily::ALL.iter().all(|family| {
        let mut expected = family.matches(original);
        let mut found = family.matches(translated);
        expected.sort();
        found.sort();
        expected == found
    })
}

/// Multiset difference: occurrences of `a` not accounted for by `b`
fn multiset_diff(a: &[String], b: &[String]) -> Vec<String> {
    let mut remainder = b.to_vec();
    let mut diff = Vec::new();
    for item in a {
        if let Some(pos) = remainder.iter().position(|r| r == item) {
            remainder.remove(pos);
        } else {
            diff.push(item.clone());
        }
    }
    diff
}

/// Find a corrupted fragment for a missing placeholder of `family`
///
/// A corrupted fragment is a run of characters starting at the family's
/// leading delimiter, containing neither whitespace nor the family's closing
/// delimiter, and not part of an intact placeholder. Returns the byte span of
/// the first such run.
fn find_corrupted_fragment(text: &str, family: PlaceholderFamily) -> Option<(usize, usize)> {
    let lead = family.leading_delimiter();
    let closing = family.closing_delimiter();
    let intact = placeholder_spans(text);

    for (start, ch) in text.char_indices() {
        if ch != lead {
            continue;
        }
        if intact.iter().any(|&(s, e)| start >= s && start < e) {
            continue;
        }

        let mut end = start;
        for (offset, c) in text[start..].char_indices() {
            if c.is_whitespace() || Some(c) == closing {
                break;
            }
            end = start + offset + c.len_utf8();
        }
        if end > start {
            return Some((start, end));
        }
    }

    None
}

/// Restore missing placeholders into `translated`, best-effort
///
/// For each family, each placeholder present in `original` but absent from
/// `translated` is reinstated, trying in order:
///
/// 1. replace an unexpected placeholder of the same family;
/// 2. replace a corrupted delimiter fragment;
/// 3. append to the end, after trimming trailing whitespace, preceded by a
///    single space.
///
/// The result must be re-validated by the caller. Once [`validate`] passes,
/// repair is a no-op, so repeated application changes nothing.
pub fn repair(original: &str, translated: &str) -> String {
    let mut result = translated.to_string();

    for family in PlaceholderFamily::ALL {
        let expected = family.matches(original);
        let found = family.matches(&result);
        let missing = multiset_diff(&expected, &found);
        let mut extras = multiset_diff(&found, &expected);

        for placeholder in missing {
            if let Some(extra) = extras.first().cloned() {
                if let Some(pos) = result.find(&extra) {
                    result.replace_range(pos..pos + extra.len(), &placeholder);
                    extras.remove(0);
                    continue;
                }
            }

            if let Some((start, end)) = find_corrupted_fragment(&result, family) {
                result.replace_range(start..end, &placeholder);
            } else {
                let trimmed = result.trim_end();
                result = if trimmed.is_empty() {
                    placeholder
                } else {
                    format!("{} {}", trimmed, placeholder)
                };
            }
        }
    }

    result
}
