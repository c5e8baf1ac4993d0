//! Placeholder protection for machine translation
//!
//! Format placeholders (`%s`, `%(name)d`, `{0}`) embedded in source strings
//! must survive a free-text translation call unchanged. Before sending a
//! string to a provider, every placeholder is replaced by a self-closing
//! token (`<x1/>`, `<x2/>`, ...) that translation systems treat as opaque
//! markup; after translation the tokens are swapped back.
//!
//! Three placeholder families are recognized, in fixed priority order:
//!
//! 1. printf-style named: `%(name)s`, `%(count)d`
//! 2. printf-style positional: `%s`, `%05.2f`, literal `%%`
//! 3. brace-style: `{}`, `{0}`, `{name}`, `{count:.2f}`
//!
//! Tokens are numbered 1..N in reading order of the source text, so `<x1/>`
//! always maps to the first placeholder of the original string no matter
//! where the translation moved it.

use regex::Regex;
use std::sync::LazyLock;

static NAMED_PRINTF: LazyLock<Regex> = LazyLock::new(|| {
    // The space conversion flag is deliberately not accepted: it would make
    // "% done" in prose like "100% done" match as a placeholder.
    Regex::new(r"%\([A-Za-z_][A-Za-z0-9_]*\)[-+#0]*\d*(?:\.\d+)?[diouxXeEfFgGcrs]").unwrap()
});

static POSITIONAL_PRINTF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[-+#0]*\d*(?:\.\d+)?[diouxXeEfFgGcrs]|%%").unwrap());

static BRACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[A-Za-z0-9_]*(?::[^{}\s]*)?\}").unwrap());

/// The three placeholder pattern families, in match-priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderFamily {
    /// `%(name)s` and friends
    NamedPrintf,
    /// `%s`, `%d`, `%%` and friends
    PositionalPrintf,
    /// `{}`, `{0}`, `{name}`, `{count:.2f}`
    Brace,
}

impl PlaceholderFamily {
    /// All families in priority order. When two families match overlapping
    /// spans the one listed first wins.
    pub const ALL: [PlaceholderFamily; 3] = [
        PlaceholderFamily::NamedPrintf,
        PlaceholderFamily::PositionalPrintf,
        PlaceholderFamily::Brace,
    ];

    pub(crate) fn regex(self) -> &'static Regex {
        match self {
            PlaceholderFamily::NamedPrintf => &NAMED_PRINTF,
            PlaceholderFamily::PositionalPrintf => &POSITIONAL_PRINTF,
            PlaceholderFamily::Brace => &BRACE,
        }
    }

    /// First character of every placeholder in this family
    pub(crate) fn leading_delimiter(self) -> char {
        match self {
            PlaceholderFamily::NamedPrintf | PlaceholderFamily::PositionalPrintf => '%',
            PlaceholderFamily::Brace => '{',
        }
    }

    /// Closing delimiter, for families that have one
    pub(crate) fn closing_delimiter(self) -> Option<char> {
        match self {
            PlaceholderFamily::Brace => Some('}'),
            _ => None,
        }
    }

    /// Extract every match of this family from `text`, in text order
    pub fn matches(self, text: &str) -> Vec<String> {
        self.regex()
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// A token substituted for one placeholder occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderToken {
    /// Token string as sent to the provider, e.g. `<x1/>`
    pub token: String,
    /// The original placeholder this token stands for
    pub placeholder: String,
}

impl PlaceholderToken {
    fn new(index: usize, placeholder: &str) -> Self {
        PlaceholderToken {
            token: format!("<x{}/>", index),
            placeholder: placeholder.to_string(),
        }
    }
}

/// Ordered token map produced by [`protect`], in original-text order
pub type TokenMap = Vec<PlaceholderToken>;

/// Placeholder occurrence located in a string
#[derive(Debug, Clone)]
struct Located {
    start: usize,
    end: usize,
    text: String,
}

/// Collect all placeholder spans in `text` across the three families.
///
/// Family priority resolves overlaps: a span already claimed by an earlier
/// family suppresses any overlapping match from a later one.
fn locate_placeholders(text: &str) -> Vec<Located> {
    let mut located: Vec<Located> = Vec::new();

    for family in PlaceholderFamily::ALL {
        for m in family.regex().find_iter(text) {
            let overlaps = located
                .iter()
                .any(|l| m.start() < l.end && l.start < m.end());
            if !overlaps {
                located.push(Located {
                    start: m.start(),
                    end: m.end(),
                    text: m.as_str().to_string(),
                });
            }
        }
    }

    located.sort_by_key(|l| l.start);
    located
}

/// Byte spans of every intact placeholder in `text`, across all families
pub(crate) fn placeholder_spans(text: &str) -> Vec<(usize, usize)> {
    locate_placeholders(text)
        .iter()
        .map(|l| (l.start, l.end))
        .collect()
}

/// Replace every placeholder in `text` with a token
///
/// Returns the protected text and the token map in original-text order.
/// Each placeholder occurrence gets its own token even when the literal text
/// repeats, so `"%s and %s"` produces `<x1/>` and `<x2/>`.
///
/// Text without placeholders is returned unchanged with an empty map.
pub fn protect(text: &str) -> (String, TokenMap) {
    let located = locate_placeholders(text);
    if located.is_empty() {
        return (text.to_string(), Vec::new());
    }

    // Substitute from the end of the string backwards so earlier spans stay
    // valid, handing out indices from N down to 1. Reversing the collected
    // list afterwards yields tokens numbered 1..N in reading order.
    let mut protected = text.to_string();
    let mut tokens: TokenMap = Vec::with_capacity(located.len());
    let mut index = located.len();

    for occurrence in located.iter().rev() {
        let token = PlaceholderToken::new(index, &occurrence.text);
        protected.replace_range(occurrence.start..occurrence.end, &token.token);
        tokens.push(token);
        index -= 1;
    }

    tokens.reverse();
    (protected, tokens)
}

/// Replace every token in `text` with its original placeholder
///
/// Besides the exact token, two corruption variants that lossy translation
/// systems commonly introduce are recognized: an extra space before the
/// self-closing slash (`<x1 />`) and a stray space after the opening angle
/// bracket (`< x1/>`). Tokens absent from the text are left alone; the
/// validator catches dropped placeholders downstream.
pub fn restore(text: &str, tokens: &TokenMap) -> String {
    let mut result = text.to_string();

    for entry in tokens {
        // "<x1/>" → also accept "<x1 />" and "< x1/>"
        let spaced_slash = entry.token.replace("/>", " />");
        let spaced_open = entry.token.replace('<', "< ");

        result = result.replace(&entry.token, &entry.placeholder);
        result = result.replace(&spaced_slash, &entry.placeholder);
        result = result.replace(&spaced_open, &entry.placeholder);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== Protect Tests ==========

    #[test]
    fn test_protect_no_placeholders() {
        let (protected, tokens) = protect("Hello, world!");
        assert_eq!(protected, "Hello, world!");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_protect_single_positional() {
        let (protected, tokens) = protect("Hello, %s!");
        assert_eq!(protected, "Hello, <x1/>!");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, "<x1/>");
        assert_eq!(tokens[0].placeholder, "%s");
    }

    #[test]
    fn test_protect_named_and_positional() {
        let (protected, tokens) = protect("Hello %(name)s, you have %d items");
        assert_eq!(protected, "Hello <x1/>, you have <x2/> items");
        assert_eq!(tokens[0].placeholder, "%(name)s");
        assert_eq!(tokens[1].placeholder, "%d");
    }

    #[test]
    fn test_protect_brace_styles() {
        let (protected, tokens) = protect("{} then {0} then {name} then {count:.2f}");
        assert_eq!(protected, "<x1/> then <x2/> then <x3/> then <x4/>");
        assert_eq!(tokens[3].placeholder, "{count:.2f}");
    }

    #[test]
    fn test_protect_literal_percent() {
        let (protected, tokens) = protect("Progress: %d%%");
        assert_eq!(protected, "Progress: <x1/><x2/>");
        assert_eq!(tokens[0].placeholder, "%d");
        assert_eq!(tokens[1].placeholder, "%%");
    }

    #[test]
    fn test_protect_width_and_precision() {
        let (protected, tokens) = protect("Value: %05.2f");
        assert_eq!(protected, "Value: <x1/>");
        assert_eq!(tokens[0].placeholder, "%05.2f");
    }

    #[test]
    fn test_protect_duplicate_placeholders_get_distinct_tokens() {
        let (protected, tokens) = protect("%s copied to %s");
        assert_eq!(protected, "<x1/> copied to <x2/>");
        assert_eq!(tokens[0].placeholder, "%s");
        assert_eq!(tokens[1].placeholder, "%s");
        assert_ne!(tokens[0].token, tokens[1].token);
    }

    #[test]
    fn test_protect_tokens_ascend_in_reading_order() {
        let (protected, tokens) = protect("%(a)s %(b)s %(c)s");
        assert_eq!(protected, "<x1/> <x2/> <x3/>");
        let placeholders: Vec<&str> = tokens.iter().map(|t| t.placeholder.as_str()).collect();
        assert_eq!(placeholders, vec!["%(a)s", "%(b)s", "%(c)s"]);
    }

    #[test]
    fn test_protect_named_wins_over_positional() {
        // "%(name)s" must match as one named placeholder, not leave a
        // dangling positional match inside it.
        let (protected, tokens) = protect("%(name)s");
        assert_eq!(protected, "<x1/>");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].placeholder, "%(name)s");
    }

    #[test]
    fn test_protect_ignores_prose_braces() {
        let (protected, tokens) = protect("see {the manual} for details");
        assert_eq!(protected, "see {the manual} for details");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_protect_empty_text() {
        let (protected, tokens) = protect("");
        assert_eq!(protected, "");
        assert!(tokens.is_empty());
    }

    // ========== Restore Tests ==========

    #[test]
    fn test_restore_simple() {
        let (protected, tokens) = protect("Hello, %s!");
        assert_eq!(restore(&protected, &tokens), "Hello, %s!");
    }

    #[test]
    fn test_restore_reordered_tokens() {
        let (_, tokens) = protect("Hello %(name)s, you have %d items");
        // Provider moved the tokens around; each must restore by index,
        // not by position.
        let translated = "Olá <x2/>, você tem <x1/> itens";
        assert_eq!(
            restore(translated, &tokens),
            "Olá %d, você tem %(name)s itens"
        );
    }

    #[test]
    fn test_restore_space_before_slash() {
        let (_, tokens) = protect("Hello, %s!");
        assert_eq!(restore("Bonjour, <x1 />!", &tokens), "Bonjour, %s!");
    }

    #[test]
    fn test_restore_space_after_open() {
        let (_, tokens) = protect("Hello, %s!");
        assert_eq!(restore("Bonjour, < x1/>!", &tokens), "Bonjour, %s!");
    }

    #[test]
    fn test_restore_missing_token_left_alone() {
        let (_, tokens) = protect("Hello %(name)s, you have %d items");
        // Provider dropped <x2/> entirely; restore only fixes what is there.
        let translated = "Olá <x1/>";
        assert_eq!(restore(translated, &tokens), "Olá %(name)s");
    }

    #[test]
    fn test_restore_empty_map_is_identity() {
        let tokens: TokenMap = Vec::new();
        assert_eq!(restore("anything", &tokens), "anything");
    }

    // ========== Round-trip Tests ==========

    #[test]
    fn test_roundtrip_mixed_families() {
        let original = "Copy %(src)s to {dest} using %d threads (%%)";
        let (protected, tokens) = protect(original);
        assert_eq!(restore(&protected, &tokens), original);
    }

    #[test]
    fn test_roundtrip_only_placeholder() {
        let original = "%s";
        let (protected, tokens) = protect(original);
        assert_eq!(protected, "<x1/>");
        assert_eq!(restore(&protected, &tokens), original);
    }

    #[test]
    fn test_roundtrip_adjacent_placeholders() {
        let original = "%s%s%s";
        let (protected, tokens) = protect(original);
        assert_eq!(protected, "<x1/><x2/><x3/>");
        assert_eq!(restore(&protected, &tokens), original);
    }

    // ========== Family Extraction Tests ==========

    #[test]
    fn test_family_matches_named() {
        let found = PlaceholderFamily::NamedPrintf.matches("%(a)s and %(b)d");
        assert_eq!(found, vec!["%(a)s", "%(b)d"]);
    }

    #[test]
    fn test_family_matches_positional() {
        let found = PlaceholderFamily::PositionalPrintf.matches("%s %d %%");
        assert_eq!(found, vec!["%s", "%d", "%%"]);
    }

    #[test]
    fn test_family_matches_brace() {
        let found = PlaceholderFamily::Brace.matches("{0} and {name}");
        assert_eq!(found, vec!["{0}", "{name}"]);
    }
}
