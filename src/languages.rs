//! Supported target languages and API language-code aliases
//!
//! The table order is significant: it defines the batch processing order and
//! the index reported to progress callbacks.

/// Target languages supported by the batch, in processing order.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("bg", "Bulgarian"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("et", "Estonian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hr", "Croatian"),
    ("hu", "Hungarian"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt-BR", "Portuguese (Brazil)"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sk", "Slovak"),
    ("sv", "Swedish"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("zh", "Chinese"),
];

/// Look up the display name for a language code
pub fn display_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Whether the language code is in the supported set
pub fn is_supported(code: &str) -> bool {
    display_name(code).is_some()
}

/// Convert a language code to the alias most translation APIs expect
///
/// A few of our codes differ from what the common HTTP APIs use:
/// `pt-BR` → `pt`, `no` → `nb` (Bokmål), `he` → `iw`, `zh` → `zh-CN`.
pub fn api_lang_code(code: &str) -> &str {
    match code {
        "pt-BR" => "pt",
        "no" => "nb",
        "he" => "iw",
        "zh" => "zh-CN",
        other => other,
    }
}
