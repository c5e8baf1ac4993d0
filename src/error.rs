/// Error types for the translation engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Provider failure: network, auth, quota, malformed response
    Provider(String),
    /// Placeholder multiset mismatch that repair could not fix
    Validation(String),
    /// Catalog could not be read or written
    Persistence(String),
    /// Fatal configuration problem: nothing was attempted
    Config(String),
    /// Malformed PO input
    Parse { line: usize, message: String },
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::Provider(msg) => write!(f, "Provider error: {}", msg),
            TranslateError::Validation(msg) => write!(f, "Validation error: {}", msg),
            TranslateError::Persistence(msg) => write!(f, "Persistence error: {}", msg),
            TranslateError::Config(msg) => write!(f, "Configuration error: {}", msg),
            TranslateError::Parse { line, message } => {
                write!(f, "Parse error at line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for TranslateError {}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        TranslateError::Provider(e.to_string())
    }
}

impl From<std::io::Error> for TranslateError {
    fn from(e: std::io::Error) -> Self {
        TranslateError::Persistence(e.to_string())
    }
}

/// Result type for translation operations
pub type TranslateResult<T> = Result<T, TranslateError>;
