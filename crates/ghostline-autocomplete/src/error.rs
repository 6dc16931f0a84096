//! Error types for the autocomplete engine

use thiserror::Error;

/// Result type alias for autocomplete operations
pub type AutocompleteResult<T> = std::result::Result<T, AutocompleteError>;

/// Errors produced by the autocomplete engine and its collaborators
///
/// Fetch-side variants never reach the user: the fetch boundary logs them and
/// degrades to "no suggestion".
#[derive(Debug, Error)]
pub enum AutocompleteError {
    /// Transport failure talking to the suggestion endpoint
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// Suggestion endpoint answered with a non-success status
    #[error("Suggestion endpoint returned status {status}")]
    HttpStatus { status: u16 },

    /// No credential was available for an authenticated request
    #[error("No credential available for suggestion request")]
    MissingCredential,

    /// I/O errors while reading configuration
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON parsing errors
    #[error("JSON parsing error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML parsing error: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },

    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Key binding could not be parsed
    #[error("Invalid key binding: {0}")]
    InvalidKeyBinding(#[from] KeyParseError),

    /// A suggestion did not satisfy the prefix/anchor invariants
    #[error("Invalid suggestion: {0}")]
    InvalidSuggestion(String),

    /// The plugin was constructed outside a tokio runtime
    #[error("Autocomplete plugin requires a running tokio runtime")]
    NoRuntime,
}

/// Errors that can occur while parsing key bindings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("Empty key combination")]
    Empty,

    #[error("Invalid modifier: {0}")]
    InvalidModifier(String),

    #[error("Unknown key: {0}")]
    UnknownKey(String),
}
