//! Error types for translation runtime operations

use thiserror::Error;

/// Errors surfaced to callers of the translation runtime.
///
/// Lookups never produce these: a missing key always degrades to the
/// caller's source text.
#[derive(Error, Debug)]
pub enum I18nError {
    /// The requested locale is not in the configured set
    #[error("Locale '{locale}' is not supported (supported: {supported})")]
    InvalidLocale { locale: String, supported: String },

    /// No built-in plural rule exists for the locale
    #[error("No plural rule for locale '{0}'")]
    UnsupportedLocale(String),

    /// The configuration did not pass validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] polingo_config::ConfigError),

    /// The translator was created outside a tokio runtime
    #[error("Translator requires a running tokio runtime")]
    NoRuntime,

    /// A catalog failed to load
    #[error(transparent)]
    Load(#[from] std::sync::Arc<LoadError>),
}

/// Failures while fetching or parsing a catalog document.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The document does not exist at the configured location
    #[error("Catalog not found: {location}")]
    NotFound { location: String },

    /// Reading the document failed
    #[error("Failed to read catalog {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// The server answered with a non-success status
    #[error("Catalog request to {location} failed with HTTP {status}")]
    Http { location: String, status: u16 },

    /// The request never produced a response
    #[error("Catalog request to {location} failed: {message}")]
    Transport { location: String, message: String },

    /// The JSON document is malformed
    #[error("Failed to parse JSON catalog for locale {locale}: {source}")]
    Json {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    /// The PO document is malformed
    #[error("Failed to parse PO catalog at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Fetching or parsing panicked
    #[error("Loading catalog {location} panicked: {message}")]
    Panicked { location: String, message: String },
}

/// Result type for runtime operations
pub type I18nResult<T> = Result<T, I18nError>;
