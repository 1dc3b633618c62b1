//! Demo error types using thiserror.

use polingo_common::LoggingError;
use polingo_config::ConfigError;
use polingo_i18n::I18nError;

/// Errors that stop the demo before it can render anything.
#[derive(thiserror::Error, Debug)]
pub enum DemoError {
    /// Configuration could not be loaded or validated.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The translator rejected the configuration or a locale.
    #[error("Translation error: {0}")]
    I18n(#[from] I18nError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// A command line argument could not be used.
    #[error("Invalid value for {arg}: {message}")]
    InvalidArgument {
        /// Argument name.
        arg: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// The catalog location needs a source this build does not include.
    #[error("Unsupported catalog source '{0}' (build with the `http` feature)")]
    UnsupportedSource(String),
}

/// Result type for the demo.
pub type DemoResult<T> = Result<T, DemoError>;
