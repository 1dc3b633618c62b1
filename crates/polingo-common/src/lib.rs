//! # Polingo Common
//!
//! Shared types, logging bootstrap, and test utilities for the Polingo
//! workspace.
//!
//! Every other crate depends on the [`Locale`] newtype defined here, so
//! locale tags are parsed and canonicalized exactly once at the edge.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod logging;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingError};
pub use types::{Locale, LocaleTagError};
