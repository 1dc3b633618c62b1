//! # Polingo Config
//!
//! Type-safe configuration for the Polingo translation runtime.
//!
//! This crate provides the configuration schema, YAML loading with
//! environment variable overrides, validation of the supported locale
//! set, and a lock-free shared handle for the running translator.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use cache::ConfigCache;
pub use loader::{ConfigError, ConfigLoader};
pub use schema::{CacheConfig, CatalogFormat, Config, LoaderConfig};
