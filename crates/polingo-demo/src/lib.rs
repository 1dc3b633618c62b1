//! # Polingo Demo
//!
//! Command-line counterpart of the Polingo web demo: it prints the current
//! locale, a "change locale" label and a greeting, then flips between
//! English and Spanish the way the demo's button does.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::DemoApp;
pub use cli::Args;
pub use error::{DemoError, DemoResult};
