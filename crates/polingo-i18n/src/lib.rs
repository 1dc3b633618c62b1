//! Translation runtime for Polingo
//!
//! This crate resolves gettext-style catalogs at runtime. It includes:
//!
//! - Catalog parsing from gettext-parser JSON and PO documents
//! - Built-in cardinal plural rules plus `Plural-Forms` header evaluation
//! - `{name}` placeholder interpolation
//! - Asynchronous catalog loading with an optional in-memory cache
//! - A locale controller with change notification and a loading/error status
//! - Fallback to the caller's source text for anything untranslated
//!
//! # Example
//!
//! ```rust
//! use polingo_i18n::{vars, FileSource, Translator};
//! use polingo_config::Config;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let translator = Translator::new(Config::default(), Arc::new(FileSource::new("i18n")))?;
//! translator.ready().await;
//!
//! println!("{}", translator.t("hello", None));
//! println!("{}", translator.tn("{n} item", "{n} items", 3, None));
//! println!("{}", translator.tp("menu", "File", None));
//! println!("{}", translator.t("welcome", Some(&vars!["name" => "Ana"])));
//!
//! translator.set_locale("es")?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod interpolate;
pub mod loader;
pub mod locale;
pub mod plural;
pub mod plural_forms;
pub mod po;
pub mod source;
pub mod status;
pub mod store;
pub mod translator;

pub use catalog::{Catalog, MessageEntry, MessageKey};
pub use error::{I18nError, I18nResult, LoadError};
pub use interpolate::{render, Value, Variables};
pub use loader::{parse_catalog, CatalogLoader, LoadResult, LoaderMetrics};
pub use locale::LocaleController;
pub use plural::{select_form, PluralCategory, PluralRule};
pub use plural_forms::{PluralForms, PluralFormsError};
pub use po::parse_po;
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{CatalogSource, FileSource, MemorySource};
pub use status::{LoadPhase, LoadStatus};
pub use store::CatalogStore;
pub use translator::Translator;

pub use polingo_common::Locale;
