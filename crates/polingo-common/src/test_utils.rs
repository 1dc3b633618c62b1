//! Test utilities and shared fixtures for the Polingo workspace.
//!
//! Enabled for dependents through the `testing` feature.

use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `contents` to `{dir}/{locale}.{ext}` and return the path.
pub fn write_catalog(dir: &Path, locale: &str, ext: &str, contents: &str) -> PathBuf {
    let path = dir.join(format!("{locale}.{ext}"));
    std::fs::write(&path, contents).expect("Failed to write catalog fixture");
    path
}

/// Create a temporary directory holding the English and Spanish JSON fixtures.
#[cfg(feature = "tempfile")]
pub fn create_catalog_dir() -> tempfile::TempDir {
    let dir = create_temp_dir();
    write_catalog(dir.path(), "en", "json", catalog_fixtures::EN_JSON);
    write_catalog(dir.path(), "es", "json", catalog_fixtures::ES_JSON);
    dir
}

/// Catalog documents shared by the integration suites.
pub mod catalog_fixtures {
    /// English catalog in gettext-parser JSON shape.
    pub const EN_JSON: &str = r#"{
  "charset": "utf-8",
  "headers": {
    "Language": "en",
    "Plural-Forms": "nplurals=2; plural=(n != 1);"
  },
  "translations": {
    "": {
      "": { "msgid": "", "msgstr": ["Language: en\n"] },
      "hello": { "msgid": "hello", "msgstr": ["Hello!"] },
      "change locale": { "msgid": "change locale", "msgstr": ["Change language"] },
      "welcome": { "msgid": "welcome", "msgstr": ["Welcome, {name}!"] },
      "File": { "msgid": "File", "msgstr": ["File"] },
      "{n} item": {
        "msgid": "{n} item",
        "msgid_plural": "{n} items",
        "msgstr": ["{n} item", "{n} items"]
      },
      "draft": { "msgid": "draft", "msgstr": [""] }
    },
    "menu": {
      "File": { "msgid": "File", "msgctxt": "menu", "msgstr": ["File menu"] }
    },
    "document": {
      "File": { "msgid": "File", "msgctxt": "document", "msgstr": ["Document file"] },
      "{n} page": {
        "msgid": "{n} page",
        "msgctxt": "document",
        "msgid_plural": "{n} pages",
        "msgstr": ["{n} page", "{n} pages"]
      }
    }
  }
}"#;

    /// Spanish catalog in gettext-parser JSON shape.
    pub const ES_JSON: &str = r#"{
  "charset": "utf-8",
  "headers": {
    "Language": "es",
    "Plural-Forms": "nplurals=2; plural=(n != 1);"
  },
  "translations": {
    "": {
      "hello": { "msgid": "hello", "msgstr": ["¡Hola!"] },
      "change locale": { "msgid": "change locale", "msgstr": ["Cambiar idioma"] },
      "welcome": { "msgid": "welcome", "msgstr": ["¡Bienvenido, {name}!"] },
      "only in spanish": { "msgid": "only in spanish", "msgstr": ["solo en español"] },
      "{n} item": {
        "msgid": "{n} item",
        "msgid_plural": "{n} items",
        "msgstr": ["{n} elemento", "{n} elementos"]
      }
    },
    "menu": {
      "File": { "msgid": "File", "msgctxt": "menu", "msgstr": ["Archivo"] }
    },
    "document": {
      "File": { "msgid": "File", "msgctxt": "document", "msgstr": ["Fichero"] },
      "{n} page": {
        "msgid": "{n} page",
        "msgctxt": "document",
        "msgid_plural": "{n} pages",
        "msgstr": ["{n} página", "{n} páginas"]
      }
    }
  }
}"#;

    /// Russian catalog in PO form, exercising three plural forms.
    pub const RU_PO: &str = r#"# Russian translations
msgid ""
msgstr ""
"Language: ru\n"
"Plural-Forms: nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && "
"n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);\n"

msgid "hello"
msgstr "Привет!"

msgctxt "menu"
msgid "File"
msgstr "Файл"

msgid "{n} item"
msgid_plural "{n} items"
msgstr[0] "{n} предмет"
msgstr[1] "{n} предмета"
msgstr[2] "{n} предметов"

#, fuzzy
msgid "draft"
msgstr "черновик"
"#;
}
