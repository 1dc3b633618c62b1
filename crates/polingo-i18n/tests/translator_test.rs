//! Integration tests for the translator facade.

use async_trait::async_trait;
use parking_lot::Mutex;
use polingo_common::test_utils::{catalog_fixtures, create_temp_dir, init_test_logging, write_catalog};
use polingo_config::{CacheConfig, CatalogFormat, Config};
use polingo_i18n::{
    vars, CatalogSource, FileSource, I18nError, LoadError, LoadPhase, Locale, Translator,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory source with per-locale delays and a fetch counter.
#[derive(Default)]
struct TestSource {
    documents: Mutex<HashMap<String, String>>,
    delays: Mutex<HashMap<String, Duration>>,
    fetches: AtomicUsize,
}

impl TestSource {
    fn fixtures() -> Arc<Self> {
        let source = Self::default();
        source.put("en", catalog_fixtures::EN_JSON);
        source.put("es", catalog_fixtures::ES_JSON);
        Arc::new(source)
    }

    fn put(&self, locale: &str, document: &str) {
        self.documents
            .lock()
            .insert(locale.to_string(), document.to_string());
    }

    fn delay(&self, locale: &str, delay: Duration) {
        self.delays.lock().insert(locale.to_string(), delay);
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for TestSource {
    async fn fetch(&self, locale: &Locale, format: CatalogFormat) -> Result<String, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays.lock().get(locale.as_str()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let document = self.documents.lock().get(locale.as_str()).cloned();
        document.ok_or_else(|| LoadError::NotFound {
            location: self.location(locale, format),
        })
    }

    fn location(&self, locale: &Locale, format: CatalogFormat) -> String {
        format!("test:{}.{}", locale, format.extension())
    }
}

fn locale(tag: &str) -> Locale {
    Locale::parse(tag).unwrap()
}

fn config(tags: &[&str]) -> Config {
    let locales: Vec<Locale> = tags.iter().map(|tag| locale(tag)).collect();
    Config::new(locales[0].clone(), locales, "test")
}

async fn ready_translator(config: Config, source: Arc<TestSource>) -> Translator {
    init_test_logging();
    let translator = Translator::new(config, source).unwrap();
    let status = translator.ready().await;
    assert_eq!(status.phase, LoadPhase::Ready);
    translator
}

#[tokio::test]
async fn test_switch_to_spanish_goes_through_loading() {
    let translator = ready_translator(config(&["en", "es"]), TestSource::fixtures()).await;
    assert_eq!(translator.t("hello", None), "Hello!");
    assert_eq!(translator.t("change locale", None), "Change language");

    let mut locale_rx = translator.subscribe();
    translator.set_locale("es").unwrap();

    assert!(translator.loading());
    locale_rx.changed().await.unwrap();
    assert_eq!(*locale_rx.borrow_and_update(), locale("es"));

    let status = translator.ready().await;
    assert!(!status.loading());
    assert!(status.error.is_none());
    assert_eq!(translator.locale(), locale("es"));
    assert_eq!(translator.t("hello", None), "¡Hola!");
    assert_eq!(translator.t("change locale", None), "Cambiar idioma");
}

#[tokio::test]
async fn test_status_watch_reports_transitions() {
    let source = TestSource::fixtures();
    source.delay("es", Duration::from_millis(50));
    let translator = ready_translator(config(&["en", "es"]), source).await;

    let mut status_rx = translator.watch_status();
    translator.set_locale("es").unwrap();

    status_rx.changed().await.unwrap();
    assert_eq!(status_rx.borrow_and_update().phase, LoadPhase::Loading);
    status_rx.changed().await.unwrap();
    assert_eq!(status_rx.borrow_and_update().phase, LoadPhase::Ready);
}

#[tokio::test]
async fn test_set_and_get_locale() {
    let translator = ready_translator(config(&["en", "es"]), TestSource::fixtures()).await;

    for tag in ["es", "en", "es"] {
        translator.set_locale(tag).unwrap();
        assert_eq!(translator.locale(), locale(tag));
    }

    for tag in ["fr", "", "de-DE"] {
        let err = translator.set_locale(tag).unwrap_err();
        assert!(matches!(err, I18nError::InvalidLocale { .. }));
        assert_eq!(translator.locale(), locale("es"));
    }
}

#[tokio::test]
async fn test_spanish_only_key_falls_back_to_source_text() {
    let translator = ready_translator(config(&["en", "es"]), TestSource::fixtures()).await;
    translator.preload(&[locale("es")]).await;

    assert_eq!(translator.t("only in spanish", None), "only in spanish");
    assert!(!translator.has_translation(None, "only in spanish"));
}

#[tokio::test]
async fn test_context_isolation() {
    let translator = ready_translator(config(&["en", "es"]), TestSource::fixtures()).await;

    assert_eq!(translator.tp("menu", "File", None), "File menu");
    assert_eq!(translator.tp("document", "File", None), "Document file");
    assert_eq!(translator.t("File", None), "File");
    assert_eq!(translator.tp("toolbar", "File", None), "File");
    assert_eq!(translator.tp("", "hello", None), "Hello!");

    assert_eq!(
        translator.tnp("document", "{n} page", "{n} pages", 2, None),
        "2 pages"
    );
    assert!(translator.has_translation(Some("menu"), "File"));
}

#[tokio::test]
async fn test_plural_and_interpolation() {
    let translator = ready_translator(config(&["en", "es"]), TestSource::fixtures()).await;

    let one = vars!["n" => 1];
    let zero = vars!["n" => 0];
    let five = vars!["n" => 5];
    assert_eq!(translator.tn("1 item", "{n} items", 1, Some(&one)), "1 item");
    assert_eq!(translator.tn("1 item", "{n} items", 0, Some(&zero)), "0 items");
    assert_eq!(translator.tn("1 item", "{n} items", 5, Some(&five)), "5 items");

    assert_eq!(translator.tn("{n} item", "{n} items", 1, None), "1 item");
    assert_eq!(
        translator.t("welcome", Some(&vars!["name" => "Ana"])),
        "Welcome, Ana!"
    );
    assert_eq!(translator.t("welcome", None), "Welcome, {name}!");

    translator.set_locale("es").unwrap();
    translator.ready().await;
    assert_eq!(translator.tn("{n} item", "{n} items", 0, None), "0 elementos");
    assert_eq!(translator.tn("{n} item", "{n} items", 1, None), "1 elemento");
}

#[tokio::test]
async fn test_later_switch_supersedes_slow_load() {
    let source = TestSource::fixtures();
    source.delay("es", Duration::from_millis(200));
    let translator = ready_translator(config(&["en", "es"]), Arc::clone(&source)).await;

    translator.set_locale("es").unwrap();
    translator.set_locale("en").unwrap();

    let status = translator.ready().await;
    assert_eq!(status.phase, LoadPhase::Ready);

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(translator.locale(), locale("en"));
    assert_eq!(translator.status().phase, LoadPhase::Ready);
    assert_eq!(translator.t("hello", None), "Hello!");
    assert!(!translator.loaded_locales().contains(&locale("es")));
}

#[tokio::test]
async fn test_repeated_switch_while_loading_fetches_once() {
    let source = TestSource::fixtures();
    source.delay("es", Duration::from_millis(50));
    let translator = ready_translator(config(&["en", "es"]), Arc::clone(&source)).await;
    let before = source.fetches();

    translator.set_locale("es").unwrap();
    translator.set_locale("es").unwrap();
    translator.ready().await;

    assert_eq!(source.fetches() - before, 1);
    assert_eq!(translator.t("hello", None), "¡Hola!");
}

#[tokio::test]
async fn test_load_error_is_reported_and_retried() {
    let source = TestSource::fixtures();
    source.put("de", "{ broken");
    let translator = ready_translator(config(&["en", "es", "de"]), Arc::clone(&source)).await;

    translator.set_locale("de").unwrap();
    let status = translator.ready().await;

    assert_eq!(status.phase, LoadPhase::Error);
    assert!(matches!(status.error(), Some(LoadError::Json { .. })));
    assert_eq!(translator.t("hello", None), "hello");

    let before = source.fetches();
    translator.set_locale("de").unwrap();
    translator.ready().await;
    assert_eq!(source.fetches() - before, 1);
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_catalog() {
    let source = TestSource::fixtures();
    let translator = ready_translator(config(&["en", "es"]), Arc::clone(&source)).await;

    source.put("en", "{ broken");
    let err = translator.reload().await.unwrap_err();
    assert!(matches!(err, I18nError::Load(_)));
    assert_eq!(translator.status().phase, LoadPhase::Error);
    assert_eq!(translator.t("hello", None), "Hello!");

    source.put("en", &catalog_fixtures::EN_JSON.replace("Hello!", "Hi!"));
    translator.reload().await.unwrap();
    assert!(translator.status().is_ready());
    assert_eq!(translator.t("hello", None), "Hi!");
}

#[tokio::test]
async fn test_cache_reuses_catalogs() {
    let source = TestSource::fixtures();
    let translator = ready_translator(config(&["en", "es"]), Arc::clone(&source)).await;

    for tag in ["es", "en", "es"] {
        translator.set_locale(tag).unwrap();
        translator.ready().await;
    }

    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn test_disabled_cache_always_fetches() {
    let source = TestSource::fixtures();
    let mut config = config(&["en", "es"]);
    config.cache = CacheConfig::disabled();
    let translator = ready_translator(config, Arc::clone(&source)).await;

    for tag in ["es", "en", "es"] {
        translator.set_locale(tag).unwrap();
        translator.ready().await;
    }

    assert_eq!(source.fetches(), 4);
}

#[tokio::test]
async fn test_fallback_locale_consulted() {
    let mut config = config(&["en", "es"]);
    config.fallback = Some(locale("es"));
    let translator = ready_translator(config, TestSource::fixtures()).await;
    translator.preload(&[locale("es")]).await;

    assert_eq!(translator.t("only in spanish", None), "solo en español");
    assert_eq!(translator.t("hello", None), "Hello!");
    assert_eq!(translator.t("nowhere", None), "nowhere");
}

#[tokio::test]
async fn test_preload_reports_per_locale() {
    let translator = ready_translator(config(&["en", "es"]), TestSource::fixtures()).await;

    let results = translator.preload(&[locale("es"), locale("fr")]).await;

    assert_eq!(results.len(), 2);
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(I18nError::InvalidLocale { .. })));
    assert_eq!(translator.loaded_locales(), vec![locale("en"), locale("es")]);
    assert_eq!(translator.locale(), locale("en"));
    assert_eq!(translator.supported_locales(), vec![locale("en"), locale("es")]);
}

#[tokio::test]
async fn test_missing_initial_catalog_degrades_to_source_text() {
    init_test_logging();
    let source = Arc::new(TestSource::default());
    let translator = Translator::new(config(&["en"]), source).unwrap();

    let status = translator.ready().await;
    assert_eq!(status.phase, LoadPhase::Error);
    assert!(matches!(status.error(), Some(LoadError::NotFound { .. })));
    assert_eq!(translator.t("hello", None), "hello");
    assert_eq!(translator.tn("{n} item", "{n} items", 2, None), "2 items");
}

#[tokio::test]
async fn test_po_catalogs_from_disk() {
    init_test_logging();
    let dir = create_temp_dir();
    write_catalog(dir.path(), "ru", "po", catalog_fixtures::RU_PO);

    let mut config = config(&["ru"]);
    config.loader.format = CatalogFormat::Po;
    let translator = Translator::new(config, Arc::new(FileSource::new(dir.path()))).unwrap();
    assert!(translator.ready().await.is_ready());

    assert_eq!(translator.t("hello", None), "Привет!");
    assert_eq!(translator.tp("menu", "File", None), "Файл");
    assert_eq!(translator.tn("{n} item", "{n} items", 1, None), "1 предмет");
    assert_eq!(translator.tn("{n} item", "{n} items", 3, None), "3 предмета");
    assert_eq!(translator.tn("{n} item", "{n} items", 25, None), "25 предметов");
    assert_eq!(translator.t("draft", None), "draft");
}

#[test]
fn test_clones_share_state() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let translator = ready_translator(config(&["en", "es"]), TestSource::fixtures()).await;
        let view = translator.clone();

        translator.set_locale("es").unwrap();
        view.ready().await;

        assert_eq!(view.locale(), locale("es"));
        assert_eq!(view.t("hello", None), "¡Hola!");
    });
}

#[tokio::test]
async fn test_plural_index_clamped_to_entry_forms() {
    let source = Arc::new(TestSource::default());
    source.put(
        "ru",
        r#"{
  "headers": {
    "Plural-Forms": "nplurals=3; plural=(n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);"
  },
  "translations": {
    "": {
      "{n} file": { "msgid": "{n} file", "msgid_plural": "{n} files", "msgstr": ["{n} файл", "{n} файла"] }
    }
  }
}"#,
    );
    let translator = ready_translator(config(&["ru"]), source).await;

    assert_eq!(translator.tn("{n} file", "{n} files", 1, None), "1 файл");
    assert_eq!(translator.tn("{n} file", "{n} files", 3, None), "3 файла");
    assert_eq!(translator.tn("{n} file", "{n} files", 5, None), "5 файла");
}

#[tokio::test]
async fn test_malformed_po_settles_as_error() {
    init_test_logging();
    let source = Arc::new(TestSource::default());
    source.put(
        "ru",
        "msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[18446744073709551615] \"x\"\n",
    );
    let mut config = config(&["ru"]);
    config.loader.format = CatalogFormat::Po;
    let translator = Translator::new(config, source).unwrap();

    let status = tokio::time::timeout(Duration::from_secs(5), translator.ready())
        .await
        .expect("load never settled");
    assert_eq!(status.phase, LoadPhase::Error);
    assert!(matches!(status.error(), Some(LoadError::Parse { line: 3, .. })));
    assert_eq!(translator.t("a", None), "a");
}

/// Source whose fetch panics for every locale.
struct PanickingSource;

#[async_trait]
impl CatalogSource for PanickingSource {
    async fn fetch(&self, locale: &Locale, _: CatalogFormat) -> Result<String, LoadError> {
        panic!("no catalog for {locale}");
    }

    fn location(&self, locale: &Locale, format: CatalogFormat) -> String {
        format!("panic:{}.{}", locale, format.extension())
    }
}

#[tokio::test]
async fn test_panicking_load_settles_as_error() {
    init_test_logging();
    let translator = Translator::new(config(&["en", "es"]), Arc::new(PanickingSource)).unwrap();

    let status = tokio::time::timeout(Duration::from_secs(5), translator.ready())
        .await
        .expect("load never settled");
    assert_eq!(status.phase, LoadPhase::Error);
    match status.error() {
        Some(LoadError::Panicked { location, message }) => {
            assert_eq!(location, "panic:en.json");
            assert_eq!(message, "no catalog for en");
        }
        other => panic!("unexpected status error: {other:?}"),
    }
    assert_eq!(translator.t("hello", None), "hello");

    translator.set_locale("es").unwrap();
    let status = tokio::time::timeout(Duration::from_secs(5), translator.ready())
        .await
        .expect("load never settled");
    assert_eq!(status.phase, LoadPhase::Error);
}

#[test]
fn test_concurrent_switches_settle_on_the_active_locale() {
    init_test_logging();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap();

    let source = TestSource::fixtures();
    source.put(
        "fr",
        r#"{ "translations": { "": { "hello": { "msgid": "hello", "msgstr": ["Bonjour !"] } } } }"#,
    );
    let mut config = config(&["en", "es", "fr"]);
    config.cache = CacheConfig::disabled();
    let translator = runtime.block_on(ready_translator(config, source));

    for round in 0..200 {
        let barrier = Arc::new(std::sync::Barrier::new(2));
        let workers: Vec<_> = ["es", "fr"]
            .into_iter()
            .map(|tag| {
                let translator = translator.clone();
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    translator.set_locale(tag).unwrap();
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let status = runtime
            .block_on(async { tokio::time::timeout(Duration::from_secs(5), translator.ready()).await })
            .unwrap_or_else(|_| panic!("round {round}: load never settled"));
        assert_eq!(status.phase, LoadPhase::Ready, "round {round}");

        let expected = if translator.locale() == "es" { "¡Hola!" } else { "Bonjour !" };
        assert_eq!(translator.t("hello", None), expected, "round {round}");

        translator.set_locale("en").unwrap();
        runtime.block_on(translator.ready());
    }
}
