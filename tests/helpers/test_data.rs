//! Catalog fixtures and instrumented loaders

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use tokio::sync::oneshot;

use untitled_i18n::i18n::{CatalogLoader, I18nOptions, Messages, Namespace, StaticCatalogLoader};
use untitled_i18n::{CurrencyCode, I18nError, LocaleCode};

pub fn locale(tag: &str) -> LocaleCode {
    LocaleCode::parse(tag).expect("valid locale tag")
}

pub fn currency(code: &str) -> CurrencyCode {
    CurrencyCode::parse(code).expect("valid currency code")
}

pub fn messages<const N: usize>(pairs: [(&str, &str); N]) -> Messages {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// `en`/`es` options with `USD` as the default currency
pub fn en_es_options() -> I18nOptions {
    I18nOptions::new(vec![locale("en"), locale("es")], locale("en"), currency("USD"))
}

pub fn hello_catalogs() -> StaticCatalogLoader {
    StaticCatalogLoader::new()
        .with_locale(locale("en"), [("hello", "Hello")])
        .with_locale(locale("es"), [("hello", "Hola")])
}

/// Wraps a loader and records every `(locale, namespace)` request
#[derive(Clone)]
pub struct RecordingLoader<L> {
    inner: Arc<L>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl<L: CatalogLoader> RecordingLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner: Arc::new(inner),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl<L: CatalogLoader> CatalogLoader for RecordingLoader<L> {
    fn load(&self, locale: LocaleCode, namespace: Namespace) -> BoxFuture<'static, Result<Messages, I18nError>> {
        self.calls
            .lock()
            .unwrap()
            .push((locale.to_string(), namespace.to_string()));
        self.inner.load(locale, namespace)
    }
}

/// Loader whose responses are held back until the test releases them
///
/// Each locale gets one gate; a load for that locale waits on it.
pub struct GatedLoader {
    catalogs: HashMap<String, Messages>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl GatedLoader {
    pub fn new() -> Self {
        Self {
            catalogs: HashMap::new(),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Register a catalog and return the sender that releases its load
    pub fn gate(&mut self, locale: &str, catalog: Messages) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.catalogs.insert(locale.to_string(), catalog);
        self.gates.lock().unwrap().insert(locale.to_string(), rx);
        tx
    }
}

impl CatalogLoader for GatedLoader {
    fn load(&self, locale: LocaleCode, _namespace: Namespace) -> BoxFuture<'static, Result<Messages, I18nError>> {
        let gate = self.gates.lock().unwrap().remove(locale.as_str());
        let catalog = self.catalogs.get(locale.as_str()).cloned().unwrap_or_default();
        Box::pin(async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(catalog)
        })
    }
}
