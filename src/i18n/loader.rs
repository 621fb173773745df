//! Catalog loaders
//!
//! The manager only sees [`CatalogLoader`]: an async `(locale, namespace) ->
//! Messages` function. Everything about where catalogs live and what shape
//! their documents have is private to the individual loader.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::intl::LocaleCode;
use crate::utils::errors::{I18nError, Result};

use super::types::{Messages, Namespace};

/// Source of message catalogs
///
/// Implementations should resolve to an empty catalog rather than fail when
/// nothing is found. The manager treats an `Err` the same way, so failing is
/// never fatal, only noisier.
pub trait CatalogLoader: Send + Sync {
    fn load(&self, locale: LocaleCode, namespace: Namespace) -> BoxFuture<'static, Result<Messages>>;
}

impl<F, Fut> CatalogLoader for F
where
    F: Fn(LocaleCode, Namespace) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Messages>> + Send + 'static,
{
    fn load(&self, locale: LocaleCode, namespace: Namespace) -> BoxFuture<'static, Result<Messages>> {
        Box::pin(self(locale, namespace))
    }
}

/// Loader used when none is configured; always yields an empty catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCatalogLoader;

impl CatalogLoader for EmptyCatalogLoader {
    fn load(&self, _locale: LocaleCode, _namespace: Namespace) -> BoxFuture<'static, Result<Messages>> {
        Box::pin(async { Ok(Messages::new()) })
    }
}

/// In-memory catalogs, mostly for tests and embedded defaults
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogLoader {
    catalogs: HashMap<(LocaleCode, Namespace), Messages>,
    any_namespace: HashMap<LocaleCode, Messages>,
}

impl StaticCatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog for one `(locale, namespace)` pair
    pub fn with_catalog<I, K, V>(mut self, locale: LocaleCode, namespace: impl Into<Namespace>, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let messages = collect_messages(messages);
        self.catalogs.insert((locale, namespace.into()), messages);
        self
    }

    /// Register a catalog served for every namespace of `locale`
    pub fn with_locale<I, K, V>(mut self, locale: LocaleCode, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.any_namespace.insert(locale, collect_messages(messages));
        self
    }

    fn lookup(&self, locale: &LocaleCode, namespace: &Namespace) -> Messages {
        self.catalogs
            .get(&(locale.clone(), namespace.clone()))
            .or_else(|| self.any_namespace.get(locale))
            .cloned()
            .unwrap_or_default()
    }
}

fn collect_messages<I, K, V>(messages: I) -> Messages
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    messages
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

impl CatalogLoader for StaticCatalogLoader {
    fn load(&self, locale: LocaleCode, namespace: Namespace) -> BoxFuture<'static, Result<Messages>> {
        let messages = self.lookup(&locale, &namespace);
        Box::pin(async move { Ok(messages) })
    }
}

/// Reads catalogs from a directory tree
///
/// For locale `es` and namespace `common` the candidates are, in order:
/// `{base}/es/common.json`, `{base}/es/common.toml`, `{base}/es.json`.
/// The first readable, well-formed candidate wins. Each attempt is bounded by
/// the configured timeout. Namespaces must be a single plain file name; any
/// other namespace loads as an empty catalog.
#[derive(Debug, Clone)]
pub struct FileCatalogLoader {
    base_path: PathBuf,
    timeout: Duration,
}

impl FileCatalogLoader {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(&config.base_path).with_timeout(Duration::from_millis(config.timeout_ms))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn candidates(&self, locale: &LocaleCode, namespace: &Namespace) -> Vec<PathBuf> {
        if !is_plain_namespace(namespace.as_str()) {
            return Vec::new();
        }
        let locale_dir = self.base_path.join(locale.as_str());
        vec![
            locale_dir.join(format!("{}.json", namespace)),
            locale_dir.join(format!("{}.toml", namespace)),
            self.base_path.join(format!("{}.json", locale)),
        ]
    }

    async fn load_candidates(
        candidates: Vec<PathBuf>,
        timeout: Duration,
        locale: LocaleCode,
        namespace: Namespace,
    ) -> Result<Messages> {
        for path in candidates {
            match tokio::time::timeout(timeout, read_catalog(&path)).await {
                Ok(Ok(messages)) => {
                    debug!(
                        path = %path.display(),
                        message_count = messages.len(),
                        "Catalog file loaded"
                    );
                    return Ok(messages);
                }
                Ok(Err(I18nError::Io(e))) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "Catalog candidate not found");
                }
                Ok(Err(e)) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable catalog");
                }
                Err(_) => {
                    let e = I18nError::LoaderTimeout {
                        locale: locale.to_string(),
                        namespace: namespace.to_string(),
                        timeout_ms: timeout.as_millis() as u64,
                    };
                    warn!(path = %path.display(), error = %e, "Catalog read timed out");
                }
            }
        }

        debug!(
            locale = %locale,
            namespace = %namespace,
            "No catalog file found, using empty catalog"
        );
        Ok(Messages::new())
    }
}

impl CatalogLoader for FileCatalogLoader {
    fn load(&self, locale: LocaleCode, namespace: Namespace) -> BoxFuture<'static, Result<Messages>> {
        if !is_plain_namespace(namespace.as_str()) {
            warn!(
                locale = %locale,
                namespace = %namespace,
                "Rejecting catalog namespace that is not a plain file name"
            );
            return Box::pin(async { Ok(Messages::new()) });
        }
        let candidates = self.candidates(&locale, &namespace);
        Box::pin(Self::load_candidates(candidates, self.timeout, locale, namespace))
    }
}

/// A namespace joined under the locale directory must stay inside it
fn is_plain_namespace(namespace: &str) -> bool {
    !namespace.is_empty()
        && !namespace.contains(['/', '\\'])
        && !namespace.contains("..")
        && Path::new(namespace)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

async fn read_catalog(path: &Path) -> Result<Messages> {
    let content = fs::read_to_string(path).await?;
    let document: Value = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => {
            let parsed: toml::Value = toml::from_str(&content)?;
            serde_json::to_value(parsed)?
        }
        _ => serde_json::from_str(&content)?,
    };
    extract_messages(document)
}

/// Pick the message map out of a catalog document
///
/// Accepted shapes: a flat or nested map of messages, `{"messages": {...}}`,
/// `{"default": {...}}` and `{"default": {"messages": {...}}}`.
pub fn extract_messages(document: Value) -> Result<Messages> {
    let Value::Object(mut root) = document else {
        return Err(I18nError::CatalogFormat(
            "catalog document must be an object".to_string(),
        ));
    };

    let body = match root.remove("messages") {
        Some(Value::Object(messages)) => messages,
        Some(other) => {
            root.insert("messages".to_string(), other);
            unwrap_default(root)
        }
        None => unwrap_default(root),
    };

    let mut messages = Messages::new();
    flatten_into(&mut messages, "", body);
    Ok(messages)
}

fn unwrap_default(mut root: Map<String, Value>) -> Map<String, Value> {
    match root.remove("default") {
        Some(Value::Object(mut inner)) => match inner.remove("messages") {
            Some(Value::Object(messages)) => messages,
            Some(other) => {
                inner.insert("messages".to_string(), other);
                inner
            }
            None => inner,
        },
        Some(other) => {
            root.insert("default".to_string(), other);
            root
        }
        None => root,
    }
}

fn flatten_into(out: &mut Messages, prefix: &str, map: Map<String, Value>) {
    for (key, value) in map {
        let id = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::String(text) => {
                out.insert(id, text);
            }
            Value::Object(nested) => flatten_into(out, &id, nested),
            Value::Null => {}
            other => {
                out.insert(id, other.to_string());
            }
        }
    }
}
