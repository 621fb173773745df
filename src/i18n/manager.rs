//! The I18n manager: current locale, currency and active catalog
//!
//! `set_locale` is the only suspending operation. Everything else reads or
//! writes state synchronously; locks are never held across an `.await` or
//! while listeners run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::Settings;
use crate::intl::{negotiate_locale, CurrencyCode, LocaleCode};
use crate::utils::errors::{I18nError, Result};
use crate::utils::logging;

use super::formatting::FormattingContext;
use super::loader::{CatalogLoader, EmptyCatalogLoader};
use super::message::format_message;
use super::types::{I18nState, Messages, Namespace, TranslationValues};

/// How overlapping `set_locale` calls are settled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleSwitchPolicy {
    /// Whichever load finishes last is applied, even if it was started first
    #[default]
    LastResolvedWins,
    /// A load that finishes after a later call was applied is discarded
    LastCalledWins,
}

type Listener = Arc<dyn Fn(&I18nState) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Handle returned by [`I18n::on_change`]
///
/// Dropping the handle does not unsubscribe; call [`Subscription::unsubscribe`].
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Remove the listener; calling this more than once is a no-op
    pub fn unsubscribe(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            let mut listeners = lock_listeners(&listeners);
            listeners.entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

fn lock_listeners(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Construction options for [`I18n`]
pub struct I18nOptions {
    pub supported_locales: Vec<LocaleCode>,
    pub default_locale: LocaleCode,
    pub default_currency: CurrencyCode,
    pub loader: Option<Arc<dyn CatalogLoader>>,
    pub initial_locale: Option<LocaleCode>,
    pub initial_currency: Option<CurrencyCode>,
    pub switch_policy: LocaleSwitchPolicy,
    pub default_namespace: Namespace,
}

impl I18nOptions {
    pub fn new(
        supported_locales: Vec<LocaleCode>,
        default_locale: LocaleCode,
        default_currency: CurrencyCode,
    ) -> Self {
        Self {
            supported_locales,
            default_locale,
            default_currency,
            loader: None,
            initial_locale: None,
            initial_currency: None,
            switch_policy: LocaleSwitchPolicy::default(),
            default_namespace: Namespace::default(),
        }
    }

    /// Parse locale and currency codes from loaded settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let config = &settings.i18n;
        let supported_locales = config
            .supported_locales
            .iter()
            .map(|l| LocaleCode::parse(l))
            .collect::<Result<Vec<_>>>()?;

        let mut options = Self::new(
            supported_locales,
            LocaleCode::parse(&config.default_locale)?,
            CurrencyCode::parse(&config.default_currency)?,
        );
        options.initial_locale = config
            .initial_locale
            .as_deref()
            .map(LocaleCode::parse)
            .transpose()?;
        options.initial_currency = config
            .initial_currency
            .as_deref()
            .map(CurrencyCode::parse)
            .transpose()?;
        options.switch_policy = config.switch_policy;
        options.default_namespace = Namespace::new(settings.catalog.default_namespace.clone());
        Ok(options)
    }

    pub fn with_loader<L>(mut self, loader: L) -> Self
    where
        L: CatalogLoader + 'static,
    {
        self.loader = Some(Arc::new(loader));
        self
    }

    pub fn with_shared_loader(mut self, loader: Arc<dyn CatalogLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn with_initial_locale(mut self, locale: LocaleCode) -> Self {
        self.initial_locale = Some(locale);
        self
    }

    pub fn with_initial_currency(mut self, currency: CurrencyCode) -> Self {
        self.initial_currency = Some(currency);
        self
    }

    pub fn with_switch_policy(mut self, policy: LocaleSwitchPolicy) -> Self {
        self.switch_policy = policy;
        self
    }

    pub fn with_default_namespace(mut self, namespace: impl Into<Namespace>) -> Self {
        self.default_namespace = namespace.into();
        self
    }
}

struct ActiveState {
    locale: LocaleCode,
    currency: CurrencyCode,
    catalog: Arc<Messages>,
    /// Sequence number of the most recent `set_locale` call that was applied
    applied_seq: u64,
}

impl ActiveState {
    fn snapshot(&self) -> I18nState {
        I18nState {
            locale: self.locale.clone(),
            currency: self.currency.clone(),
        }
    }
}

/// Locale, currency and catalog coordinator
///
/// Shared by reference (usually behind an `Arc`). Listeners registered with
/// [`I18n::on_change`] run synchronously, in registration order, after every
/// applied locale switch and every currency change.
pub struct I18n {
    supported_locales: Vec<LocaleCode>,
    default_locale: LocaleCode,
    default_currency: CurrencyCode,
    default_namespace: Namespace,
    switch_policy: LocaleSwitchPolicy,
    loader: Arc<dyn CatalogLoader>,
    state: RwLock<ActiveState>,
    listeners: Arc<Mutex<Listeners>>,
    call_seq: AtomicU64,
}

impl I18n {
    /// Create a manager with an empty catalog already active
    ///
    /// The initial locale falls back to the default locale only when absent;
    /// it is taken as given otherwise, even outside the supported list.
    pub fn new(options: I18nOptions) -> Self {
        let I18nOptions {
            supported_locales,
            default_locale,
            default_currency,
            loader,
            initial_locale,
            initial_currency,
            switch_policy,
            default_namespace,
        } = options;

        let locale = initial_locale.unwrap_or_else(|| default_locale.clone());
        let currency = initial_currency.unwrap_or_else(|| default_currency.clone());

        debug!(
            locale = %locale,
            currency = %currency,
            supported = supported_locales.len(),
            "I18n manager created"
        );

        Self {
            supported_locales,
            default_locale,
            default_currency,
            default_namespace,
            switch_policy,
            loader: loader.unwrap_or_else(|| Arc::new(EmptyCatalogLoader)),
            state: RwLock::new(ActiveState {
                locale,
                currency,
                catalog: Arc::new(Messages::new()),
                applied_seq: 0,
            }),
            listeners: Arc::new(Mutex::new(Listeners::default())),
            call_seq: AtomicU64::new(0),
        }
    }

    /// Build a manager from loaded settings and a catalog loader
    pub fn from_settings(settings: &Settings, loader: Arc<dyn CatalogLoader>) -> Result<Self> {
        Ok(Self::new(
            I18nOptions::from_settings(settings)?.with_shared_loader(loader),
        ))
    }

    fn read(&self) -> RwLockReadGuard<'_, ActiveState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ActiveState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn locale(&self) -> LocaleCode {
        self.read().locale.clone()
    }

    pub fn currency(&self) -> CurrencyCode {
        self.read().currency.clone()
    }

    pub fn state(&self) -> I18nState {
        self.read().snapshot()
    }

    pub fn supported_locales(&self) -> &[LocaleCode] {
        &self.supported_locales
    }

    pub fn default_locale(&self) -> &LocaleCode {
        &self.default_locale
    }

    pub fn default_currency(&self) -> &CurrencyCode {
        &self.default_currency
    }

    pub fn default_namespace(&self) -> &Namespace {
        &self.default_namespace
    }

    pub fn switch_policy(&self) -> LocaleSwitchPolicy {
        self.switch_policy
    }

    pub fn is_locale_supported(&self, locale: &str) -> bool {
        LocaleCode::parse(locale)
            .map(|l| self.supported_locales.contains(&l))
            .unwrap_or(false)
    }

    /// Map a requested locale onto the supported set, defaulting silently
    fn resolve_locale(&self, requested: &str) -> LocaleCode {
        match LocaleCode::parse(requested) {
            Ok(locale) if self.supported_locales.contains(&locale) => locale,
            _ => self.default_locale.clone(),
        }
    }

    /// Pick the best supported locale for ranked user preferences
    pub fn negotiate<R: AsRef<str>>(&self, requested: &[R]) -> LocaleCode {
        let canonical: Vec<String> = requested
            .iter()
            .map(|r| {
                LocaleCode::parse(r.as_ref())
                    .map(String::from)
                    .unwrap_or_else(|_| r.as_ref().to_string())
            })
            .collect();
        negotiate_locale(&canonical[..], &self.supported_locales[..], &self.default_locale).clone()
    }

    /// Switch to `next` using the default namespace
    pub async fn set_locale(&self, next: impl AsRef<str>) -> bool {
        let namespace = self.default_namespace.clone();
        self.set_locale_with_namespace(next, namespace).await
    }

    /// Load the catalog for `next` and activate it
    ///
    /// Unsupported or malformed locales are replaced by the default locale.
    /// Loader errors activate an empty catalog. Returns `false` only when the
    /// `LastCalledWins` policy discarded this result as stale.
    pub async fn set_locale_with_namespace(
        &self,
        next: impl AsRef<str>,
        namespace: impl Into<Namespace>,
    ) -> bool {
        let seq = self.call_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let locale = self.resolve_locale(next.as_ref());
        let namespace = namespace.into();
        if locale.as_str() != next.as_ref() {
            debug!(requested = next.as_ref(), resolved = %locale, "Locale substituted");
        }

        let messages = match self.loader.load(locale.clone(), namespace.clone()).await {
            Ok(messages) => {
                logging::log_catalog_load(locale.as_str(), namespace.as_str(), messages.len(), None);
                messages
            }
            Err(e) => {
                logging::log_catalog_load(locale.as_str(), namespace.as_str(), 0, Some(&e.to_string()));
                Messages::new()
            }
        };
        let message_count = messages.len();

        let (previous, snapshot) = {
            let mut state = self.write();
            if self.switch_policy == LocaleSwitchPolicy::LastCalledWins && seq < state.applied_seq {
                debug!(
                    locale = %locale,
                    seq,
                    applied_seq = state.applied_seq,
                    "Discarding stale locale resolution"
                );
                return false;
            }
            let previous = std::mem::replace(&mut state.locale, locale.clone());
            state.catalog = Arc::new(messages);
            state.applied_seq = state.applied_seq.max(seq);
            (previous, state.snapshot())
        };

        logging::log_locale_change(previous.as_str(), locale.as_str(), namespace.as_str(), message_count);
        self.notify(&snapshot);
        true
    }

    /// Change the currency and notify listeners immediately
    pub fn set_currency(&self, next: CurrencyCode) {
        let (previous, snapshot) = {
            let mut state = self.write();
            let previous = std::mem::replace(&mut state.currency, next.clone());
            (previous, state.snapshot())
        };
        logging::log_currency_change(previous.as_str(), next.as_str());
        self.notify(&snapshot);
    }

    /// Translate `id` from the active catalog
    ///
    /// Unknown ids are returned unchanged.
    pub fn t(&self, id: &str, values: Option<&TranslationValues>) -> String {
        let (catalog, locale) = {
            let state = self.read();
            (Arc::clone(&state.catalog), state.locale.clone())
        };
        match catalog.get(id) {
            Some(template) => format_message(template, values, &locale),
            None => {
                trace!(id, locale = %locale, "Message id not in active catalog");
                id.to_string()
            }
        }
    }

    /// Translate with an explicit namespace
    ///
    /// Only one catalog is active at a time, so `namespace` does not change
    /// the lookup.
    pub fn t_in(&self, namespace: &str, id: &str, values: Option<&TranslationValues>) -> String {
        trace!(namespace, id, "Namespaced lookup served from the active catalog");
        self.t(id, values)
    }

    pub fn has_message(&self, id: &str) -> bool {
        self.read().catalog.contains_key(id)
    }

    pub fn catalog_len(&self) -> usize {
        self.read().catalog.len()
    }

    /// Register a listener for locale and currency changes
    pub fn on_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&I18nState) + Send + Sync + 'static,
    {
        let mut listeners = lock_listeners(&self.listeners);
        listeners.next_id += 1;
        let id = listeners.next_id;
        listeners.entries.push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock_listeners(&self.listeners).entries.len()
    }

    pub fn formatting_context(&self) -> FormattingContext {
        FormattingContext::from(self.state())
    }

    /// Run every listener registered at this moment, in registration order
    ///
    /// A listener unsubscribed by an earlier one in the same round is skipped.
    fn notify(&self, state: &I18nState) {
        let round: Vec<(u64, Listener)> = lock_listeners(&self.listeners)
            .entries
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();
        for (id, listener) in round {
            let still_subscribed = lock_listeners(&self.listeners)
                .entries
                .iter()
                .any(|(entry, _)| *entry == id);
            if still_subscribed {
                listener(state);
            }
        }
    }
}

impl std::fmt::Debug for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("I18n")
            .field("locale", &state.locale)
            .field("currency", &state.currency)
            .field("catalog_len", &state.catalog.len())
            .field("supported_locales", &self.supported_locales)
            .field("switch_policy", &self.switch_policy)
            .finish()
    }
}

impl TryFrom<&Settings> for I18nOptions {
    type Error = I18nError;

    fn try_from(settings: &Settings) -> Result<Self> {
        Self::from_settings(settings)
    }
}
