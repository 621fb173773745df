//! Binding seam for UI frameworks
//!
//! Adapters hold a shared [`I18n`] and turn its change notifications into
//! whatever re-render mechanism the host framework uses. They never own
//! locale state of their own.

use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use crate::intl::{CurrencyCode, LocaleCode};
use crate::utils::errors::{I18nError, Result};

use super::formatting::FormattingContext;
use super::manager::{I18n, Subscription};
use super::types::{I18nState, TranslationValues};

/// Read-side view of a manager for framework bindings
pub trait I18nAdapter {
    fn i18n(&self) -> &Arc<I18n>;

    fn locale(&self) -> LocaleCode {
        self.i18n().locale()
    }

    fn currency(&self) -> CurrencyCode {
        self.i18n().currency()
    }

    fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&I18nState) + Send + Sync + 'static,
        Self: Sized,
    {
        self.i18n().on_change(listener)
    }

    fn formatting_context(&self) -> FormattingContext {
        self.i18n().formatting_context()
    }

    fn t(&self, id: &str, values: Option<&TranslationValues>) -> String {
        self.i18n().t(id, values)
    }
}

/// Adapter with a mount/unmount lifecycle
///
/// `mount` registers one listener; `unmount` (or drop) removes it.
pub struct BaseI18nAdapter {
    i18n: Arc<I18n>,
    subscription: Mutex<Option<Subscription>>,
}

impl BaseI18nAdapter {
    pub fn new(i18n: Arc<I18n>) -> Self {
        Self {
            i18n,
            subscription: Mutex::new(None),
        }
    }

    /// Start forwarding changes to `on_change`, replacing any earlier listener
    pub fn mount<F>(&self, on_change: F)
    where
        F: Fn(&I18nState) + Send + Sync + 'static,
    {
        let subscription = self.i18n.on_change(on_change);
        let mut slot = self.subscription.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = slot.replace(subscription) {
            previous.unsubscribe();
        }
    }

    pub fn unmount(&self) {
        let mut slot = self.subscription.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(subscription) = slot.take() {
            subscription.unsubscribe();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .is_some()
    }
}

impl I18nAdapter for BaseI18nAdapter {
    fn i18n(&self) -> &Arc<I18n> {
        &self.i18n
    }
}

impl Drop for BaseI18nAdapter {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Context slot that hands the shared manager to consumers
///
/// Can live in a `static` since construction is `const`.
#[derive(Default)]
pub struct I18nProvider {
    slot: RwLock<Option<Arc<I18n>>>,
}

impl I18nProvider {
    pub const fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    pub fn provide(&self, i18n: Arc<I18n>) {
        debug!(locale = %i18n.locale(), "I18n provided");
        *self.slot.write().unwrap_or_else(|p| p.into_inner()) = Some(i18n);
    }

    pub fn clear(&self) {
        self.slot.write().unwrap_or_else(|p| p.into_inner()).take();
    }

    pub fn is_provided(&self) -> bool {
        self.slot.read().unwrap_or_else(|p| p.into_inner()).is_some()
    }

    /// The provided manager, or `MissingProvider` if nothing was provided
    pub fn use_i18n(&self) -> Result<Arc<I18n>> {
        self.slot
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
            .ok_or(I18nError::MissingProvider("use_i18n"))
    }

    /// Build an adapter around the provided manager
    pub fn adapter(&self) -> Result<BaseI18nAdapter> {
        self.use_i18n().map(BaseI18nAdapter::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::I18nOptions;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn manager() -> Arc<I18n> {
        Arc::new(I18n::new(I18nOptions::new(
            vec![LocaleCode::parse("en").unwrap()],
            LocaleCode::parse("en").unwrap(),
            CurrencyCode::parse("USD").unwrap(),
        )))
    }

    #[test]
    fn test_use_i18n_without_provider_fails() {
        let provider = I18nProvider::new();
        assert_matches!(provider.use_i18n(), Err(I18nError::MissingProvider("use_i18n")));
        assert!(provider.adapter().is_err());
    }

    #[test]
    fn test_provide_and_clear() {
        let provider = I18nProvider::new();
        let i18n = manager();
        provider.provide(Arc::clone(&i18n));
        assert!(Arc::ptr_eq(&provider.use_i18n().unwrap(), &i18n));

        provider.clear();
        assert!(!provider.is_provided());
    }

    #[test]
    fn test_mount_and_unmount() {
        let i18n = manager();
        let adapter = BaseI18nAdapter::new(Arc::clone(&i18n));
        let renders = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&renders);
        adapter.mount(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(i18n.subscriber_count(), 1);

        i18n.set_currency(CurrencyCode::parse("EUR").unwrap());
        assert_eq!(renders.load(Ordering::SeqCst), 1);
        assert_eq!(adapter.currency().as_str(), "EUR");
        assert_eq!(adapter.formatting_context().currency().as_str(), "EUR");

        adapter.unmount();
        assert!(!adapter.is_mounted());
        assert_eq!(i18n.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let i18n = manager();
        {
            let adapter = BaseI18nAdapter::new(Arc::clone(&i18n));
            adapter.mount(|_| {});
            assert_eq!(i18n.subscriber_count(), 1);
        }
        assert_eq!(i18n.subscriber_count(), 0);
    }
}
