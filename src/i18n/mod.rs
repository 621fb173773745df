//! Internationalization module
//!
//! Holds the locale/currency manager, message catalogs and their loaders,
//! the message template renderer and the bindings UI layers consume.

pub mod adapters;
pub mod formatting;
pub mod loader;
pub mod manager;
pub mod message;
pub mod types;

// Re-export commonly used i18n components
pub use adapters::{BaseI18nAdapter, I18nAdapter, I18nProvider};
pub use formatting::FormattingContext;
pub use loader::{extract_messages, CatalogLoader, EmptyCatalogLoader, FileCatalogLoader, StaticCatalogLoader};
pub use manager::{I18n, I18nOptions, LocaleSwitchPolicy, Subscription};
pub use message::format_message;
pub use types::{values, I18nState, MessageValue, Messages, Namespace, TranslationValues};
