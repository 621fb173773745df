//! Untitled i18n
//!
//! Locale, currency and message-catalog management for UI layers.
//! This library provides a locale manager with async catalog loading and
//! change notifications, an ICU-style message renderer, and memoized
//! Intl-style formatters for currency, numbers, dates, relative time and
//! plural categories.

pub mod config;
pub mod i18n;
pub mod intl;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{I18nError, Result};

// Re-export main components for easy access
pub use i18n::{FormattingContext, I18n, I18nOptions, I18nState, LocaleSwitchPolicy};
pub use intl::{
    format_currency, format_date, format_number, format_relative_time, get_plural_category,
    negotiate_locale, CurrencyCode, LocaleCode,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
