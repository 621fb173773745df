//! Locale-aware formatting primitives
//!
//! Every formatter kind is memoized in its own process-wide cache keyed by
//! locale plus the serialized options. The free functions here look up (or
//! build) the formatter and render the value in one call.

pub(crate) mod affixes;
pub mod brands;
pub mod cache;
pub mod currency;
pub mod date;
pub mod negotiate;
pub mod number;
pub mod plural;
pub mod relative;
pub(crate) mod relative_phrases;

pub use brands::{CurrencyCode, LocaleCode};
pub use cache::{make_cache_key, CacheStats, FormatCache, FormatterKind};
pub use currency::{
    currency_formatter, format_currency, CurrencyDisplay, CurrencyFormatOptions,
    CurrencyFormatter, CurrencySign,
};
pub use date::{
    date_time_formatter, format_date, DateFormatOptions, DateInput, DateTimeFormatter,
    DateTimeStyle, MonthWidth, NumericWidth, TextWidth,
};
pub use negotiate::negotiate_locale;
pub use number::{
    format_number, number_formatter, DigitOptions, NumberFormatOptions, NumberFormatter,
    UnitDisplay, UnitOptions,
};
pub use plural::{get_plural_category, plural_rules, PluralCategory, PluralRuleType, PluralRules};
pub use relative::{
    format_relative_time, relative_time_formatter, RelativeNumeric, RelativeStyle,
    RelativeTimeFormatOptions, RelativeTimeFormatter, RelativeTimeUnit,
};

use tracing::debug;

/// Rebuild every formatter cache with the given bound
///
/// `Some(n)` keeps the `n` most recently used formatters per kind; `None`
/// makes the caches unbounded again. Existing entries and counters are
/// dropped either way.
pub fn configure_format_caches(max_entries: Option<usize>) {
    currency::cache().reconfigure(max_entries);
    number::cache().reconfigure(max_entries);
    date::cache().reconfigure(max_entries);
    relative::cache().reconfigure(max_entries);
    plural::cache().reconfigure(max_entries);
    debug!(?max_entries, "Format caches reconfigured");
}

/// Drop every cached formatter, keeping the configured bound
pub fn clear_format_caches() {
    currency::cache().clear();
    number::cache().clear();
    date::cache().clear();
    relative::cache().clear();
    plural::cache().clear();
}

/// Counters for every formatter cache, one entry per kind
pub fn format_cache_stats() -> Vec<CacheStats> {
    vec![
        currency::cache().stats(),
        number::cache().stats(),
        date::cache().stats(),
        relative::cache().stats(),
        plural::cache().stats(),
    ]
}

/// Counters for a single formatter kind
pub fn format_cache_stats_for(kind: FormatterKind) -> CacheStats {
    match kind {
        FormatterKind::Currency => currency::cache().stats(),
        FormatterKind::Number => number::cache().stats(),
        FormatterKind::DateTime => date::cache().stats(),
        FormatterKind::RelativeTime => relative::cache().stats(),
        FormatterKind::PluralRules => plural::cache().stats(),
    }
}
