//! Locale and currency bound formatting helpers

use serde::{Deserialize, Serialize};

use crate::intl::{
    self, CurrencyCode, CurrencyFormatOptions, DateFormatOptions, DateInput, LocaleCode,
    NumberFormatOptions, PluralCategory, PluralRuleType, RelativeTimeFormatOptions,
    RelativeTimeUnit,
};
use crate::utils::errors::Result;

use super::types::I18nState;

/// An immutable `(locale, currency)` pair with formatting shortcuts
///
/// Cheap to build; create a fresh one whenever the locale or currency changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormattingContext {
    locale: LocaleCode,
    currency: CurrencyCode,
}

impl FormattingContext {
    pub fn new(locale: LocaleCode, currency: CurrencyCode) -> Self {
        Self { locale, currency }
    }

    pub fn locale(&self) -> &LocaleCode {
        &self.locale
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn format_currency(&self, amount: f64, options: Option<&CurrencyFormatOptions>) -> Result<String> {
        intl::format_currency(amount, &self.locale, &self.currency, options)
    }

    pub fn format_number(&self, value: f64, options: Option<&NumberFormatOptions>) -> Result<String> {
        intl::format_number(value, &self.locale, options)
    }

    pub fn format_date<D>(&self, date: D, options: Option<&DateFormatOptions>) -> Result<String>
    where
        D: Into<DateInput>,
    {
        intl::format_date(date, &self.locale, options)
    }

    pub fn format_relative_time(
        &self,
        value: f64,
        unit: RelativeTimeUnit,
        options: Option<&RelativeTimeFormatOptions>,
    ) -> Result<String> {
        intl::format_relative_time(value, unit, &self.locale, options)
    }

    pub fn get_plural_category(&self, value: f64, rule_type: Option<PluralRuleType>) -> Result<PluralCategory> {
        intl::get_plural_category(value, &self.locale, rule_type)
    }
}

impl From<I18nState> for FormattingContext {
    fn from(state: I18nState) -> Self {
        Self::new(state.locale, state.currency)
    }
}

impl From<&I18nState> for FormattingContext {
    fn from(state: &I18nState) -> Self {
        Self::new(state.locale.clone(), state.currency.clone())
    }
}
