//! Currency formatting

use std::fmt;
use std::sync::Arc;

use icu::decimal::DecimalFormatter;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::affixes::{
    affixes, currency_digits, narrow_currency_symbol, Affixes, CurrencyPlacement, NBSP,
};
use super::brands::{CurrencyCode, LocaleCode};
use super::cache::{FormatCache, FormatterKind};
use super::number::{decimal_formatter, ResolvedDigits};
use super::plural::{plural_rules, PluralCategory, PluralRuleType, PluralRules};
use crate::utils::errors::Result;

static CURRENCY_CACHE: Lazy<FormatCache<CurrencyFormatter>> =
    Lazy::new(|| FormatCache::new(FormatterKind::Currency));

pub(crate) fn cache() -> &'static FormatCache<CurrencyFormatter> {
    &CURRENCY_CACHE
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CurrencyDisplay {
    #[default]
    Symbol,
    NarrowSymbol,
    Code,
    Name,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencySign {
    #[default]
    Standard,
    Accounting,
}

/// Caller-adjustable currency options
///
/// `style` and `currency` are fixed by [`format_currency`]'s arguments and
/// cannot be overridden here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_fraction_digits: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_fraction_digits: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_display: Option<CurrencyDisplay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_sign: Option<CurrencySign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_grouping: Option<bool>,
}

impl CurrencyFormatOptions {
    pub fn display(mut self, display: CurrencyDisplay) -> Self {
        self.currency_display = Some(display);
        self
    }

    pub fn sign(mut self, sign: CurrencySign) -> Self {
        self.currency_sign = Some(sign);
        self
    }

    pub fn fraction_digits(mut self, min: u8, max: u8) -> Self {
        self.minimum_fraction_digits = Some(min);
        self.maximum_fraction_digits = Some(max);
        self
    }
}

/// Merged option object used as the cache key
#[derive(Serialize)]
struct CurrencyKey<'a> {
    style: &'static str,
    currency: &'a str,
    #[serde(flatten)]
    options: &'a CurrencyFormatOptions,
}

pub struct CurrencyFormatter {
    locale: LocaleCode,
    currency: CurrencyCode,
    data: &'static Affixes,
    digits: ResolvedDigits,
    decimal: DecimalFormatter,
    display: CurrencyDisplay,
    sign: CurrencySign,
    plurals: Arc<PluralRules>,
}

impl CurrencyFormatter {
    pub fn new(
        locale: &LocaleCode,
        currency: &CurrencyCode,
        options: &CurrencyFormatOptions,
    ) -> Result<Self> {
        let minor = currency_digits(currency.as_str());
        let digits = ResolvedDigits::resolve(
            None,
            options.minimum_fraction_digits,
            options.maximum_fraction_digits,
            options.use_grouping,
            minor,
            minor,
        )?;

        Ok(Self {
            locale: locale.clone(),
            currency: currency.clone(),
            data: affixes(locale),
            digits,
            decimal: decimal_formatter(locale, digits.grouping)?,
            display: options.currency_display.unwrap_or_default(),
            sign: options.currency_sign.unwrap_or_default(),
            plurals: plural_rules(locale, PluralRuleType::Cardinal)?,
        })
    }

    pub fn locale(&self) -> &LocaleCode {
        &self.locale
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn format(&self, amount: f64) -> String {
        let negative = amount < 0.0;
        let rounded = self.digits.to_decimal(amount.abs());
        let number = match &rounded {
            Some(decimal) => self.decimal.format(decimal).to_string(),
            None if amount.is_nan() => "NaN".to_string(),
            None => "∞".to_string(),
        };
        let code = self.currency.as_str();

        if self.display == CurrencyDisplay::Name {
            let one = rounded
                .as_ref()
                .map_or(false, |d| self.plurals.select_decimal(d) == PluralCategory::One);
            let name = self.data.currency_name(code, one).unwrap_or(code);
            let sign = if negative { "-" } else { "" };
            return format!("{}{} {}", sign, number, name);
        }

        let symbol = match self.display {
            CurrencyDisplay::Code => code,
            CurrencyDisplay::NarrowSymbol => narrow_currency_symbol(code)
                .or_else(|| self.data.currency_symbol(code))
                .unwrap_or(code),
            _ => self.data.currency_symbol(code).unwrap_or(code),
        };
        let alphabetic = symbol.chars().last().map_or(false, char::is_alphabetic);

        let body = match self.data.currency_placement {
            CurrencyPlacement::Prefix(sep) => {
                let sep = if sep.is_empty() && alphabetic { NBSP } else { sep };
                format!("{}{}{}", symbol, sep, number)
            }
            CurrencyPlacement::Suffix(sep) => format!("{}{}{}", number, sep, symbol),
        };

        match (negative, self.sign) {
            (false, _) => body,
            (true, CurrencySign::Accounting) if self.data.language == "en" => {
                format!("({})", body)
            }
            (true, _) => format!("-{}", body),
        }
    }
}

impl fmt::Debug for CurrencyFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrencyFormatter")
            .field("locale", &self.locale)
            .field("currency", &self.currency)
            .field("display", &self.display)
            .field("sign", &self.sign)
            .finish_non_exhaustive()
    }
}

/// Shared formatter for `(locale, currency, options)`
pub fn currency_formatter(
    locale: &LocaleCode,
    currency: &CurrencyCode,
    options: Option<&CurrencyFormatOptions>,
) -> Result<Arc<CurrencyFormatter>> {
    let default_options = CurrencyFormatOptions::default();
    let options = options.unwrap_or(&default_options);
    let key = CurrencyKey {
        style: "currency",
        currency: currency.as_str(),
        options,
    };
    cache().get_or_create(locale.as_str(), &key, || {
        CurrencyFormatter::new(locale, currency, options)
    })
}

/// Format `amount` in `currency` following `locale` conventions
pub fn format_currency(
    amount: f64,
    locale: &LocaleCode,
    currency: &CurrencyCode,
    options: Option<&CurrencyFormatOptions>,
) -> Result<String> {
    Ok(currency_formatter(locale, currency, options)?.format(amount))
}
