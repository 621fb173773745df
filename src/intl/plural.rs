//! Plural category selection
//!
//! Operands come from the shortest decimal representation of the `f64`, so
//! `1.0` has no visible fraction digits and `1.5` has one.

use std::fmt;
use std::sync::Arc;

use fixed_decimal::{Decimal, FloatPrecision};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::brands::LocaleCode;
use super::cache::{FormatCache, FormatterKind};
use crate::utils::errors::{I18nError, Result};

static PLURAL_RULES_CACHE: Lazy<FormatCache<PluralRules>> =
    Lazy::new(|| FormatCache::new(FormatterKind::PluralRules));

pub(crate) fn cache() -> &'static FormatCache<PluralRules> {
    &PLURAL_RULES_CACHE
}

/// Grammatical number buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cardinal ("3 dogs") or ordinal ("3rd dog") rule set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralRuleType {
    #[default]
    Cardinal,
    Ordinal,
}

impl PluralRuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralRuleType::Cardinal => "cardinal",
            PluralRuleType::Ordinal => "ordinal",
        }
    }
}

impl From<PluralRuleType> for icu::plurals::PluralRuleType {
    fn from(value: PluralRuleType) -> Self {
        match value {
            PluralRuleType::Cardinal => icu::plurals::PluralRuleType::Cardinal,
            PluralRuleType::Ordinal => icu::plurals::PluralRuleType::Ordinal,
        }
    }
}

impl From<icu::plurals::PluralCategory> for PluralCategory {
    fn from(value: icu::plurals::PluralCategory) -> Self {
        match value {
            icu::plurals::PluralCategory::Zero => PluralCategory::Zero,
            icu::plurals::PluralCategory::One => PluralCategory::One,
            icu::plurals::PluralCategory::Two => PluralCategory::Two,
            icu::plurals::PluralCategory::Few => PluralCategory::Few,
            icu::plurals::PluralCategory::Many => PluralCategory::Many,
            icu::plurals::PluralCategory::Other => PluralCategory::Other,
        }
    }
}

/// Locale-bound plural rule selector backed by CLDR data
pub struct PluralRules {
    locale: LocaleCode,
    rule_type: PluralRuleType,
    rules: icu::plurals::PluralRules,
}

impl PluralRules {
    pub fn new(locale: &LocaleCode, rule_type: PluralRuleType) -> Result<Self> {
        let icu_locale = locale.to_icu_locale()?;
        let rules = icu::plurals::PluralRules::try_new(
            icu_locale.into(),
            icu::plurals::PluralRuleType::from(rule_type).into(),
        )
        .map_err(|e| I18nError::LocaleData(format!("plural rules for {}: {}", locale, e)))?;

        Ok(Self {
            locale: locale.clone(),
            rule_type,
            rules,
        })
    }

    pub fn locale(&self) -> &LocaleCode {
        &self.locale
    }

    pub fn rule_type(&self) -> PluralRuleType {
        self.rule_type
    }

    /// Category of `value` as written in its shortest decimal form
    pub fn select(&self, value: f64) -> PluralCategory {
        match Decimal::try_from_f64(value, FloatPrecision::RoundTrip) {
            Ok(decimal) => self.select_decimal(&decimal),
            Err(_) => PluralCategory::Other,
        }
    }

    /// Category of an already rounded decimal; visible trailing zeros count
    pub fn select_decimal(&self, decimal: &Decimal) -> PluralCategory {
        self.rules.category_for(decimal).into()
    }
}

impl fmt::Debug for PluralRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluralRules")
            .field("locale", &self.locale)
            .field("rule_type", &self.rule_type)
            .finish_non_exhaustive()
    }
}

/// Shared plural rules for `(locale, type)`
pub fn plural_rules(locale: &LocaleCode, rule_type: PluralRuleType) -> Result<Arc<PluralRules>> {
    let key = format!("{}::{}", locale, rule_type.as_str());
    cache().get_or_insert_with(key, || PluralRules::new(locale, rule_type))
}

/// Plural category of `value` under the locale's cardinal or ordinal rules
pub fn get_plural_category(
    value: f64,
    locale: &LocaleCode,
    rule_type: Option<PluralRuleType>,
) -> Result<PluralCategory> {
    if value.is_nan() {
        return Err(I18nError::InvalidOptions("plural category of NaN".to_string()));
    }
    let rules = plural_rules(locale, rule_type.unwrap_or_default())?;
    Ok(rules.select(value))
}
