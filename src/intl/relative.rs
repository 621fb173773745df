//! Relative time phrases ("in 3 days", "2 hours ago", "yesterday")

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::brands::LocaleCode;
use super::cache::{FormatCache, FormatterKind};
use super::number::{number_formatter, NumberFormatter};
use super::plural::{plural_rules, PluralCategory, PluralRuleType, PluralRules};
use super::relative_phrases::{relative_data, RelativeData};
use crate::utils::errors::{I18nError, Result};

static RELATIVE_TIME_CACHE: Lazy<FormatCache<RelativeTimeFormatter>> =
    Lazy::new(|| FormatCache::new(FormatterKind::RelativeTime));

pub(crate) fn cache() -> &'static FormatCache<RelativeTimeFormatter> {
    &RELATIVE_TIME_CACHE
}

/// Calendar unit of a relative offset; plural spellings are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeTimeUnit {
    #[serde(alias = "years")]
    Year,
    #[serde(alias = "quarters")]
    Quarter,
    #[serde(alias = "months")]
    Month,
    #[serde(alias = "weeks")]
    Week,
    #[serde(alias = "days")]
    Day,
    #[serde(alias = "hours")]
    Hour,
    #[serde(alias = "minutes")]
    Minute,
    #[serde(alias = "seconds")]
    Second,
}

impl RelativeTimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelativeTimeUnit::Year => "year",
            RelativeTimeUnit::Quarter => "quarter",
            RelativeTimeUnit::Month => "month",
            RelativeTimeUnit::Week => "week",
            RelativeTimeUnit::Day => "day",
            RelativeTimeUnit::Hour => "hour",
            RelativeTimeUnit::Minute => "minute",
            RelativeTimeUnit::Second => "second",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for RelativeTimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelativeTimeUnit {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "year" | "years" => RelativeTimeUnit::Year,
            "quarter" | "quarters" => RelativeTimeUnit::Quarter,
            "month" | "months" => RelativeTimeUnit::Month,
            "week" | "weeks" => RelativeTimeUnit::Week,
            "day" | "days" => RelativeTimeUnit::Day,
            "hour" | "hours" => RelativeTimeUnit::Hour,
            "minute" | "minutes" => RelativeTimeUnit::Minute,
            "second" | "seconds" => RelativeTimeUnit::Second,
            _ => return Err(I18nError::UnknownUnit(s.to_string())),
        };
        Ok(unit)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeNumeric {
    #[default]
    Always,
    Auto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelativeStyle {
    #[default]
    Long,
    Short,
    Narrow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativeTimeFormatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric: Option<RelativeNumeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<RelativeStyle>,
}

impl RelativeTimeFormatOptions {
    pub fn auto() -> Self {
        Self {
            numeric: Some(RelativeNumeric::Auto),
            style: None,
        }
    }

    pub fn with_style(mut self, style: RelativeStyle) -> Self {
        self.style = Some(style);
        self
    }
}

#[derive(Debug)]
pub struct RelativeTimeFormatter {
    locale: LocaleCode,
    data: &'static RelativeData,
    numeric: RelativeNumeric,
    style: RelativeStyle,
    number: Arc<NumberFormatter>,
    plurals: Arc<PluralRules>,
}

impl RelativeTimeFormatter {
    pub fn new(locale: &LocaleCode, options: &RelativeTimeFormatOptions) -> Result<Self> {
        Ok(Self {
            locale: locale.clone(),
            data: relative_data(locale),
            numeric: options.numeric.unwrap_or_default(),
            style: options.style.unwrap_or_default(),
            number: number_formatter(locale, None)?,
            plurals: plural_rules(locale, PluralRuleType::Cardinal)?,
        })
    }

    pub fn locale(&self) -> &LocaleCode {
        &self.locale
    }

    /// Negative values (including `-0`) are in the past
    pub fn format(&self, value: f64, unit: RelativeTimeUnit) -> Result<String> {
        if !value.is_finite() {
            return Err(I18nError::InvalidOptions(format!(
                "relative time value must be finite, got {}",
                value
            )));
        }

        if self.numeric == RelativeNumeric::Auto && value.fract() == 0.0 {
            let offset = value as i64;
            if let Some((_, _, phrase)) = self
                .data
                .phrases
                .iter()
                .find(|(u, o, _)| *u == unit.as_str() && *o == offset)
            {
                return Ok((*phrase).to_string());
            }
        }

        let magnitude = value.abs();
        let forms = match self.style {
            RelativeStyle::Long => &self.data.long,
            RelativeStyle::Short | RelativeStyle::Narrow => &self.data.short,
        };
        let (one, other) = forms[unit.index()];
        let name = if self.plurals.select(magnitude) == PluralCategory::One {
            one
        } else {
            other
        };

        let pattern = if value.is_sign_negative() {
            self.data.past
        } else {
            self.data.future
        };
        let amount = format!("{} {}", self.number.format(magnitude), name);
        Ok(pattern.replace("{0}", &amount))
    }
}

/// Shared formatter for `(locale, options)`
pub fn relative_time_formatter(
    locale: &LocaleCode,
    options: Option<&RelativeTimeFormatOptions>,
) -> Result<Arc<RelativeTimeFormatter>> {
    let default_options = RelativeTimeFormatOptions::default();
    let options = options.unwrap_or(&default_options);
    cache().get_or_create(locale.as_str(), options, || {
        RelativeTimeFormatter::new(locale, options)
    })
}

/// Format a signed offset in `unit`; negative is past, positive is future
pub fn format_relative_time(
    value: f64,
    unit: RelativeTimeUnit,
    locale: &LocaleCode,
    options: Option<&RelativeTimeFormatOptions>,
) -> Result<String> {
    relative_time_formatter(locale, options)?.format(value, unit)
}
