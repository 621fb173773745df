//! Decimal, percent and unit number formatting

use std::fmt;
use std::sync::Arc;

use fixed_decimal::{Decimal, FloatPrecision, SignedRoundingMode, UnsignedRoundingMode};
use icu::decimal::options::{DecimalFormatterOptions, GroupingStrategy};
use icu::decimal::DecimalFormatter;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::affixes::affixes;
use super::brands::LocaleCode;
use super::cache::{FormatCache, FormatterKind};
use super::plural::{plural_rules, PluralCategory, PluralRuleType, PluralRules};
use crate::utils::errors::{I18nError, Result};

static NUMBER_CACHE: Lazy<FormatCache<NumberFormatter>> =
    Lazy::new(|| FormatCache::new(FormatterKind::Number));

pub(crate) fn cache() -> &'static FormatCache<NumberFormatter> {
    &NUMBER_CACHE
}

const MAX_FRACTION_DIGITS: u8 = 20;
const MAX_INTEGER_DIGITS: u8 = 21;

/// Digit and grouping controls shared by every number style
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_integer_digits: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_fraction_digits: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_fraction_digits: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_grouping: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitDisplay {
    #[default]
    Short,
    Long,
    Narrow,
}

/// Options for `style: "unit"`; `unit` is required
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOptions {
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_display: Option<UnitDisplay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_integer_digits: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_fraction_digits: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_fraction_digits: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_grouping: Option<bool>,
}

/// Number style, one mutually exclusive shape per `style` value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum NumberFormatOptions {
    Decimal(DigitOptions),
    Percent(DigitOptions),
    Unit(UnitOptions),
}

impl Default for NumberFormatOptions {
    fn default() -> Self {
        NumberFormatOptions::Decimal(DigitOptions::default())
    }
}

impl NumberFormatOptions {
    pub fn decimal() -> Self {
        Self::default()
    }

    pub fn percent() -> Self {
        NumberFormatOptions::Percent(DigitOptions::default())
    }

    pub fn unit(unit: impl Into<String>) -> Self {
        NumberFormatOptions::Unit(UnitOptions {
            unit: unit.into(),
            unit_display: None,
            minimum_integer_digits: None,
            minimum_fraction_digits: None,
            maximum_fraction_digits: None,
            use_grouping: None,
        })
    }

    pub fn with_fraction_digits(mut self, min: u8, max: u8) -> Self {
        match &mut self {
            NumberFormatOptions::Decimal(d) | NumberFormatOptions::Percent(d) => {
                d.minimum_fraction_digits = Some(min);
                d.maximum_fraction_digits = Some(max);
            }
            NumberFormatOptions::Unit(u) => {
                u.minimum_fraction_digits = Some(min);
                u.maximum_fraction_digits = Some(max);
            }
        }
        self
    }

    pub fn with_grouping(mut self, grouping: bool) -> Self {
        match &mut self {
            NumberFormatOptions::Decimal(d) | NumberFormatOptions::Percent(d) => {
                d.use_grouping = Some(grouping)
            }
            NumberFormatOptions::Unit(u) => u.use_grouping = Some(grouping),
        }
        self
    }

    /// Only meaningful for the unit style; other styles are returned unchanged
    pub fn with_unit_display(mut self, display: UnitDisplay) -> Self {
        if let NumberFormatOptions::Unit(u) = &mut self {
            u.unit_display = Some(display);
        }
        self
    }
}

/// Resolved digit bounds after applying style defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedDigits {
    pub min_integer: usize,
    pub min_fraction: usize,
    pub max_fraction: usize,
    pub grouping: bool,
}

impl ResolvedDigits {
    pub(crate) fn resolve(
        min_integer: Option<u8>,
        min_fraction: Option<u8>,
        max_fraction: Option<u8>,
        grouping: Option<bool>,
        default_min: u8,
        default_max: u8,
    ) -> Result<Self> {
        if let Some(n) = min_integer {
            if !(1..=MAX_INTEGER_DIGITS).contains(&n) {
                return Err(I18nError::InvalidOptions(format!(
                    "minimumIntegerDigits {} is out of range 1..={}",
                    n, MAX_INTEGER_DIGITS
                )));
            }
        }
        for (name, value) in [
            ("minimumFractionDigits", min_fraction),
            ("maximumFractionDigits", max_fraction),
        ] {
            if let Some(n) = value {
                if n > MAX_FRACTION_DIGITS {
                    return Err(I18nError::InvalidOptions(format!(
                        "{} {} is out of range 0..={}",
                        name, n, MAX_FRACTION_DIGITS
                    )));
                }
            }
        }

        let (min, max) = match (min_fraction, max_fraction) {
            (None, None) => (default_min, default_max),
            (Some(min), None) => (min, min.max(default_max)),
            (None, Some(max)) => (default_min.min(max), max),
            (Some(min), Some(max)) if min > max => {
                return Err(I18nError::InvalidOptions(format!(
                    "minimumFractionDigits {} exceeds maximumFractionDigits {}",
                    min, max
                )))
            }
            (Some(min), Some(max)) => (min, max),
        };

        Ok(Self {
            min_integer: usize::from(min_integer.unwrap_or(1)),
            min_fraction: usize::from(min),
            max_fraction: usize::from(max),
            grouping: grouping.unwrap_or(true),
        })
    }

    /// Exact decimal for `value` rounded half away from zero to these bounds
    ///
    /// Works on the shortest decimal representation of the `f64`, so `1.005`
    /// rounds to `1.01` rather than inheriting binary error. `None` for
    /// non-finite input.
    pub(crate) fn to_decimal(&self, value: f64) -> Option<Decimal> {
        let mut decimal = Decimal::try_from_f64(value, FloatPrecision::RoundTrip).ok()?;
        self.shape(&mut decimal);
        Some(decimal)
    }

    pub(crate) fn shape(&self, decimal: &mut Decimal) {
        let max = -(self.max_fraction as i16);
        // rounding to a coarser position would pad instead of cut
        if *decimal.magnitude_range().start() < max {
            decimal.round_with_mode(
                max,
                SignedRoundingMode::Unsigned(UnsignedRoundingMode::HalfExpand),
            );
        }
        decimal.trim_end();
        decimal.pad_end(-(self.min_fraction as i16));
        decimal.pad_start(self.min_integer as i16);
    }
}

/// Decimal formatter for the locale's digits, separators and grouping rules
pub(crate) fn decimal_formatter(locale: &LocaleCode, grouping: bool) -> Result<DecimalFormatter> {
    let mut options = DecimalFormatterOptions::default();
    options.grouping_strategy = Some(if grouping {
        GroupingStrategy::Auto
    } else {
        GroupingStrategy::Never
    });
    DecimalFormatter::try_new(locale.to_icu_locale()?.into(), options)
        .map_err(|e| I18nError::LocaleData(format!("decimal symbols for {}: {}", locale, e)))
}

/// `(id, short one, short other, narrow, long one, long other)`
type UnitRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const UNITS: &[UnitRow] = &[
    ("acre", "ac", "ac", "ac", "acre", "acres"),
    ("bit", "bit", "bit", "bit", "bit", "bits"),
    ("byte", "byte", "byte", "B", "byte", "bytes"),
    ("celsius", "°C", "°C", "°C", "degree Celsius", "degrees Celsius"),
    ("centimeter", "cm", "cm", "cm", "centimeter", "centimeters"),
    ("day", "day", "days", "d", "day", "days"),
    ("degree", "deg", "deg", "°", "degree", "degrees"),
    ("fahrenheit", "°F", "°F", "°", "degree Fahrenheit", "degrees Fahrenheit"),
    ("fluid-ounce", "fl oz", "fl oz", "fl oz", "fluid ounce", "fluid ounces"),
    ("foot", "ft", "ft", "′", "foot", "feet"),
    ("gallon", "gal", "gal", "gal", "gallon", "gallons"),
    ("gigabit", "Gb", "Gb", "Gb", "gigabit", "gigabits"),
    ("gigabyte", "GB", "GB", "GB", "gigabyte", "gigabytes"),
    ("gram", "g", "g", "g", "gram", "grams"),
    ("hectare", "ha", "ha", "ha", "hectare", "hectares"),
    ("hour", "hr", "hr", "h", "hour", "hours"),
    ("inch", "in", "in", "″", "inch", "inches"),
    ("kilobit", "kb", "kb", "kb", "kilobit", "kilobits"),
    ("kilobyte", "kB", "kB", "kB", "kilobyte", "kilobytes"),
    ("kilogram", "kg", "kg", "kg", "kilogram", "kilograms"),
    ("kilometer", "km", "km", "km", "kilometer", "kilometers"),
    ("liter", "L", "L", "L", "liter", "liters"),
    ("megabit", "Mb", "Mb", "Mb", "megabit", "megabits"),
    ("megabyte", "MB", "MB", "MB", "megabyte", "megabytes"),
    ("meter", "m", "m", "m", "meter", "meters"),
    ("microsecond", "μs", "μs", "μs", "microsecond", "microseconds"),
    ("mile", "mi", "mi", "mi", "mile", "miles"),
    ("mile-scandinavian", "smi", "smi", "smi", "mile-scandinavian", "miles-scandinavian"),
    ("milliliter", "mL", "mL", "mL", "milliliter", "milliliters"),
    ("millimeter", "mm", "mm", "mm", "millimeter", "millimeters"),
    ("millisecond", "ms", "ms", "ms", "millisecond", "milliseconds"),
    ("minute", "min", "min", "m", "minute", "minutes"),
    ("month", "mth", "mths", "m", "month", "months"),
    ("nanosecond", "ns", "ns", "ns", "nanosecond", "nanoseconds"),
    ("ounce", "oz", "oz", "oz", "ounce", "ounces"),
    ("percent", "%", "%", "%", "percent", "percent"),
    ("petabyte", "PB", "PB", "PB", "petabyte", "petabytes"),
    ("pound", "lb", "lb", "lb", "pound", "pounds"),
    ("second", "sec", "sec", "s", "second", "seconds"),
    ("stone", "st", "st", "st", "stone", "stones"),
    ("terabit", "Tb", "Tb", "Tb", "terabit", "terabits"),
    ("terabyte", "TB", "TB", "TB", "terabyte", "terabytes"),
    ("week", "wk", "wks", "w", "week", "weeks"),
    ("yard", "yd", "yd", "yd", "yard", "yards"),
    ("year", "yr", "yrs", "y", "year", "years"),
];

/// Short labels written without a space before them
const TIGHT_UNITS: &[&str] = &["celsius", "fahrenheit", "percent"];

fn find_unit(id: &str) -> Option<&'static UnitRow> {
    UNITS.iter().find(|row| row.0 == id)
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedUnit {
    primary: &'static UnitRow,
    per: Option<&'static UnitRow>,
    display: UnitDisplay,
}

impl ResolvedUnit {
    fn parse(unit: &str, display: UnitDisplay) -> Result<Self> {
        let unknown = || I18nError::UnknownUnit(unit.to_string());
        let (primary, per) = match unit.split_once("-per-") {
            Some((a, b)) => (
                find_unit(a).ok_or_else(unknown)?,
                Some(find_unit(b).ok_or_else(unknown)?),
            ),
            None => (find_unit(unit).ok_or_else(unknown)?, None),
        };
        Ok(Self { primary, per, display })
    }

    fn label(&self, one: bool, english: bool) -> String {
        let pick = |row: &UnitRow, one: bool| -> &'static str {
            match self.display {
                UnitDisplay::Long if english => {
                    if one {
                        row.4
                    } else {
                        row.5
                    }
                }
                UnitDisplay::Narrow => row.3,
                _ => {
                    if one {
                        row.1
                    } else {
                        row.2
                    }
                }
            }
        };

        let head = pick(self.primary, one);
        match self.per {
            Some(per) if self.display == UnitDisplay::Long && english => {
                format!("{} per {}", head, pick(per, true))
            }
            Some(per) => format!("{}/{}", head, pick(per, true)),
            None => head.to_string(),
        }
    }

    fn separator(&self) -> &'static str {
        match self.display {
            UnitDisplay::Narrow => "",
            UnitDisplay::Short if self.per.is_none() && TIGHT_UNITS.contains(&self.primary.0) => {
                ""
            }
            _ => " ",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Decimal,
    Percent,
    Unit(ResolvedUnit),
}

/// A locale-bound number formatter
pub struct NumberFormatter {
    locale: LocaleCode,
    style: Style,
    digits: ResolvedDigits,
    percent_suffix: &'static str,
    decimal: DecimalFormatter,
    plurals: Arc<PluralRules>,
}

impl NumberFormatter {
    pub fn new(locale: &LocaleCode, options: &NumberFormatOptions) -> Result<Self> {
        let (style, digits) = match options {
            NumberFormatOptions::Decimal(d) => (
                Style::Decimal,
                ResolvedDigits::resolve(
                    d.minimum_integer_digits,
                    d.minimum_fraction_digits,
                    d.maximum_fraction_digits,
                    d.use_grouping,
                    0,
                    3,
                )?,
            ),
            NumberFormatOptions::Percent(d) => (
                Style::Percent,
                ResolvedDigits::resolve(
                    d.minimum_integer_digits,
                    d.minimum_fraction_digits,
                    d.maximum_fraction_digits,
                    d.use_grouping,
                    0,
                    0,
                )?,
            ),
            NumberFormatOptions::Unit(u) => {
                if u.unit.trim().is_empty() {
                    return Err(I18nError::InvalidOptions(
                        "style \"unit\" requires a unit".to_string(),
                    ));
                }
                let unit = ResolvedUnit::parse(&u.unit, u.unit_display.unwrap_or_default())?;
                let digits = ResolvedDigits::resolve(
                    u.minimum_integer_digits,
                    u.minimum_fraction_digits,
                    u.maximum_fraction_digits,
                    u.use_grouping,
                    0,
                    3,
                )?;
                (Style::Unit(unit), digits)
            }
        };

        Ok(Self {
            locale: locale.clone(),
            style,
            digits,
            percent_suffix: affixes(locale).percent_suffix,
            decimal: decimal_formatter(locale, digits.grouping)?,
            plurals: plural_rules(locale, PluralRuleType::Cardinal)?,
        })
    }

    pub fn locale(&self) -> &LocaleCode {
        &self.locale
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }

        let shaped = Decimal::try_from_f64(value, FloatPrecision::RoundTrip)
            .ok()
            .map(|mut decimal| {
                if matches!(self.style, Style::Percent) {
                    decimal.multiply_pow10(2);
                }
                self.digits.shape(&mut decimal);
                decimal
            });
        let (number, category) = match shaped {
            Some(decimal) => (
                self.decimal.format(&decimal).to_string(),
                self.plurals.select_decimal(&decimal),
            ),
            None => {
                let sign = if value < 0.0 { "-" } else { "" };
                (format!("{}∞", sign), PluralCategory::Other)
            }
        };

        match self.style {
            Style::Decimal => number,
            Style::Percent => format!("{}{}", number, self.percent_suffix),
            Style::Unit(unit) => {
                let one = category == PluralCategory::One;
                let english = self.locale.language() == "en";
                format!("{}{}{}", number, unit.separator(), unit.label(one, english))
            }
        }
    }
}

impl fmt::Debug for NumberFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberFormatter")
            .field("locale", &self.locale)
            .field("style", &self.style)
            .field("digits", &self.digits)
            .finish_non_exhaustive()
    }
}

/// Shared formatter for `(locale, options)`; absent options mean decimal
pub fn number_formatter(
    locale: &LocaleCode,
    options: Option<&NumberFormatOptions>,
) -> Result<Arc<NumberFormatter>> {
    let default_options = NumberFormatOptions::default();
    let options = options.unwrap_or(&default_options);
    cache().get_or_create(locale.as_str(), options, || NumberFormatter::new(locale, options))
}

/// Format `value` as a locale-aware decimal, percent or unit string
pub fn format_number(
    value: f64,
    locale: &LocaleCode,
    options: Option<&NumberFormatOptions>,
) -> Result<String> {
    Ok(number_formatter(locale, options)?.format(value))
}
