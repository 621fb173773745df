//! Date and time formatting
//!
//! Instants are rendered in UTC unless `timeZone` names a fixed offset.
//! Inputs without zone information are taken to be UTC. Offsets are applied
//! with chrono; the wall-clock result is handed to an ICU4X field-set
//! formatter.

use std::fmt;
use std::sync::Arc;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc,
};
use icu::calendar::{Date as IcuDate, Iso};
use icu::datetime::fieldsets::builder::{DateFields, FieldSetBuilder};
use icu::datetime::fieldsets::enums::CompositeDateTimeFieldSet;
use icu::datetime::input::{DateTime as IcuDateTime, Time as IcuTime};
use icu::datetime::options::{Alignment, Length, TimePrecision, YearStyle};
use icu::locale::extensions::unicode::{key, value};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::brands::LocaleCode;
use super::cache::{FormatCache, FormatterKind};
use crate::utils::errors::{I18nError, Result};

static DATE_TIME_CACHE: Lazy<FormatCache<DateTimeFormatter>> =
    Lazy::new(|| FormatCache::new(FormatterKind::DateTime));

pub(crate) fn cache() -> &'static FormatCache<DateTimeFormatter> {
    &DATE_TIME_CACHE
}

/// Anything that can be turned into an instant
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    Instant(DateTime<Utc>),
    Naive(NaiveDateTime),
    Date(NaiveDate),
    /// Milliseconds since the Unix epoch
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

impl DateInput {
    pub fn to_utc(&self) -> Result<DateTime<Utc>> {
        match self {
            DateInput::Instant(dt) => Ok(*dt),
            DateInput::Naive(naive) => Ok(Utc.from_utc_datetime(naive)),
            DateInput::Date(date) => date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive))
                .ok_or_else(|| I18nError::InvalidDate(date.to_string())),
            DateInput::Millis(ms) => millis_to_utc(*ms),
            DateInput::FractionalMillis(ms) => {
                if !ms.is_finite() {
                    return Err(I18nError::InvalidDate(ms.to_string()));
                }
                millis_to_utc(ms.trunc() as i64)
            }
            DateInput::Text(text) => parse_date_text(text),
        }
    }
}

fn millis_to_utc(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| I18nError::InvalidDate(ms.to_string()))
}

fn parse_date_text(text: &str) -> Result<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| I18nError::InvalidDate(text.to_string()))
}

impl From<DateTime<Utc>> for DateInput {
    fn from(value: DateTime<Utc>) -> Self {
        DateInput::Instant(value)
    }
}

impl From<DateTime<FixedOffset>> for DateInput {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DateInput::Instant(value.with_timezone(&Utc))
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        DateInput::Naive(value)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        DateInput::Date(value)
    }
}

impl From<i64> for DateInput {
    fn from(value: i64) -> Self {
        DateInput::Millis(value)
    }
}

impl From<f64> for DateInput {
    fn from(value: f64) -> Self {
        DateInput::FractionalMillis(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

/// Coarse `dateStyle` / `timeStyle` bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateTimeStyle {
    Full,
    Long,
    Medium,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextWidth {
    Long,
    Short,
    Narrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericWidth {
    #[serde(rename = "numeric")]
    Numeric,
    #[serde(rename = "2-digit")]
    TwoDigit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonthWidth {
    #[serde(rename = "numeric")]
    Numeric,
    #[serde(rename = "2-digit")]
    TwoDigit,
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "narrow")]
    Narrow,
}

/// Either style buckets or individual fields; the two cannot be mixed
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFormatOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_style: Option<DateTimeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_style: Option<DateTimeStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<TextWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<NumericWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<MonthWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<NumericWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<NumericWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<NumericWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<NumericWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour12: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl DateFormatOptions {
    pub fn date_style(style: DateTimeStyle) -> Self {
        Self {
            date_style: Some(style),
            ..Default::default()
        }
    }

    pub fn time_style(style: DateTimeStyle) -> Self {
        Self {
            time_style: Some(style),
            ..Default::default()
        }
    }

    pub fn styles(date: DateTimeStyle, time: DateTimeStyle) -> Self {
        Self {
            date_style: Some(date),
            time_style: Some(time),
            ..Default::default()
        }
    }

    pub fn with_time_zone(mut self, zone: impl Into<String>) -> Self {
        self.time_zone = Some(zone.into());
        self
    }

    fn has_fields(&self) -> bool {
        self.weekday.is_some()
            || self.year.is_some()
            || self.month.is_some()
            || self.day.is_some()
            || self.hour.is_some()
            || self.minute.is_some()
            || self.second.is_some()
    }
}

/// Parse `UTC`, `GMT`, `Etc/UTC` or a fixed `±HH:MM` offset
pub(crate) fn parse_time_zone(zone: &str) -> Result<FixedOffset> {
    let invalid = || I18nError::InvalidOptions(format!("unsupported timeZone: {}", zone));
    match zone {
        "UTC" | "GMT" | "Etc/UTC" | "Etc/GMT" | "Z" => {
            return FixedOffset::east_opt(0).ok_or_else(invalid)
        }
        _ => {}
    }

    let (sign, rest) = match zone.as_bytes().first() {
        Some(b'+') => (1, &zone[1..]),
        Some(b'-') => (-1, &zone[1..]),
        _ => return Err(invalid()),
    };
    // bare digits only; `str::parse` would accept a second sign
    let digits = |part: &str| -> Result<u32> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse().map_err(|_| invalid())
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let (hours, minutes) = (digits(hours)?, digits(minutes)?);
    if hours > 14 || minutes > 59 {
        return Err(invalid());
    }
    let seconds = (hours * 3600 + minutes * 60) as i32;
    FixedOffset::east_opt(sign * seconds).ok_or_else(invalid)
}

fn style_length(style: DateTimeStyle) -> Length {
    match style {
        DateTimeStyle::Full | DateTimeStyle::Long => Length::Long,
        DateTimeStyle::Medium => Length::Medium,
        DateTimeStyle::Short => Length::Short,
    }
}

fn style_field_set(date: Option<DateTimeStyle>, time: Option<DateTimeStyle>) -> FieldSetBuilder {
    let mut builder = FieldSetBuilder::default();
    builder.length = Some(date.or(time).map_or(Length::Medium, style_length));
    builder.date_fields = date.map(|style| match style {
        DateTimeStyle::Full => DateFields::YMDE,
        _ => DateFields::YMD,
    });
    builder.time_precision = time.map(|style| match style {
        DateTimeStyle::Short => TimePrecision::Minute,
        _ => TimePrecision::Second,
    });
    builder
}

/// Closest ICU4X field set for Intl-style component options
///
/// Field sets pick one length for every text field, so the widest requested
/// month or weekday width decides it. Two-digit day, month or hour requests
/// switch to column alignment, which pads every numeric field.
fn component_field_set(options: &DateFormatOptions) -> FieldSetBuilder {
    let has_time = options.hour.is_some() || options.minute.is_some() || options.second.is_some();
    let (y, m, d, e) = (
        options.year.is_some(),
        options.month.is_some(),
        options.day.is_some(),
        options.weekday.is_some(),
    );

    let date_fields = match (y, m, d, e) {
        (false, false, false, false) if has_time => None,
        // nothing requested: numeric date
        (false, false, false, false) => Some(DateFields::YMD),
        (false, false, false, true) => Some(DateFields::E),
        (false, true, false, false) => Some(DateFields::M),
        (false, true, false, true) => Some(DateFields::MDE),
        (false, _, true, false) => Some(if m { DateFields::MD } else { DateFields::D }),
        (false, _, true, true) => Some(if m { DateFields::MDE } else { DateFields::DE }),
        (true, false, false, false) => Some(DateFields::Y),
        (true, true, false, false) => Some(DateFields::YM),
        (true, _, _, false) => Some(DateFields::YMD),
        (true, _, _, true) => Some(DateFields::YMDE),
    };

    let mut builder = FieldSetBuilder::default();
    builder.length = Some(match (options.month, options.weekday) {
        (Some(MonthWidth::Long), _) | (None, Some(TextWidth::Long)) => Length::Long,
        (Some(MonthWidth::Short | MonthWidth::Narrow), _) | (None, Some(_)) => Length::Medium,
        _ => Length::Short,
    });
    if matches!(
        date_fields,
        Some(DateFields::Y | DateFields::YM | DateFields::YMD | DateFields::YMDE)
    ) {
        builder.year_style = Some(match options.year {
            Some(NumericWidth::TwoDigit) => YearStyle::Auto,
            _ => YearStyle::Full,
        });
    }
    builder.date_fields = date_fields;
    builder.time_precision = if options.second.is_some() {
        Some(TimePrecision::Second)
    } else if options.minute.is_some() {
        Some(TimePrecision::Minute)
    } else if options.hour.is_some() {
        Some(TimePrecision::Hour)
    } else {
        None
    };

    let two_digit = [options.day, options.hour].contains(&Some(NumericWidth::TwoDigit))
        || options.month == Some(MonthWidth::TwoDigit);
    if two_digit {
        builder.alignment = Some(Alignment::Column);
    }
    builder
}

/// A locale-bound date/time formatter
pub struct DateTimeFormatter {
    locale: LocaleCode,
    formatter: icu::datetime::DateTimeFormatter<CompositeDateTimeFieldSet>,
    /// `timeStyle` long and full append the offset name
    zone_label: bool,
    offset: FixedOffset,
}

impl DateTimeFormatter {
    pub fn new(locale: &LocaleCode, options: &DateFormatOptions) -> Result<Self> {
        let styled = options.date_style.is_some() || options.time_style.is_some();
        if styled && options.has_fields() {
            return Err(I18nError::InvalidOptions(
                "dateStyle/timeStyle cannot be combined with individual date or time fields"
                    .to_string(),
            ));
        }

        let offset = match options.time_zone.as_deref() {
            Some(zone) => parse_time_zone(zone)?,
            None => Utc.fix(),
        };

        let builder = if styled {
            style_field_set(options.date_style, options.time_style)
        } else {
            component_field_set(options)
        };
        let field_set = builder.build_composite_datetime().map_err(|e| {
            I18nError::InvalidOptions(format!("unsupported date field combination: {:?}", e))
        })?;

        let mut icu_locale = locale.to_icu_locale()?;
        if let Some(hour12) = options.hour12 {
            let cycle = if hour12 { value!("h12") } else { value!("h23") };
            icu_locale.extensions.unicode.keywords.set(key!("hc"), cycle);
        }
        let formatter = icu::datetime::DateTimeFormatter::try_new(icu_locale.into(), field_set)
            .map_err(|e| I18nError::LocaleData(format!("date patterns for {}: {:?}", locale, e)))?;

        Ok(Self {
            locale: locale.clone(),
            formatter,
            zone_label: matches!(
                options.time_style,
                Some(DateTimeStyle::Full | DateTimeStyle::Long)
            ),
            offset,
        })
    }

    pub fn locale(&self) -> &LocaleCode {
        &self.locale
    }

    pub fn format(&self, instant: &DateTime<Utc>) -> Result<String> {
        let local = instant.with_timezone(&self.offset).naive_local();
        let input = to_icu_datetime(&local)?;
        let mut out = self.formatter.format(&input).to_string();
        if self.zone_label {
            out.push(' ');
            out.push_str(&zone_label(&self.offset));
        }
        Ok(out)
    }
}

impl fmt::Debug for DateTimeFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTimeFormatter")
            .field("locale", &self.locale)
            .field("zone_label", &self.zone_label)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

fn to_icu_datetime(local: &NaiveDateTime) -> Result<IcuDateTime<Iso>> {
    let invalid = || I18nError::InvalidDate(local.to_string());
    let date = IcuDate::try_new_iso(local.year(), local.month() as u8, local.day() as u8)
        .map_err(|_| invalid())?;
    // chrono reports leap seconds as nanosecond overflow
    let nanos = local.nanosecond().min(999_999_999);
    let time = IcuTime::try_new(
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
        nanos,
    )
    .map_err(|_| invalid())?;
    Ok(IcuDateTime { date, time })
}

fn zone_label(offset: &FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return "UTC".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let (hours, minutes) = (seconds.abs() / 3600, seconds.abs() % 3600 / 60);
    if minutes == 0 {
        format!("GMT{}{}", sign, hours)
    } else {
        format!("GMT{}{}:{:02}", sign, hours, minutes)
    }
}

/// Shared formatter for `(locale, options)`; absent options mean numeric date
pub fn date_time_formatter(
    locale: &LocaleCode,
    options: Option<&DateFormatOptions>,
) -> Result<Arc<DateTimeFormatter>> {
    let default_options = DateFormatOptions::default();
    let options = options.unwrap_or(&default_options);
    cache().get_or_create(locale.as_str(), options, || DateTimeFormatter::new(locale, options))
}

/// Format a date-like input for `locale`
pub fn format_date<D>(input: D, locale: &LocaleCode, options: Option<&DateFormatOptions>) -> Result<String>
where
    D: Into<DateInput>,
{
    let instant = input.into().to_utc()?;
    date_time_formatter(locale, options)?.format(&instant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sample() -> DateTime<Utc> {
        // Monday
        Utc.with_ymd_and_hms(2024, 1, 15, 15, 5, 9).unwrap()
    }

    fn fmt(locale: &str, options: DateFormatOptions) -> String {
        DateTimeFormatter::new(&LocaleCode::parse(locale).unwrap(), &options)
            .unwrap()
            .format(&sample())
            .unwrap()
    }

    #[test]
    fn test_default_numeric_date() {
        assert_eq!(fmt("en", DateFormatOptions::default()), "1/15/2024");
        assert_eq!(fmt("fr", DateFormatOptions::default()), "15/01/2024");
        let de = fmt("de", DateFormatOptions::default());
        assert!(de.starts_with("15.") && de.ends_with(".2024"), "{}", de);
    }

    #[test]
    fn test_date_styles() {
        assert_eq!(
            fmt("en", DateFormatOptions::date_style(DateTimeStyle::Full)),
            "Monday, January 15, 2024"
        );
        assert_eq!(
            fmt("en", DateFormatOptions::date_style(DateTimeStyle::Medium)),
            "Jan 15, 2024"
        );
        assert_eq!(
            fmt("en", DateFormatOptions::date_style(DateTimeStyle::Short)),
            "1/15/24"
        );
        assert_eq!(
            fmt("es", DateFormatOptions::date_style(DateTimeStyle::Long)),
            "15 de enero de 2024"
        );
    }

    #[test]
    fn test_time_styles() {
        assert_eq!(
            fmt("en", DateFormatOptions::time_style(DateTimeStyle::Short)),
            "3:05\u{202f}PM"
        );
        assert_eq!(
            fmt("de", DateFormatOptions::time_style(DateTimeStyle::Medium)),
            "15:05:09"
        );
        assert_eq!(
            fmt("en", DateFormatOptions::time_style(DateTimeStyle::Long)),
            "3:05:09\u{202f}PM UTC"
        );

        let both = fmt("en", DateFormatOptions::styles(DateTimeStyle::Long, DateTimeStyle::Short));
        assert!(both.starts_with("January 15, 2024"), "{}", both);
        assert!(both.ends_with("3:05\u{202f}PM"), "{}", both);
    }

    #[test]
    fn test_field_subsets() {
        let month_year = DateFormatOptions {
            year: Some(NumericWidth::Numeric),
            month: Some(MonthWidth::Long),
            ..Default::default()
        };
        assert_eq!(fmt("en", month_year.clone()), "January 2024");
        let es = fmt("es", month_year);
        assert!(es.contains("enero") && es.contains("2024"), "{}", es);

        let weekday_date = DateFormatOptions {
            weekday: Some(TextWidth::Short),
            year: Some(NumericWidth::Numeric),
            month: Some(MonthWidth::Numeric),
            day: Some(NumericWidth::Numeric),
            ..Default::default()
        };
        let out = fmt("en", weekday_date);
        assert!(out.contains("Mon") && out.contains("1/15/"), "{}", out);

        let time_only = DateFormatOptions {
            hour: Some(NumericWidth::Numeric),
            minute: Some(NumericWidth::TwoDigit),
            hour12: Some(false),
            ..Default::default()
        };
        assert_eq!(fmt("en", time_only), "15:05");
    }

    #[test]
    fn test_hour12_overrides_locale_clock() {
        let opts = DateFormatOptions {
            hour: Some(NumericWidth::Numeric),
            minute: Some(NumericWidth::TwoDigit),
            hour12: Some(true),
            ..Default::default()
        };
        let out = fmt("de", opts);
        assert!(out.starts_with("3:05"), "{}", out);
    }

    #[test]
    fn test_fixed_offset_time_zone() {
        let opts = DateFormatOptions::styles(DateTimeStyle::Short, DateTimeStyle::Long)
            .with_time_zone("+05:30");
        let out = fmt("en", opts);
        assert!(out.starts_with("1/15/24"), "{}", out);
        assert!(out.contains("8:35:09"), "{}", out);
        assert!(out.ends_with(" GMT+5:30"), "{}", out);

        let opts = DateFormatOptions::date_style(DateTimeStyle::Short).with_time_zone("-16:00");
        assert_matches!(
            DateTimeFormatter::new(&LocaleCode::parse("en").unwrap(), &opts),
            Err(I18nError::InvalidOptions(_))
        );
        let opts = DateFormatOptions::default().with_time_zone("Europe/Madrid");
        assert_matches!(
            DateTimeFormatter::new(&LocaleCode::parse("en").unwrap(), &opts),
            Err(I18nError::InvalidOptions(_))
        );
    }

    #[test]
    fn test_time_zone_offsets_take_unsigned_digits() {
        assert_eq!(parse_time_zone("+05:30").unwrap().local_minus_utc(), 19_800);
        assert_eq!(parse_time_zone("-5").unwrap().local_minus_utc(), -18_000);
        for zone in ["--05:00", "++5", "+05:-1", "+-5", "+", "+05:", "+ 5", "+5:+30"] {
            assert_matches!(
                parse_time_zone(zone),
                Err(I18nError::InvalidOptions(_)),
                "{} should be rejected",
                zone
            );
        }
    }

    #[test]
    fn test_style_and_fields_conflict() {
        let opts = DateFormatOptions {
            date_style: Some(DateTimeStyle::Short),
            year: Some(NumericWidth::Numeric),
            ..Default::default()
        };
        assert_matches!(
            DateTimeFormatter::new(&LocaleCode::parse("en").unwrap(), &opts),
            Err(I18nError::InvalidOptions(_))
        );
    }

    #[test]
    fn test_inputs() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(DateInput::from("2024-01-15").to_utc().unwrap(), expected);
        assert_eq!(DateInput::from("2024-01-15T00:00:00").to_utc().unwrap(), expected);
        assert_eq!(
            DateInput::from("2024-01-15T01:00:00+01:00").to_utc().unwrap(),
            expected
        );
        assert_eq!(
            DateInput::from(expected.timestamp_millis()).to_utc().unwrap(),
            expected
        );
        assert_eq!(
            DateInput::from(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
                .to_utc()
                .unwrap(),
            expected
        );
        assert_matches!(DateInput::from("yesterday").to_utc(), Err(I18nError::InvalidDate(_)));
        assert_matches!(DateInput::from(f64::NAN).to_utc(), Err(I18nError::InvalidDate(_)));
    }

    #[test]
    fn test_options_serialize_with_intl_names() {
        let opts = DateFormatOptions {
            month: Some(MonthWidth::TwoDigit),
            time_zone: Some("UTC".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&opts).unwrap(),
            r#"{"month":"2-digit","timeZone":"UTC"}"#
        );
    }
}
