//! Validated locale and currency identifiers
//!
//! `LocaleCode` and `CurrencyCode` are distinct types so a raw string can never
//! be passed where a validated code is expected (or vice versa).

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::errors::{I18nError, Result};

static LOCALE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)^
        [A-Za-z]{2,3}                                   # language
        (-[A-Za-z]{4})?                                 # script
        (-(?:[A-Za-z]{2}|[0-9]{3}))?                    # region
        (-(?:[A-Za-z0-9]{5,8}|[0-9][A-Za-z0-9]{3}))*    # variants
        (-[A-WY-Za-wy-z0-9](?:-[A-Za-z0-9]{2,8})+)*     # extensions
        (-[xX](?:-[A-Za-z0-9]{1,8})+)?                  # private use
        $",
    )
    .expect("locale pattern is valid")
});

/// A BCP-47 language tag in canonical case (`en`, `es-MX`, `zh-Hant-TW`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleCode(String);

impl LocaleCode {
    /// Parse and canonicalize a language tag
    ///
    /// POSIX-style underscores (`pt_BR`) are accepted and normalized to hyphens.
    pub fn parse(value: &str) -> Result<Self> {
        let normalized = value.trim().replace('_', "-");
        if !LOCALE_RE.is_match(&normalized) {
            return Err(I18nError::InvalidLocale(value.to_string()));
        }

        let mut canonical = String::with_capacity(normalized.len());
        let mut in_extension = false;
        for (i, subtag) in normalized.split('-').enumerate() {
            if i > 0 {
                canonical.push('-');
            }
            if i == 0 {
                canonical.push_str(&subtag.to_ascii_lowercase());
            } else if in_extension || subtag.len() == 1 {
                in_extension = true;
                canonical.push_str(&subtag.to_ascii_lowercase());
            } else if subtag.len() == 4 && subtag.chars().all(|c| c.is_ascii_alphabetic()) {
                let mut chars = subtag.chars();
                if let Some(first) = chars.next() {
                    canonical.push(first.to_ascii_uppercase());
                    canonical.push_str(&chars.as_str().to_ascii_lowercase());
                }
            } else if subtag.len() == 2 {
                canonical.push_str(&subtag.to_ascii_uppercase());
            } else {
                canonical.push_str(&subtag.to_ascii_lowercase());
            }
        }

        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary language subtag, e.g. `es` for `es-MX`
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    /// The same tag as an ICU4X locale for building formatters
    pub fn to_icu_locale(&self) -> Result<icu::locale::Locale> {
        icu::locale::Locale::try_from_str(&self.0)
            .map_err(|_| I18nError::InvalidLocale(self.0.clone()))
    }

    /// Region subtag if present, e.g. `MX` for `es-MX`
    pub fn region(&self) -> Option<&str> {
        self.0.split('-').skip(1).take_while(|s| s.len() > 1).find(|s| {
            (s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()))
                || (s.len() == 3 && s.chars().all(|c| c.is_ascii_digit()))
        })
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocaleCode {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LocaleCode {
    type Error = I18nError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for LocaleCode {
    type Error = I18nError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<LocaleCode> for String {
    fn from(value: LocaleCode) -> Self {
        value.0
    }
}

impl AsRef<str> for LocaleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An ISO 4217 alphabetic currency code, upper-cased (`EUR`, `USD`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(I18nError::InvalidCurrency(value.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = I18nError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = I18nError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
