//! Core value types shared by the manager, loaders and adapters

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::intl::{CurrencyCode, LocaleCode};

/// A flat catalog: message id to ICU-style template
pub type Messages = HashMap<String, String>;

/// Named catalog partition such as `common` or `checkout`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub const DEFAULT: &'static str = "messages";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Namespace {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Namespace {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What listeners receive after every locale or currency change
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct I18nState {
    pub locale: LocaleCode,
    pub currency: CurrencyCode,
}

/// An interpolation value for [`crate::i18n::I18n::t`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageValue {
    Number(f64),
    Text(String),
}

impl MessageValue {
    /// Numeric view used by `plural` and `number` arguments
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MessageValue::Number(n) => Some(*n),
            MessageValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for MessageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageValue::Number(n) => write!(f, "{}", n),
            MessageValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MessageValue {
    fn from(value: &str) -> Self {
        MessageValue::Text(value.to_string())
    }
}

impl From<String> for MessageValue {
    fn from(value: String) -> Self {
        MessageValue::Text(value)
    }
}

impl From<f64> for MessageValue {
    fn from(value: f64) -> Self {
        MessageValue::Number(value)
    }
}

macro_rules! message_value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for MessageValue {
                fn from(value: $ty) -> Self {
                    MessageValue::Number(value as f64)
                }
            }
        )*
    };
}

message_value_from_int!(i32, i64, u32, u64, usize);

/// Named values interpolated into a message template
pub type TranslationValues = HashMap<String, MessageValue>;

/// Build [`TranslationValues`] from `(name, value)` pairs
pub fn values<I, K, V>(pairs: I) -> TranslationValues
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<MessageValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
