//! Error handling for untitled-i18n
//!
//! This module defines the error type shared by the formatting layer, the
//! catalog loaders and the configuration code. The I18n manager itself never
//! surfaces loader errors; they are logged and treated as empty catalogs.

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum I18nError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid locale code: {0}")]
    InvalidLocale(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Invalid format options: {0}")]
    InvalidOptions(String),

    #[error("Invalid date value: {0}")]
    InvalidDate(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Locale data unavailable: {0}")]
    LocaleData(String),

    #[error("Catalog not found: {locale}/{namespace}")]
    CatalogNotFound { locale: String, namespace: String },

    #[error("Invalid catalog format: {0}")]
    CatalogFormat(String),

    #[error("Catalog load timed out after {timeout_ms}ms: {locale}/{namespace}")]
    LoaderTimeout {
        locale: String,
        namespace: String,
        timeout_ms: u64,
    },

    #[error("{0} must be used within an I18nProvider")]
    MissingProvider(&'static str),

    #[error("Logging setup error: {0}")]
    Logging(String),
}

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, I18nError>;

impl I18nError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            I18nError::Config(_) => false,
            I18nError::ConfigLoad(_) => false,
            I18nError::Io(_) => true,
            I18nError::Serialization(_) => false,
            I18nError::TomlParse(_) => false,
            I18nError::InvalidLocale(_) => false,
            I18nError::InvalidCurrency(_) => false,
            I18nError::InvalidOptions(_) => false,
            I18nError::InvalidDate(_) => false,
            I18nError::UnknownUnit(_) => false,
            I18nError::LocaleData(_) => false,
            I18nError::CatalogNotFound { .. } => true,
            I18nError::CatalogFormat(_) => false,
            I18nError::LoaderTimeout { .. } => true,
            I18nError::MissingProvider(_) => false,
            I18nError::Logging(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            I18nError::Config(_) => ErrorSeverity::Critical,
            I18nError::ConfigLoad(_) => ErrorSeverity::Critical,
            I18nError::MissingProvider(_) => ErrorSeverity::Critical,
            I18nError::Logging(_) => ErrorSeverity::Critical,
            I18nError::CatalogNotFound { .. } => ErrorSeverity::Warning,
            I18nError::LoaderTimeout { .. } => ErrorSeverity::Warning,
            I18nError::InvalidDate(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
