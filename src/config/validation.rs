//! Configuration validation module
//!
//! This module provides validation functions for the configuration to ensure
//! locale and currency codes are well-formed before the manager is built.

use super::Settings;
use crate::intl::{CurrencyCode, LocaleCode};
use crate::utils::errors::{I18nError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_i18n_config(&settings.i18n)?;
    validate_catalog_config(&settings.catalog)?;
    validate_cache_config(&settings.cache)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate internationalization configuration
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.supported_locales.is_empty() {
        return Err(I18nError::Config(
            "At least one supported locale is required".to_string(),
        ));
    }

    for locale in &config.supported_locales {
        LocaleCode::parse(locale)
            .map_err(|e| I18nError::Config(format!("Supported locale {}: {}", locale, e)))?;
    }

    let default_locale = LocaleCode::parse(&config.default_locale)
        .map_err(|e| I18nError::Config(format!("Default locale: {}", e)))?;

    let supported = config
        .supported_locales
        .iter()
        .filter_map(|l| LocaleCode::parse(l).ok())
        .any(|l| l == default_locale);
    if !supported {
        return Err(I18nError::Config(
            "Default locale must be in supported locales list".to_string(),
        ));
    }

    CurrencyCode::parse(&config.default_currency)
        .map_err(|e| I18nError::Config(format!("Default currency: {}", e)))?;

    if let Some(ref initial) = config.initial_locale {
        LocaleCode::parse(initial)
            .map_err(|e| I18nError::Config(format!("Initial locale: {}", e)))?;
    }

    if let Some(ref initial) = config.initial_currency {
        CurrencyCode::parse(initial)
            .map_err(|e| I18nError::Config(format!("Initial currency: {}", e)))?;
    }

    Ok(())
}

/// Validate catalog loader configuration
fn validate_catalog_config(config: &super::CatalogConfig) -> Result<()> {
    if config.base_path.is_empty() {
        return Err(I18nError::Config("Catalog base path is required".to_string()));
    }

    if config.timeout_ms == 0 {
        return Err(I18nError::Config(
            "Catalog timeout must be greater than 0".to_string(),
        ));
    }

    if config.default_namespace.is_empty() {
        return Err(I18nError::Config(
            "Default namespace must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate formatter cache configuration
fn validate_cache_config(config: &super::CacheConfig) -> Result<()> {
    if config.max_entries == Some(0) {
        return Err(I18nError::Config(
            "Cache max_entries must be greater than 0 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(I18nError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(I18nError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.format.as_str()) {
        return Err(I18nError::Config(format!(
            "Invalid log format: {}. Valid formats: {:?}",
            config.format, valid_formats
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_locale_must_be_supported() {
        let mut settings = Settings::default();
        settings.i18n.default_locale = "fr".to_string();

        assert_matches!(validate_settings(&settings), Err(I18nError::Config(msg)) if msg.contains("supported"));
    }

    #[test]
    fn test_default_locale_matches_after_canonicalization() {
        let mut settings = Settings::default();
        settings.i18n.supported_locales = vec!["en-US".to_string()];
        settings.i18n.default_locale = "en-us".to_string();

        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_rejects_malformed_currency() {
        let mut settings = Settings::default();
        settings.i18n.default_currency = "EURO".to_string();

        assert_matches!(validate_settings(&settings), Err(I18nError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_cache_bound_and_timeout() {
        let mut settings = Settings::default();
        settings.cache.max_entries = Some(0);
        assert!(validate_settings(&settings).is_err());

        let mut settings = Settings::default();
        settings.catalog.timeout_ms = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
