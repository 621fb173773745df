//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

use crate::i18n::LocaleSwitchPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub i18n: I18nConfig,
    pub catalog: CatalogConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// Locale and currency configuration for the I18n manager
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_locale: String,
    pub default_currency: String,
    pub supported_locales: Vec<String>,
    #[serde(default)]
    pub initial_locale: Option<String>,
    #[serde(default)]
    pub initial_currency: Option<String>,
    #[serde(default)]
    pub switch_policy: LocaleSwitchPolicy,
}

/// Catalog loading configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub base_path: String,
    pub timeout_ms: u64,
    pub default_namespace: String,
}

/// Formatter cache configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// `None` keeps the caches unbounded
    #[serde(default)]
    pub max_entries: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    ///
    /// Built-in defaults are overridden by an optional `config.toml` in the
    /// working directory, which is in turn overridden by `UNTITLED_I18N__*`
    /// environment variables (e.g. `UNTITLED_I18N__I18N__DEFAULT_LOCALE=es`).
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::from_file("config")
    }

    /// Load settings from a specific file (extension optional)
    pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("UNTITLED_I18N")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("i18n.supported_locales")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Parse settings from a TOML document layered over the defaults
    pub fn from_toml_str(content: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::I18nError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            i18n: I18nConfig {
                default_locale: "en".to_string(),
                default_currency: "EUR".to_string(),
                supported_locales: vec!["en".to_string(), "es".to_string()],
                initial_locale: None,
                initial_currency: None,
                switch_policy: LocaleSwitchPolicy::default(),
            },
            catalog: CatalogConfig {
                base_path: "locales".to_string(),
                timeout_ms: 5000,
                default_namespace: "messages".to_string(),
            },
            cache: CacheConfig { max_entries: None },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                file_path: None,
            },
        }
    }
}
