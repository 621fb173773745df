//! On-disk catalog directory with matching settings

use std::path::Path;
use std::sync::{Arc, Once};

use tempfile::TempDir;

use untitled_i18n::config::Settings;
use untitled_i18n::i18n::FileCatalogLoader;
use untitled_i18n::I18n;

static LOGGING: Once = Once::new();

/// Route library logs to the test writer once per test binary
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("untitled_i18n=debug")
            .with_test_writer()
            .try_init();
    });
}

/// A temporary `locales/` tree covering every catalog layout the file
/// loader understands
pub struct TestContext {
    pub temp_dir: TempDir,
    pub settings: Settings,
}

impl TestContext {
    pub fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        init_test_logging();

        let temp_dir = tempfile::tempdir()?;
        let base = temp_dir.path();

        // Flat `{locale}.json`
        write(base, "en.json", r#"{ "greeting": "Hello {name}", "menu": { "open": "Open" } }"#)?;
        // Namespaced JSON wrapped in `messages`
        write(
            base,
            "es/messages.json",
            r#"{ "messages": { "greeting": "Hola {name}", "menu": { "open": "Abrir" } } }"#,
        )?;
        // Namespaced TOML
        write(
            base,
            "fr/messages.toml",
            "greeting = \"Bonjour {name}\"\n\n[menu]\nopen = \"Ouvrir\"\n",
        )?;

        let mut settings = Settings::default();
        settings.i18n.default_locale = "en".to_string();
        settings.i18n.default_currency = "USD".to_string();
        settings.i18n.supported_locales = vec!["en".into(), "es".into(), "fr".into()];
        settings.catalog.base_path = base.to_string_lossy().into_owned();
        settings.catalog.timeout_ms = 1000;

        Ok(Self { temp_dir, settings })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_catalog(&self, relative: &str, content: &str) -> std::io::Result<()> {
        write(self.path(), relative, content)
    }

    pub fn loader(&self) -> FileCatalogLoader {
        FileCatalogLoader::from_config(&self.settings.catalog)
    }

    pub fn i18n(&self) -> Arc<I18n> {
        let i18n = I18n::from_settings(&self.settings, Arc::new(self.loader()))
            .expect("test settings are valid");
        Arc::new(i18n)
    }
}

fn write(base: &Path, relative: &str, content: &str) -> std::io::Result<()> {
    let path = base.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}
