//! i18n demo
//!
//! Loads settings, reads catalogs from disk and walks through a locale and
//! currency switch, printing translated and formatted output.

use std::sync::Arc;

use tracing::{info, warn};

use untitled_i18n::{
    config::Settings,
    i18n::{values, FileCatalogLoader, I18n},
    intl::{self, CurrencyCode, DateFormatOptions, DateTimeStyle, RelativeTimeFormatOptions, RelativeTimeUnit},
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", untitled_i18n::info());

    intl::configure_format_caches(settings.cache.max_entries);

    let loader = Arc::new(FileCatalogLoader::from_config(&settings.catalog));
    let i18n = Arc::new(I18n::from_settings(&settings, loader)?);

    let subscription = i18n.on_change(|state| {
        info!(locale = %state.locale, currency = %state.currency, "I18n state changed");
    });

    // Pick the starting locale from the environment
    let requested: Vec<String> = std::env::var("LANG")
        .ok()
        .map(|lang| lang.split('.').next().unwrap_or_default().replace('_', "-"))
        .into_iter()
        .collect();
    let initial = i18n.negotiate(&requested);
    i18n.set_locale(initial.as_str()).await;

    print_samples(&i18n)?;

    let next_currency = if i18n.currency().as_str() == "USD" { "EUR" } else { "USD" };
    i18n.set_currency(CurrencyCode::parse(next_currency)?);

    for locale in i18n.supported_locales().to_vec() {
        if locale != i18n.locale() {
            i18n.set_locale(locale.as_str()).await;
            print_samples(&i18n)?;
        }
    }

    subscription.unsubscribe();

    for stats in intl::format_cache_stats() {
        info!(
            kind = stats.kind.as_str(),
            entries = stats.entries,
            hits = stats.hits,
            misses = stats.misses,
            "Format cache"
        );
    }

    if i18n.catalog_len() == 0 {
        warn!(base_path = %settings.catalog.base_path, "No catalog messages were found");
    }

    Ok(())
}

fn print_samples(i18n: &I18n) -> untitled_i18n::Result<()> {
    let ctx = i18n.formatting_context();
    let now = chrono::Utc::now();

    println!("== {} / {} ==", ctx.locale(), ctx.currency());
    println!("{}", i18n.t("greeting", Some(&values([("name", "Ana")]))));
    println!("{}", i18n.t("cart.items", Some(&values([("count", 3)]))));
    println!("{}", ctx.format_currency(1234.5, None)?);
    println!("{}", ctx.format_number(9876543.21, None)?);
    println!(
        "{}",
        ctx.format_date(now, Some(&DateFormatOptions::styles(DateTimeStyle::Long, DateTimeStyle::Short)))?
    );
    println!(
        "{}",
        ctx.format_relative_time(-1.0, RelativeTimeUnit::Day, Some(&RelativeTimeFormatOptions::auto()))?
    );
    println!("plural(2) = {}", ctx.get_plural_category(2.0, None)?);
    Ok(())
}
