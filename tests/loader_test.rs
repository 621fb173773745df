//! File-backed catalog loading

mod helpers;

use std::time::Duration;

use helpers::*;

use untitled_i18n::i18n::{CatalogLoader, FileCatalogLoader, Namespace};

#[tokio::test]
async fn test_flat_json_fallback_file() {
    let ctx = TestContext::new().unwrap();
    let messages = ctx.loader().load(locale("en"), Namespace::default()).await.unwrap();
    assert_eq!(messages["greeting"], "Hello {name}");
    assert_eq!(messages["menu.open"], "Open");
}

#[tokio::test]
async fn test_namespaced_json_with_messages_wrapper() {
    let ctx = TestContext::new().unwrap();
    let messages = ctx.loader().load(locale("es"), Namespace::default()).await.unwrap();
    assert_eq!(messages["greeting"], "Hola {name}");
    assert_eq!(messages["menu.open"], "Abrir");
}

#[tokio::test]
async fn test_namespaced_toml() {
    let ctx = TestContext::new().unwrap();
    let messages = ctx.loader().load(locale("fr"), Namespace::default()).await.unwrap();
    assert_eq!(messages["greeting"], "Bonjour {name}");
    assert_eq!(messages["menu.open"], "Ouvrir");
}

#[tokio::test]
async fn test_namespace_file_takes_precedence() {
    let ctx = TestContext::new().unwrap();
    ctx.write_catalog(
        "en/checkout.json",
        r#"{ "default": { "messages": { "pay": "Pay now" } } }"#,
    )
    .unwrap();

    let loader = ctx.loader();
    let checkout = loader.load(locale("en"), Namespace::from("checkout")).await.unwrap();
    assert_eq!(checkout.len(), 1);
    assert_eq!(checkout["pay"], "Pay now");

    // Unknown namespaces fall through to the flat locale file
    let other = loader.load(locale("en"), Namespace::from("other")).await.unwrap();
    assert_eq!(other["greeting"], "Hello {name}");
}

#[tokio::test]
async fn test_malformed_candidate_is_skipped() {
    let ctx = TestContext::new().unwrap();
    ctx.write_catalog("es/broken.json", "{ not json").unwrap();
    ctx.write_catalog("es.json", r#"{ "greeting": "Hola" }"#).unwrap();

    let messages = ctx.loader().load(locale("es"), Namespace::from("broken")).await.unwrap();
    assert_eq!(messages["greeting"], "Hola");
}

#[tokio::test]
async fn test_missing_catalog_is_empty() {
    let ctx = TestContext::new().unwrap();
    let loader = FileCatalogLoader::new(ctx.path()).with_timeout(Duration::from_millis(200));
    let messages = loader.load(locale("de"), Namespace::default()).await.unwrap();
    assert!(messages.is_empty());
}

#[tokio::test]
async fn test_from_config_uses_settings() {
    let ctx = TestContext::new().unwrap();
    let loader = ctx.loader();
    assert_eq!(loader.base_path(), ctx.path());
}

#[tokio::test]
async fn test_namespace_cannot_escape_base_path() {
    let ctx = TestContext::new().unwrap();
    ctx.write_catalog("secret.json", r#"{ "token": "leaked" }"#).unwrap();
    ctx.write_catalog("locales/en.json", r#"{ "greeting": "Hello" }"#).unwrap();
    let loader = FileCatalogLoader::new(ctx.path().join("locales"));

    // {base}/en/../../secret.json resolves to the file above the base
    for namespace in ["../../secret", "../secret", "en/../../secret", "..\\..\\secret"] {
        let messages = loader.load(locale("en"), Namespace::from(namespace)).await.unwrap();
        assert!(messages.is_empty(), "{} loaded {:?}", namespace, messages);
    }

    let messages = loader.load(locale("en"), Namespace::default()).await.unwrap();
    assert_eq!(messages["greeting"], "Hello");
}
