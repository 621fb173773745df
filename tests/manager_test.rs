//! Manager behaviour: locale switching, catalogs, notifications and
//! overlapping switches

mod helpers;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use helpers::*;

use untitled_i18n::i18n::{values, I18nAdapter, I18nProvider, Namespace};
use untitled_i18n::{I18n, I18nError, I18nOptions, LocaleCode, LocaleSwitchPolicy};

#[tokio::test]
async fn test_end_to_end_switch_and_fallback() {
    init_test_logging();
    let loader = RecordingLoader::new(hello_catalogs());
    let i18n = I18n::new(en_es_options().with_loader(loader.clone()));

    // Construction activates an empty catalog without loading
    assert_eq!(i18n.t("hello", None), "hello");
    assert!(loader.calls().is_empty());

    i18n.set_locale_with_namespace("es", "common").await;
    assert_eq!(i18n.locale(), locale("es"));
    assert_eq!(i18n.t("hello", None), "Hola");

    i18n.set_locale_with_namespace("fr", "common").await;
    assert_eq!(i18n.locale(), locale("en"));
    assert_eq!(i18n.t("hello", None), "Hello");

    assert_eq!(
        loader.calls(),
        vec![
            ("es".to_string(), "common".to_string()),
            ("en".to_string(), "common".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_default_namespace_is_used() {
    let loader = RecordingLoader::new(hello_catalogs());
    let i18n = I18n::new(
        en_es_options()
            .with_loader(loader.clone())
            .with_default_namespace("checkout"),
    );
    i18n.set_locale("es").await;
    assert_eq!(loader.calls(), vec![("es".to_string(), "checkout".to_string())]);
    assert_eq!(i18n.default_namespace(), &Namespace::from("checkout"));
}

#[tokio::test]
async fn test_malformed_locale_falls_back_to_default() {
    let i18n = I18n::new(en_es_options().with_loader(hello_catalogs()));
    assert!(i18n.set_locale("not a locale!").await);
    assert_eq!(i18n.locale(), locale("en"));
    assert_eq!(i18n.t("hello", None), "Hello");
}

#[tokio::test]
async fn test_unknown_id_and_interpolation() {
    let loader = untitled_i18n::i18n::StaticCatalogLoader::new().with_locale(
        locale("en"),
        [
            ("welcome", "Welcome back, {name}!"),
            ("inbox", "{count, plural, =0 {No messages} one {# message} other {# messages}}"),
        ],
    );
    let i18n = I18n::new(en_es_options().with_loader(loader));
    i18n.set_locale("en").await;

    assert_eq!(i18n.t("missing.key", None), "missing.key");
    assert_eq!(i18n.t_in("other", "missing.key", None), "missing.key");
    assert_eq!(i18n.t("welcome", Some(&values([("name", "Ana")]))), "Welcome back, Ana!");
    assert_eq!(i18n.t("welcome", None), "Welcome back, {name}!");
    assert_eq!(i18n.t("inbox", Some(&values([("count", 0)]))), "No messages");
    assert_eq!(i18n.t("inbox", Some(&values([("count", 1)]))), "1 message");
    assert_eq!(i18n.t("inbox", Some(&values([("count", 1200)]))), "1,200 messages");
}

#[tokio::test]
async fn test_failing_loader_activates_empty_catalog() {
    let i18n = I18n::new(en_es_options().with_loader(hello_catalogs()));
    i18n.set_locale("es").await;
    assert_eq!(i18n.catalog_len(), 1);

    let failing = |_: LocaleCode, _: Namespace| async {
        Err::<untitled_i18n::i18n::Messages, _>(I18nError::CatalogNotFound {
            locale: "es".to_string(),
            namespace: "messages".to_string(),
        })
    };
    let i18n = I18n::new(en_es_options().with_loader(failing));
    assert!(i18n.set_locale("es").await);
    assert_eq!(i18n.locale(), locale("es"));
    assert_eq!(i18n.catalog_len(), 0);
    assert_eq!(i18n.t("hello", None), "hello");
}

#[tokio::test]
async fn test_listeners_run_once_in_registration_order() {
    let i18n = I18n::new(en_es_options().with_loader(hello_catalogs()));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let subscriptions: Vec<_> = (1..=3)
        .map(|n| {
            let seen = Arc::clone(&seen);
            i18n.on_change(move |state| {
                seen.lock().unwrap().push((n, state.locale.to_string(), state.currency.to_string()));
            })
        })
        .collect();

    i18n.set_locale("es").await;
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (1, "es".to_string(), "USD".to_string()),
            (2, "es".to_string(), "USD".to_string()),
            (3, "es".to_string(), "USD".to_string()),
        ]
    );

    seen.lock().unwrap().clear();
    subscriptions[1].unsubscribe();
    subscriptions[1].unsubscribe();
    i18n.set_currency(currency("EUR"));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (1, "es".to_string(), "EUR".to_string()),
            (3, "es".to_string(), "EUR".to_string()),
        ]
    );
    assert_eq!(i18n.subscriber_count(), 2);
}

#[tokio::test]
async fn test_listener_sees_committed_state() {
    let i18n = Arc::new(I18n::new(en_es_options().with_loader(hello_catalogs())));
    let observed = Arc::new(Mutex::new(None));

    let weak = Arc::downgrade(&i18n);
    let slot = Arc::clone(&observed);
    let _subscription = i18n.on_change(move |_| {
        if let Some(i18n) = weak.upgrade() {
            *slot.lock().unwrap() = Some(i18n.t("hello", None));
        }
    });

    i18n.set_locale("es").await;
    assert_eq!(observed.lock().unwrap().as_deref(), Some("Hola"));
}

fn gated_manager(policy: LocaleSwitchPolicy) -> (Arc<I18n>, tokio::sync::oneshot::Sender<()>, tokio::sync::oneshot::Sender<()>) {
    let mut loader = GatedLoader::new();
    let release_es = loader.gate("es", messages([("hello", "Hola")]));
    let release_fr = loader.gate("fr", messages([("hello", "Bonjour")]));
    let options = I18nOptions::new(
        vec![locale("en"), locale("es"), locale("fr")],
        locale("en"),
        currency("USD"),
    )
    .with_loader(loader)
    .with_switch_policy(policy);
    (Arc::new(I18n::new(options)), release_es, release_fr)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn test_last_resolved_wins_applies_late_result() {
    let (i18n, release_es, release_fr) = gated_manager(LocaleSwitchPolicy::LastResolvedWins);
    let notifications = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notifications);
    let _sub = i18n.on_change(move |state| sink.lock().unwrap().push(state.locale.to_string()));

    let first = tokio::spawn({
        let i18n = Arc::clone(&i18n);
        async move { i18n.set_locale("es").await }
    });
    settle().await;
    assert_eq!(i18n.locale(), locale("en"));
    assert_eq!(i18n.t("hello", None), "hello");
    assert!(notifications.lock().unwrap().is_empty());
    let second = tokio::spawn({
        let i18n = Arc::clone(&i18n);
        async move { i18n.set_locale("fr").await }
    });
    settle().await;

    release_fr.send(()).unwrap();
    assert!(second.await.unwrap());
    assert_eq!(i18n.locale(), locale("fr"));

    release_es.send(()).unwrap();
    assert!(first.await.unwrap());
    assert_eq!(i18n.locale(), locale("es"));
    assert_eq!(i18n.t("hello", None), "Hola");
    assert_eq!(*notifications.lock().unwrap(), vec!["fr", "es"]);
}

#[tokio::test]
async fn test_last_called_wins_discards_stale_result() {
    let (i18n, release_es, release_fr) = gated_manager(LocaleSwitchPolicy::LastCalledWins);
    let notifications = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notifications);
    let _sub = i18n.on_change(move |state| sink.lock().unwrap().push(state.locale.to_string()));

    let first = tokio::spawn({
        let i18n = Arc::clone(&i18n);
        async move { i18n.set_locale("es").await }
    });
    settle().await;
    assert_eq!(i18n.locale(), locale("en"));
    assert_eq!(i18n.t("hello", None), "hello");
    assert!(notifications.lock().unwrap().is_empty());
    let second = tokio::spawn({
        let i18n = Arc::clone(&i18n);
        async move { i18n.set_locale("fr").await }
    });
    settle().await;

    release_fr.send(()).unwrap();
    assert!(second.await.unwrap());

    release_es.send(()).unwrap();
    assert!(!first.await.unwrap());

    assert_eq!(i18n.locale(), locale("fr"));
    assert_eq!(i18n.t("hello", None), "Bonjour");
    assert_eq!(*notifications.lock().unwrap(), vec!["fr"]);
}

#[tokio::test]
async fn test_manager_from_disk_catalogs() {
    let ctx = TestContext::new().unwrap();
    let i18n = ctx.i18n();
    let greeting = values([("name", "Ana")]);

    for (tag, expected, open) in [
        ("en", "Hello Ana", "Open"),
        ("es", "Hola Ana", "Abrir"),
        ("fr", "Bonjour Ana", "Ouvrir"),
    ] {
        i18n.set_locale(tag).await;
        assert_eq!(i18n.locale(), locale(tag));
        assert_eq!(i18n.t("greeting", Some(&greeting)), expected);
        assert_eq!(i18n.t("menu.open", None), open);
    }
}

#[tokio::test]
async fn test_provider_and_adapter() {
    let provider = I18nProvider::new();
    assert_matches!(provider.use_i18n(), Err(I18nError::MissingProvider(_)));

    let i18n = Arc::new(I18n::new(en_es_options().with_loader(hello_catalogs())));
    provider.provide(Arc::clone(&i18n));

    let adapter = provider.adapter().unwrap();
    let renders = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&renders);
    adapter.mount(move |_| *counter.lock().unwrap() += 1);

    i18n.set_locale("es").await;
    assert_eq!(*renders.lock().unwrap(), 1);
    assert_eq!(adapter.locale(), locale("es"));
    assert_eq!(adapter.t("hello", None), "Hola");
    assert_eq!(adapter.formatting_context().currency().as_str(), "USD");

    drop(adapter);
    assert_eq!(i18n.subscriber_count(), 0);
}
