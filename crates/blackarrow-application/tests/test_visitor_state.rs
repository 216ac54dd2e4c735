mod common;

use std::sync::Arc;

use blackarrow_application::GeoChain;
use blackarrow_core::intent::ServiceIntent;
use blackarrow_core::storage::{KeyValueStore, keys};
use blackarrow_core::theme::ThemeMode;
use blackarrow_infrastructure::{FileStore, MemoryStore};
use common::session;
use tempfile::TempDir;

#[test]
fn test_intent_reminder_and_service_bar() {
    let site = session(Arc::new(MemoryStore::new()), GeoChain::new());
    let intent = site.intent();

    let snapshot = intent.navigate("/services/landing-pages");
    assert_eq!(snapshot.last_visited_service, Some(ServiceIntent::LandingPage));

    let snapshot = intent.navigate("/contact");
    assert_eq!(snapshot.last_visited_service, Some(ServiceIntent::LandingPage));
    assert!(snapshot.should_show_reminder);
    assert!(!snapshot.should_show_service_bar);

    let snapshot = intent.navigate("/landing-page/pricing");
    assert!(snapshot.should_show_service_bar);
    assert!(!snapshot.should_show_reminder);
}

#[test]
fn test_intent_survives_reload_within_session() {
    let session_store = Arc::new(MemoryStore::new());
    let durable = Arc::new(MemoryStore::new());

    let build = || {
        blackarrow_application::SiteSession::builder()
            .with_durable_store(durable.clone())
            .with_session_store(session_store.clone())
            .with_geo_chain(GeoChain::new())
            .build()
            .unwrap()
    };

    build().intent().navigate("/business-website");
    let reloaded = build();
    assert_eq!(
        reloaded.intent().last_visited_service(),
        Some(ServiceIntent::BusinessWebsite)
    );

    // New browser session
    session_store.clear();
    assert_eq!(build().intent().last_visited_service(), None);
}

#[test]
fn test_theme_ignores_system_dark_without_preference() {
    let durable = Arc::new(MemoryStore::new());
    let site = blackarrow_application::SiteSession::builder()
        .with_durable_store(durable.clone())
        .with_geo_chain(GeoChain::new())
        .with_system_theme(ThemeMode::Dark)
        .build()
        .unwrap();

    assert_eq!(site.theme().current(), ThemeMode::Light);
    assert_eq!(site.theme().system_preference(), ThemeMode::Dark);
    assert_eq!(durable.get_or_absent(keys::THEME), None);
}

#[test]
fn test_explicit_theme_ignores_system_changes() {
    let temp_dir = TempDir::new().unwrap();
    let durable = Arc::new(FileStore::new(temp_dir.path().join("storage.toml")));
    let site = session(durable.clone(), GeoChain::new());

    site.theme().set_theme(ThemeMode::Dark);
    assert!(!site.theme().on_system_preference_changed(ThemeMode::Light));
    assert_eq!(site.theme().current(), ThemeMode::Dark);
    assert_eq!(durable.get(keys::THEME).unwrap(), Some("dark".to_string()));

    let reloaded = session(durable, GeoChain::new());
    assert_eq!(reloaded.theme().current(), ThemeMode::Dark);
}

#[test]
fn test_cookie_decision_shared_across_sessions() {
    let durable = Arc::new(MemoryStore::new());
    let site = session(durable.clone(), GeoChain::new());
    assert!(site.consent().prompt());
    site.consent().save(true, false).unwrap();

    let reloaded = session(durable, GeoChain::new());
    assert!(!reloaded.consent().needs_prompt());
    assert!(reloaded.consent().analytics_allowed());
    assert!(!reloaded.consent().prompt());
}
