mod common;

use std::sync::Arc;
use std::time::Duration;

use blackarrow_application::ClientEnvironment;
use blackarrow_core::region::{Region, RegionSelection};
use blackarrow_core::storage::{KeyValueStore, keys};
use blackarrow_infrastructure::{FileStore, MemoryStore};
use common::{ScriptedGeo, chain, session};
use tempfile::TempDir;

const APEX: &str = "blackarrowtechnologies.com";

#[tokio::test]
async fn test_subdomain_wins_over_stored_and_geolocation() {
    for stored in [None, Some("UK"), Some("IND")] {
        for country in ["GB", "IN", "AE"] {
            let durable = Arc::new(match stored {
                Some(code) => MemoryStore::with_entries([(keys::REGION, code)]),
                None => MemoryStore::new(),
            });
            let geo = ScriptedGeo::country("geo", country);
            let site = session(durable, chain(&[geo.clone()]));

            let selection = site
                .region()
                .resolve(&ClientEnvironment::new("uae.blackarrowtechnologies.com", "Asia/Kolkata"))
                .await;

            assert_eq!(selection, RegionSelection::explicit(Region::Uae));
            assert_eq!(geo.calls(), 0);
        }
    }
}

#[tokio::test]
async fn test_geolocated_region_is_persisted_and_reused() {
    let temp_dir = TempDir::new().unwrap();
    let storage_path = temp_dir.path().join("storage.toml");
    let env = ClientEnvironment::new(APEX, "Europe/London");

    let geo = ScriptedGeo::country("ipapi", "AE");
    let first = session(Arc::new(FileStore::new(storage_path.clone())), chain(&[geo.clone()]));
    let handle = first.start(env.clone()).expect("geolocation should run in background");
    handle.await.unwrap();

    assert_eq!(first.region().current(), RegionSelection::auto_detected(Region::Uae));
    assert_eq!(geo.calls(), 1);

    // Same visitor, next page load
    let durable = Arc::new(FileStore::new(storage_path));
    assert_eq!(durable.get(keys::REGION).unwrap(), Some("UAE".to_string()));

    let second = session(durable, chain(&[geo.clone()]));
    assert!(second.start(env).is_none());
    assert_eq!(second.region().current().code, Region::Uae);
    assert_eq!(geo.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timezone_fallback_after_both_providers_fail() {
    let primary = ScriptedGeo::stalled("ipapi", Duration::from_secs(30));
    let fallback = ScriptedGeo::failing("ipwho");
    let durable = Arc::new(MemoryStore::new());
    let site = session(durable.clone(), chain(&[primary.clone(), fallback.clone()]));

    let selection = site
        .region()
        .resolve(&ClientEnvironment::new(APEX, "Asia/Kolkata"))
        .await;

    assert_eq!(selection, RegionSelection::auto_detected(Region::Ind));
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);
    assert_eq!(durable.get_or_absent(keys::REGION), Some("IND".to_string()));
}

#[tokio::test]
async fn test_explicit_selection_overrides_auto_detection() {
    let durable = Arc::new(MemoryStore::new());
    let site = session(durable.clone(), chain(&[ScriptedGeo::country("geo", "AE")]));

    site.region()
        .resolve(&ClientEnvironment::new(APEX, "Asia/Dubai"))
        .await;
    assert!(site.region().current().is_auto_detected);

    site.region().set_region(Region::Uk);
    assert_eq!(site.region().current(), RegionSelection::explicit(Region::Uk));
    assert_eq!(durable.get_or_absent(keys::REGION), Some("UK".to_string()));
}

#[tokio::test]
async fn test_malformed_stored_region_is_ignored() {
    let durable = Arc::new(MemoryStore::with_entries([(keys::REGION, "Great Britain")]));
    let site = session(durable, chain(&[ScriptedGeo::country("geo", "IN")]));

    let selection = site
        .region()
        .resolve(&ClientEnvironment::new(APEX, "Europe/London"))
        .await;
    assert_eq!(selection, RegionSelection::auto_detected(Region::Ind));
}

#[tokio::test(start_paused = true)]
async fn test_late_result_after_shutdown_is_discarded() {
    let durable = Arc::new(MemoryStore::new());
    let slow = ScriptedGeo::stalled("slow", Duration::from_secs(2));
    let site = session(durable.clone(), chain(&[slow]));

    let handle = site.start(ClientEnvironment::new(APEX, "Asia/Kolkata")).unwrap();
    site.shutdown();
    handle.await.unwrap();

    assert_eq!(site.region().current(), RegionSelection::explicit(Region::Uk));
    assert_eq!(durable.get_or_absent(keys::REGION), None);
}
