//! Reconciliation integration tests

mod common;

use std::sync::Arc;
use std::time::Duration;

use bigip_inventory::errors::ErrorKind;
use bigip_inventory::lifecycle::manager::UpdateRequest;
use bigip_inventory::store::InventoryStore;

use common::{
    app_with_query, app_with_query_and_timeout, onboard_request, status_snapshot, FailQuery,
    HangQuery, OkQuery,
};

#[tokio::test]
async fn refresh_replaces_attributes_and_stamps_timestamp() {
    let (state, _store) = app_with_query(Arc::new(OkQuery {
        attributes: status_snapshot("16.1.3"),
    }));

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();
    assert!(device.last_refreshed_at.is_none());
    assert!(device.status_attributes.is_empty());

    let refreshed = state
        .engine
        .refresh(&device.group_id, "10.1.1.1")
        .await
        .unwrap();
    assert_eq!(refreshed.status_attributes, status_snapshot("16.1.3"));
    let first_stamp = refreshed.last_refreshed_at.unwrap();

    // Refreshing again with the same upstream snapshot is idempotent on the
    // attributes and moves the timestamp forward
    let again = state
        .engine
        .refresh(&device.group_id, "10.1.1.1")
        .await
        .unwrap();
    assert_eq!(again.status_attributes, status_snapshot("16.1.3"));
    assert!(again.last_refreshed_at.unwrap() >= first_stamp);
}

#[tokio::test]
async fn refresh_replaces_stale_attributes_wholesale() {
    let (state, store) = app_with_query(Arc::new(OkQuery {
        attributes: status_snapshot("16.1.3"),
    }));

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();

    // Seed an older snapshot with an extra key that the new probe no longer
    // reports
    let mut stale = status_snapshot("15.1.0");
    stale.insert("obsoleteKey".to_string(), "gone".into());
    store
        .record_refresh(&device.group_id, "10.1.1.1", stale, chrono::Utc::now())
        .await
        .unwrap();

    let refreshed = state
        .engine
        .refresh(&device.group_id, "10.1.1.1")
        .await
        .unwrap();
    assert_eq!(refreshed.status_attributes, status_snapshot("16.1.3"));
    assert!(!refreshed.status_attributes.contains_key("obsoleteKey"));
}

#[tokio::test]
async fn failed_refresh_preserves_known_good_state() {
    let (state, store) = app_with_query(Arc::new(FailQuery {
        auth_failure: false,
    }));

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();
    store
        .record_refresh(
            &device.group_id,
            "10.1.1.1",
            status_snapshot("15.1.0"),
            chrono::Utc::now(),
        )
        .await
        .unwrap();
    let before = state
        .facade
        .show(&device.group_id)
        .await
        .unwrap()
        .devices
        .remove(0);

    let err = state
        .engine
        .refresh(&device.group_id, "10.1.1.1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);

    let after = state
        .facade
        .show(&device.group_id)
        .await
        .unwrap()
        .devices
        .remove(0);
    assert_eq!(after.status_attributes, before.status_attributes);
    assert_eq!(after.last_refreshed_at, before.last_refreshed_at);
}

#[tokio::test]
async fn auth_failure_surfaces_as_upstream_unavailable() {
    let (state, _store) = app_with_query(Arc::new(FailQuery { auth_failure: true }));

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();

    let err = state
        .engine
        .refresh(&device.group_id, "10.1.1.1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
}

#[tokio::test]
async fn timed_out_probe_is_treated_as_upstream_failure() {
    let (state, _store) =
        app_with_query_and_timeout(Arc::new(HangQuery), Duration::from_millis(50));

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();

    let err = state
        .engine
        .refresh(&device.group_id, "10.1.1.1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);

    // And the record is left untouched
    let after = state.facade.show(&device.group_id).await.unwrap();
    assert!(after.devices[0].last_refreshed_at.is_none());
}

#[tokio::test]
async fn refresh_unknown_group_or_device_is_not_found() {
    let (state, _store) = app_with_query(Arc::new(OkQuery {
        attributes: status_snapshot("16.1.3"),
    }));

    let err = state.engine.refresh("no-such-group", "10.1.1.1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();
    let err = state
        .engine
        .refresh(&device.group_id, "10.9.9.9")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn refresh_never_mutates_admin_state() {
    let (state, _store) = app_with_query(Arc::new(OkQuery {
        attributes: status_snapshot("16.1.3"),
    }));

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();
    state
        .manager
        .update(
            &device.group_id,
            UpdateRequest {
                admin_state: Some(false),
                availability_zone: None,
            },
        )
        .await
        .unwrap();

    let refreshed = state
        .engine
        .refresh(&device.group_id, "10.1.1.1")
        .await
        .unwrap();
    assert!(!refreshed.admin_state_up);
}
