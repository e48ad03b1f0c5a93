//! Lifecycle integration tests

mod common;

use bigip_inventory::errors::ErrorKind;
use bigip_inventory::lifecycle::manager::{OnboardRequest, UpdateRequest};
use bigip_inventory::models::device::Credentials;

use common::{app, onboard_request};

#[tokio::test]
async fn onboard_without_id_creates_group() {
    let (state, _store) = app();

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();

    assert!(device.admin_state_up);
    assert!(device.last_refreshed_at.is_none());

    let groups = state.facade.list().await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, device.group_id);
    assert_eq!(groups[0].devices.len(), 1);
}

#[tokio::test]
async fn onboard_inherits_group_zone() {
    let (state, _store) = app();

    let first = state
        .manager
        .onboard(OnboardRequest {
            availability_zone: Some("zone-a".to_string()),
            ..onboard_request(None, "10.1.1.1")
        })
        .await
        .unwrap();
    assert_eq!(first.availability_zone.as_deref(), Some("zone-a"));

    let second = state
        .manager
        .onboard(onboard_request(Some(&first.group_id), "10.1.1.2"))
        .await
        .unwrap();
    assert_eq!(second.availability_zone.as_deref(), Some("zone-a"));
}

#[tokio::test]
async fn onboard_duplicate_hostname_conflicts_across_groups() {
    let (state, _store) = app();

    state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();

    // Same hostname into a brand new group must still conflict
    let err = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // And the failed onboard must not have created a second group
    assert_eq!(state.facade.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn onboard_into_unknown_group_is_not_found() {
    let (state, _store) = app();

    let err = state
        .manager
        .onboard(onboard_request(Some("no-such-group"), "10.1.1.1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn removing_last_device_auto_deletes_group() {
    let (state, _store) = app();

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();
    let group_id = device.group_id;

    let removed = state
        .manager
        .remove(&group_id, Some("10.1.1.1"))
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let err = state.facade.show(&group_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn removing_one_of_two_devices_keeps_group() {
    let (state, _store) = app();

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();
    let group_id = device.group_id;
    state
        .manager
        .onboard(onboard_request(Some(&group_id), "10.1.1.2"))
        .await
        .unwrap();

    state
        .manager
        .remove(&group_id, Some("10.1.1.1"))
        .await
        .unwrap();

    let group = state.facade.show(&group_id).await.unwrap();
    assert_eq!(group.devices.len(), 1);
    assert_eq!(group.devices[0].icontrol_hostname, "10.1.1.2");
}

#[tokio::test]
async fn delete_group_cascades_to_all_devices() {
    let (state, _store) = app();

    // Scenario: onboard into a fresh group, add a second device by id,
    // then delete the whole group
    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();
    let group_id = device.group_id;
    state
        .manager
        .onboard(onboard_request(Some(&group_id), "10.1.1.2"))
        .await
        .unwrap();
    assert_eq!(state.facade.list().await.unwrap().len(), 1);
    assert_eq!(
        state.facade.show(&group_id).await.unwrap().devices.len(),
        2
    );

    let removed = state.manager.remove(&group_id, None).await.unwrap();
    assert_eq!(removed, 2);

    let err = state.facade.show(&group_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(state.facade.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_unknown_group_is_not_found() {
    let (state, _store) = app();

    let err = state.manager.remove("no-such-group", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn remove_unknown_device_is_not_found() {
    let (state, _store) = app();

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();

    let err = state
        .manager
        .remove(&device.group_id, Some("10.9.9.9"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn update_with_no_mutation_is_invalid_and_leaves_state_unchanged() {
    let (state, _store) = app();

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();
    let before = state.facade.show(&device.group_id).await.unwrap();

    let err = state
        .manager
        .update(&device.group_id, UpdateRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let after = state.facade.show(&device.group_id).await.unwrap();
    assert_eq!(after.availability_zone, before.availability_zone);
    assert_eq!(after.devices[0].admin_state_up, before.devices[0].admin_state_up);
}

#[tokio::test]
async fn admin_state_down_applies_to_whole_group_only() {
    let (state, _store) = app();

    let first = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();
    state
        .manager
        .onboard(onboard_request(Some(&first.group_id), "10.1.1.2"))
        .await
        .unwrap();
    let other = state
        .manager
        .onboard(onboard_request(None, "10.2.2.2"))
        .await
        .unwrap();

    let outcome = state
        .manager
        .update(
            &first.group_id,
            UpdateRequest {
                admin_state: Some(false),
                availability_zone: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.devices_updated, 2);

    let group = state.facade.show(&first.group_id).await.unwrap();
    assert!(group.devices.iter().all(|d| !d.admin_state_up));

    // Devices in other groups stay untouched
    let untouched = state.facade.show(&other.group_id).await.unwrap();
    assert!(untouched.devices[0].admin_state_up);
}

#[tokio::test]
async fn admin_state_up_restores_devices() {
    let (state, _store) = app();

    let device = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();

    for up in [false, true] {
        state
            .manager
            .update(
                &device.group_id,
                UpdateRequest {
                    admin_state: Some(up),
                    availability_zone: None,
                },
            )
            .await
            .unwrap();
        let group = state.facade.show(&device.group_id).await.unwrap();
        assert_eq!(group.devices[0].admin_state_up, up);
    }
}

#[tokio::test]
async fn zone_update_does_not_touch_existing_devices() {
    let (state, _store) = app();

    let device = state
        .manager
        .onboard(OnboardRequest {
            availability_zone: Some("zone-a".to_string()),
            icontrol_hostname: "10.1.1.1".to_string(),
            group_id: None,
            credentials: Credentials::new("admin", "secret"),
            icontrol_port: 443,
        })
        .await
        .unwrap();

    let outcome = state
        .manager
        .update(
            &device.group_id,
            UpdateRequest {
                admin_state: None,
                availability_zone: Some("zone-b".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.group.availability_zone.as_deref(), Some("zone-b"));
    assert_eq!(outcome.devices_updated, 0);

    // Group default changed, the already-registered device keeps its zone
    let group = state.facade.show(&device.group_id).await.unwrap();
    assert_eq!(group.availability_zone.as_deref(), Some("zone-b"));
    assert_eq!(group.devices[0].availability_zone.as_deref(), Some("zone-a"));

    // But it becomes the default for new members
    let second = state
        .manager
        .onboard(onboard_request(Some(&device.group_id), "10.1.1.2"))
        .await
        .unwrap();
    assert_eq!(second.availability_zone.as_deref(), Some("zone-b"));
}

#[tokio::test]
async fn update_unknown_group_is_not_found() {
    let (state, _store) = app();

    let err = state
        .manager
        .update(
            "no-such-group",
            UpdateRequest {
                admin_state: Some(false),
                availability_zone: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn list_order_is_stable() {
    let (state, _store) = app();

    let first = state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();
    state
        .manager
        .onboard(onboard_request(Some(&first.group_id), "10.1.1.2"))
        .await
        .unwrap();
    state
        .manager
        .onboard(onboard_request(None, "10.2.2.2"))
        .await
        .unwrap();

    let once = state.facade.list().await.unwrap();
    let twice = state.facade.list().await.unwrap();

    let ids = |views: &[bigip_inventory::query::facade::GroupView]| {
        views
            .iter()
            .map(|g| {
                (
                    g.id.clone(),
                    g.devices
                        .iter()
                        .map(|d| d.icontrol_hostname.clone())
                        .collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&once), ids(&twice));
    assert_eq!(once[0].id, first.group_id);
    assert_eq!(
        ids(&once)[0].1,
        vec!["10.1.1.1".to_string(), "10.1.1.2".to_string()]
    );
}

#[tokio::test]
async fn views_never_expose_credentials() {
    let (state, _store) = app();

    state
        .manager
        .onboard(onboard_request(None, "10.1.1.1"))
        .await
        .unwrap();

    let listed = state.facade.list().await.unwrap();
    let serialized = serde_json::to_string(&listed).unwrap();
    assert!(!serialized.contains("secret"));
    assert!(!serialized.contains("icontrol_password"));
}
