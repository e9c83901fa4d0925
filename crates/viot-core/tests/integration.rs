//! Integration tests for viot-core
//!
//! These drive the public API the way a dashboard consumer would: through a
//! session, its stores and the event channel.
//!
//! Run with: `cargo test --package viot-core --test integration`

use std::time::Duration;

use time::OffsetDateTime;
use viot_core::{
    DeviceFactory, DeviceQuery, DeviceSimConfig, DeviceStatus, DeviceStore, DeviceType,
    DeviceUpdate, Error, EventDispatcher, FleetEvent, FleetSummary, NotificationQuery,
    NotificationTab, Session, SimulationConfig, TickProbabilities, ToastLevel, sim_rng,
};
use viot_types::{HISTORY_LEN, MIN_BATTERY};

fn config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        seed: Some(seed),
        ..Default::default()
    }
}

fn detached(seed: u64) -> Session {
    Session::detached(&config(seed), EventDispatcher::default()).unwrap()
}

#[tokio::test]
async fn test_seeded_session_has_twelve_devices() {
    let session = detached(1);
    let devices = session.devices().devices().await;

    assert_eq!(devices.len(), 12);
    for device in &devices {
        assert!(DeviceType::ALL.contains(&device.device_type));
        assert_eq!(device.history.len(), HISTORY_LEN);
        let range = device.device_type.reading_range();
        assert!(range.contains(device.last_reading));
    }
    assert!(session.devices().init_error().await.is_none());
}

#[tokio::test]
async fn test_add_patio_light() {
    let session = detached(2);
    let store = session.devices();

    let device = store
        .add_device("Patio Light", DeviceType::Light, "Patio")
        .await
        .unwrap();

    assert_eq!(store.len().await, 13);
    assert_eq!(device.status, DeviceStatus::Online);
    assert_eq!(device.battery_level, 100);
    assert_eq!(device.reward_points, 0);
    assert!((0..=1000).contains(&device.last_reading));
    assert_eq!(store.device(&device.id).await, Some(device));
}

#[tokio::test]
async fn test_hundred_ticks_keep_invariants() {
    let session = detached(3);
    let store = session.devices();
    let before = store.devices().await;

    for _ in 0..100 {
        store.tick().await;
    }

    let after = store.devices().await;
    assert_eq!(after.len(), before.len());
    for (old, new) in before.iter().zip(&after) {
        assert_eq!(old.id, new.id);
        assert!(new.battery_level >= MIN_BATTERY);
        assert!(new.battery_level <= old.battery_level);
        assert!(new.reward_points >= old.reward_points);
        assert_eq!(new.history.len(), HISTORY_LEN);
        assert_eq!(new.last_reading, new.history[HISTORY_LEN - 1].value);
        let range = new.device_type.reading_range();
        assert!(new.history.iter().all(|p| range.contains(p.value)));
        assert!(new.history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
    assert_eq!(store.tick_count().await, 100);
}

#[tokio::test]
async fn test_single_device_invariants_hold_every_tick() {
    let config = DeviceSimConfig {
        probabilities: TickProbabilities {
            battery_decay: 1.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut rng = sim_rng(Some(21));
    let mut device = DeviceFactory::new(&config).new_device(
        &mut rng,
        "1",
        "Kitchen Thermometer",
        DeviceType::Temperature,
        "Kitchen",
        OffsetDateTime::now_utc(),
    );
    device.battery_level = 2;
    let store = DeviceStore::with_devices(vec![device], &config, rng, EventDispatcher::default());

    let mut rewards = 0;
    for step in 1..=100 {
        store.tick().await;
        let device = store.device("1").await.unwrap();

        assert!(device.battery_level >= MIN_BATTERY, "battery at step {}", step);
        assert_eq!(device.history.len(), HISTORY_LEN, "history at step {}", step);
        assert_eq!(device.last_reading, device.history[HISTORY_LEN - 1].value);
        assert!((18..=30).contains(&device.last_reading));
        assert!(device.reward_points >= rewards);
        rewards = device.reward_points;
    }

    let device = store.device("1").await.unwrap();
    assert_eq!(device.battery_level, MIN_BATTERY);
    assert_eq!(store.tick_count().await, 100);
}

#[tokio::test]
async fn test_reward_increments_are_multiples_of_five() {
    let session = detached(4);
    let store = session.devices();
    let before = store.devices().await;

    for _ in 0..20 {
        store.tick().await;
    }

    for (old, new) in before.iter().zip(store.devices().await) {
        assert_eq!((new.reward_points - old.reward_points) % 5, 0);
    }
}

#[tokio::test]
async fn test_remove_selected_device() {
    let session = detached(5);
    let store = session.devices();
    let mut rx = session.subscribe();

    store.set_selected_device(Some("3")).await.unwrap();
    store.remove_device("3").await.unwrap();

    assert!(store.device("3").await.is_none());
    assert!(store.selected_device().await.is_none());
    assert_eq!(store.len().await, 11);

    let mut saw_clear = false;
    let mut saw_removed = false;
    let mut saw_toast = false;
    while let Ok(event) = rx.try_recv() {
        match event {
            FleetEvent::SelectionChanged { device_id: None } => saw_clear = true,
            FleetEvent::DeviceRemoved { device } => {
                assert_eq!(device.id, "3");
                saw_removed = true;
            }
            FleetEvent::Toast(toast) if toast.title == "Device Removed" => {
                assert_eq!(toast.level, ToastLevel::Success);
                saw_toast = true;
            }
            _ => {}
        }
    }
    assert!(saw_clear && saw_removed && saw_toast);
}

#[tokio::test]
async fn test_selected_device_follows_status_edits() {
    let session = detached(6);
    let store = session.devices();
    store.set_selected_device(Some("1")).await.unwrap();

    store
        .update_device("1", &DeviceUpdate::new().status(DeviceStatus::Maintenance))
        .await
        .unwrap();
    assert_eq!(
        store.selected_device().await.map(|d| d.status),
        Some(DeviceStatus::Maintenance)
    );

    store
        .update_device("1", &DeviceUpdate::new().status(DeviceStatus::Online))
        .await
        .unwrap();
    assert_eq!(
        store.selected_device().await.map(|d| d.status),
        Some(DeviceStatus::Online)
    );
}

#[tokio::test]
async fn test_update_preserves_telemetry() {
    let session = detached(7);
    let store = session.devices();
    let before = store.device("2").await.unwrap();

    let after = store
        .update_device(
            "2",
            &DeviceUpdate::new()
                .name("Renamed")
                .location("Attic")
                .firmware_version("v3.0.0"),
        )
        .await
        .unwrap();

    assert_eq!(after.name, "Renamed");
    assert_eq!(after.location, "Attic");
    assert_eq!(after.firmware_version, "v3.0.0");
    assert_eq!(after.history, before.history);
    assert_eq!(after.battery_level, before.battery_level);
    assert_eq!(after.reward_points, before.reward_points);
    assert_eq!(after.device_type, before.device_type);
}

#[tokio::test]
async fn test_unknown_ids_are_errors() {
    let session = detached(8);
    assert_eq!(
        session.devices().remove_device("404").await.unwrap_err(),
        Error::DeviceNotFound("404".to_string())
    );
    assert_eq!(
        session.notifications().mark_as_read("404").await.unwrap_err(),
        Error::NotificationNotFound("404".to_string())
    );
}

#[tokio::test]
async fn test_unread_count_after_mark_all() {
    let session = detached(9);
    let feed = session.notifications();

    assert_eq!(feed.unread_count().await, 3);
    feed.mark_as_read("2").await.unwrap();
    assert_eq!(feed.unread_count().await, 2);
    feed.mark_all_as_read().await;
    assert_eq!(feed.unread_count().await, 0);

    let unread = NotificationQuery::new()
        .tab(NotificationTab::Unread)
        .apply(&feed.notifications().await)
        .len();
    assert_eq!(unread, 0);
}

#[tokio::test]
async fn test_bulk_delete_reports_requested_count() {
    let session = detached(10);
    let mut rx = session.subscribe();
    let removed = session
        .notifications()
        .delete_selected_notifications(&["1", "3", "gone"])
        .await;

    assert_eq!(removed, 2);
    let toast = std::iter::from_fn(|| rx.try_recv().ok()).find_map(|event| match event {
        FleetEvent::Toast(toast) => Some(toast),
        _ => None,
    });
    assert_eq!(toast.unwrap().title, "3 notifications deleted");
}

#[tokio::test]
async fn test_summary_matches_query_counts() {
    let session = detached(11);
    let store = session.devices();
    for _ in 0..10 {
        store.tick().await;
    }
    let devices = store.devices().await;
    let summary = FleetSummary::from_devices(&devices);

    for status in DeviceStatus::ALL {
        let count = DeviceQuery::new().status(status).apply(&devices).len();
        let expected = match status {
            DeviceStatus::Online => summary.online,
            DeviceStatus::Offline => summary.offline,
            DeviceStatus::Warning => summary.warning,
            DeviceStatus::Maintenance => summary.maintenance,
        };
        assert_eq!(count, expected);
    }
    assert_eq!(summary.total, 12);
    assert_eq!(summary.devices_with_issues, summary.offline + summary.warning);
}

#[tokio::test(start_paused = true)]
async fn test_session_ticks_in_background() {
    let session = Session::start(&config(12)).unwrap();
    let mut rx = session.subscribe();

    tokio::time::sleep(Duration::from_secs(26)).await;
    assert_eq!(session.devices().tick_count().await, 5);

    let ticks: Vec<u64> = std::iter::from_fn(|| rx.try_recv().ok())
        .filter_map(|event| match event {
            FleetEvent::DevicesTicked { tick, .. } => Some(tick),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, [1, 2, 3, 4, 5]);

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_edits_interleave_with_ticks() {
    let session = Session::start(&config(13)).unwrap();
    let store = session.devices().clone();

    tokio::time::sleep(Duration::from_millis(5500)).await;
    let added = store
        .add_device("Front Door", DeviceType::Security, "Hallway")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    let device = store.device(&added.id).await.unwrap();
    assert_eq!(device.history.len(), HISTORY_LEN);
    assert_ne!(device.history, added.history);
    assert_eq!(store.len().await, 13);

    session.shutdown().await;
}
