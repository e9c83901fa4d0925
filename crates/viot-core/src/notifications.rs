//! The notification store.
//!
//! [`NotificationStore`] holds the notification feed, newest first. It starts
//! from a fixed set of samples and periodically synthesizes new activity.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use rand::seq::IndexedRandom;
use time::{Duration as TimeDuration, OffsetDateTime};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Builder;

use viot_types::{Notification, NotificationSource, NotificationType};

use crate::config::{NotificationProbabilities, NotificationSimConfig};
use crate::error::{Error, Result};
use crate::events::{EventDispatcher, FleetEvent, Toast};
use crate::generator::{SimRng, chance};
use crate::traits::Simulated;

/// Categories assigned to synthesized notifications.
pub const ACTIVITY_CATEGORIES: [&str; 5] =
    ["connectivity", "battery", "updates", "alerts", "security"];

/// Title of every synthesized notification.
pub const ACTIVITY_TITLE: &str = "New Activity Detected";

struct NotificationState {
    notifications: Vec<Notification>,
    checks: u64,
    rng: SimRng,
}

/// In-memory owner of the notification feed.
pub struct NotificationStore {
    state: RwLock<NotificationState>,
    probabilities: NotificationProbabilities,
    check_interval: Duration,
    events: EventDispatcher,
}

impl std::fmt::Debug for NotificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationStore")
            .field("check_interval", &self.check_interval)
            .field("probabilities", &self.probabilities)
            .finish_non_exhaustive()
    }
}

impl NotificationStore {
    /// Create a store, starting from the samples when configured to.
    pub fn new(config: &NotificationSimConfig, rng: SimRng, events: EventDispatcher) -> Self {
        let notifications = if config.seed_samples {
            sample_notifications(OffsetDateTime::now_utc())
        } else {
            Vec::new()
        };
        Self::with_notifications(notifications, config, rng, events)
    }

    /// Create a store holding `notifications`, newest first.
    pub fn with_notifications(
        notifications: Vec<Notification>,
        config: &NotificationSimConfig,
        rng: SimRng,
        events: EventDispatcher,
    ) -> Self {
        Self {
            state: RwLock::new(NotificationState {
                notifications,
                checks: 0,
                rng,
            }),
            probabilities: config.probabilities.clone(),
            check_interval: config.check_interval(),
            events,
        }
    }

    /// Get the event dispatcher.
    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// Interval between synthesis checks when driven by a session.
    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    /// Snapshot of the feed, newest first.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.state.read().await.notifications.clone()
    }

    /// Snapshot of one notification.
    pub async fn notification(&self, id: &str) -> Option<Notification> {
        self.state
            .read()
            .await
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned()
    }

    /// Number of notifications.
    pub async fn len(&self) -> usize {
        self.state.read().await.notifications.len()
    }

    /// Whether the feed is empty.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.notifications.is_empty()
    }

    /// Number of unread notifications.
    pub async fn unread_count(&self) -> usize {
        self.state
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    /// Number of synthesis checks run so far.
    pub async fn check_count(&self) -> u64 {
        self.state.read().await.checks
    }

    /// Mark one notification as read. Marking twice is a no-op.
    pub async fn mark_as_read(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let Some(notification) = state.notifications.iter_mut().find(|n| n.id == id) else {
            warn!("Cannot mark unknown notification {} as read", id);
            return Err(Error::notification_not_found(id));
        };
        let changed = !notification.read;
        notification.read = true;
        drop(state);

        if changed {
            self.events.send(FleetEvent::NotificationsRead {
                ids: vec![id.to_string()],
            });
        }
        Ok(())
    }

    /// Mark every notification as read and return how many changed.
    pub async fn mark_all_as_read(&self) -> usize {
        let mut state = self.state.write().await;
        let ids: Vec<String> = state
            .notifications
            .iter_mut()
            .filter(|n| !n.read)
            .map(|n| {
                n.read = true;
                n.id.clone()
            })
            .collect();
        drop(state);

        debug!("Marked {} notifications as read", ids.len());
        let count = ids.len();
        if count > 0 {
            self.events.send(FleetEvent::NotificationsRead { ids });
        }
        self.events
            .toast(Toast::success("All notifications marked as read", None));
        count
    }

    /// Delete one notification.
    pub async fn delete_notification(&self, id: &str) -> Result<Notification> {
        let mut state = self.state.write().await;
        let Some(index) = state.notifications.iter().position(|n| n.id == id) else {
            warn!("Cannot delete unknown notification {}", id);
            return Err(Error::notification_not_found(id));
        };
        let removed = state.notifications.remove(index);
        drop(state);

        self.events.send(FleetEvent::NotificationsDeleted {
            ids: vec![removed.id.clone()],
        });
        self.events.toast(Toast::success("Notification deleted", None));
        Ok(removed)
    }

    /// Delete every notification whose id is in `ids`.
    ///
    /// Unknown ids are skipped. Returns the number actually removed; the toast
    /// reports the number requested.
    pub async fn delete_selected_notifications<S: AsRef<str>>(&self, ids: &[S]) -> usize {
        let mut state = self.state.write().await;
        let mut removed = Vec::new();
        state.notifications.retain(|n| {
            let selected = ids.iter().any(|id| id.as_ref() == n.id);
            if selected {
                removed.push(n.id.clone());
            }
            !selected
        });
        drop(state);

        let count = removed.len();
        if count < ids.len() {
            debug!(
                "Deleted {} of {} selected notifications",
                count,
                ids.len()
            );
        }
        if count > 0 {
            self.events
                .send(FleetEvent::NotificationsDeleted { ids: removed });
        }
        self.events.toast(Toast::success(
            format!("{} notifications deleted", ids.len()),
            None,
        ));
        count
    }

    /// Run one synthesis check, returning the notification created, if any.
    pub async fn tick(&self) -> Option<Notification> {
        let now = OffsetDateTime::now_utc();
        let mut state = self.state.write().await;
        state.checks += 1;
        let notification = synthesize(&mut state.rng, &self.probabilities, now)?;
        state.notifications.insert(0, notification.clone());
        drop(state);

        info!(
            "New {} notification {} ({})",
            notification.notification_type, notification.id, notification.category
        );
        self.events.send(FleetEvent::NotificationCreated {
            notification: notification.clone(),
        });
        self.events.toast(Toast::info(
            notification.title.clone(),
            Some(notification.message.clone()),
        ));
        Some(notification)
    }
}

#[async_trait]
impl Simulated for NotificationStore {
    fn name(&self) -> &'static str {
        "notifications"
    }

    fn period(&self) -> Duration {
        self.check_interval
    }

    async fn tick(&self) {
        NotificationStore::tick(self).await;
    }
}

/// Maybe build a "new activity" notification timestamped `now`.
pub fn synthesize<R: Rng + ?Sized>(
    rng: &mut R,
    probabilities: &NotificationProbabilities,
    now: OffsetDateTime,
) -> Option<Notification> {
    if !chance(rng, probabilities.creation) {
        return None;
    }

    let notification_type = if chance(rng, probabilities.warning_share) {
        NotificationType::Warning
    } else {
        NotificationType::Info
    };
    let source = if chance(rng, probabilities.device_source) {
        NotificationSource::Device
    } else {
        NotificationSource::System
    };
    let category = ACTIVITY_CATEGORIES.choose(rng).copied().unwrap_or("alerts");
    let id = Builder::from_random_bytes(rng.random()).into_uuid();

    Some(Notification {
        id: format!("new-{}", id),
        title: ACTIVITY_TITLE.to_string(),
        message: format!(
            "New activity detected at {:02}:{:02}:{:02}",
            now.hour(),
            now.minute(),
            now.second()
        ),
        timestamp: now,
        notification_type,
        read: false,
        source,
        category: category.to_string(),
    })
}

/// The ten notifications the feed starts with, relative to `now`.
///
/// Only ids `1`, `2` and `4` are unread.
pub fn sample_notifications(now: OffsetDateTime) -> Vec<Notification> {
    use NotificationSource::{Device, System};
    use NotificationType::{Error as Failure, Info, Success, Warning};

    let samples: [(&str, &str, TimeDuration, NotificationType, bool, NotificationSource, &str); 10] = [
        (
            "Device Offline",
            "Temperature Sensor in Kitchen has gone offline. Please check the device.",
            TimeDuration::minutes(5),
            Failure,
            false,
            Device,
            "connectivity",
        ),
        (
            "Battery Low",
            "Motion Sensor in Garage has low battery (15%). Consider replacing the batteries soon.",
            TimeDuration::hours(1),
            Warning,
            false,
            Device,
            "battery",
        ),
        (
            "System Update Available",
            "A new system update (v2.1.4) is available for your IoT network. This update includes security improvements and bug fixes.",
            TimeDuration::hours(3),
            Info,
            true,
            System,
            "updates",
        ),
        (
            "Temperature Alert",
            "Unusual temperature detected in Living Room (29°C). This is above your set threshold of 26°C.",
            TimeDuration::hours(12),
            Warning,
            false,
            Device,
            "alerts",
        ),
        (
            "New Device Added",
            "Humidity Sensor has been successfully added to your network in Bedroom.",
            TimeDuration::days(1),
            Success,
            true,
            System,
            "devices",
        ),
        (
            "Motion Detected",
            "Motion detected in Garage while you were away. Check your security camera footage.",
            TimeDuration::days(2),
            Warning,
            true,
            Device,
            "security",
        ),
        (
            "Weekly Report Ready",
            "Your weekly IoT network report is now available. View insights about your device performance and energy usage.",
            TimeDuration::days(3),
            Info,
            true,
            System,
            "reports",
        ),
        (
            "Firmware Update Completed",
            "Firmware update for Living Room Thermostat has been successfully completed.",
            TimeDuration::days(4),
            Success,
            true,
            Device,
            "updates",
        ),
        (
            "Connection Restored",
            "Kitchen Lights are back online after 25 minutes of disconnection.",
            TimeDuration::days(5),
            Success,
            true,
            Device,
            "connectivity",
        ),
        (
            "Energy Usage Alert",
            "Unusual energy consumption detected. Your daily usage is 30% higher than average.",
            TimeDuration::days(6),
            Warning,
            true,
            System,
            "energy",
        ),
    ];

    samples
        .into_iter()
        .enumerate()
        .map(
            |(i, (title, message, age, notification_type, read, source, category))| Notification {
                id: (i + 1).to_string(),
                title: title.to_string(),
                message: message.to_string(),
                timestamp: now - age,
                notification_type,
                read,
                source,
                category: category.to_string(),
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::sim_rng;

    fn store() -> NotificationStore {
        NotificationStore::new(
            &NotificationSimConfig::default(),
            sim_rng(Some(3)),
            EventDispatcher::default(),
        )
    }

    fn always() -> NotificationProbabilities {
        NotificationProbabilities {
            creation: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_samples() {
        let now = OffsetDateTime::now_utc();
        let samples = sample_notifications(now);
        assert_eq!(samples.len(), 10);

        let unread: Vec<_> = samples
            .iter()
            .filter(|n| !n.read)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(unread, ["1", "2", "4"]);
        assert_eq!(samples[0].notification_type, NotificationType::Error);
        assert_eq!(samples[0].timestamp, now - TimeDuration::minutes(5));
        assert_eq!(samples[9].category, "energy");
        assert!(samples.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }

    #[tokio::test]
    async fn test_unread_count_initial() {
        assert_eq!(store().unread_count().await, 3);
    }

    #[tokio::test]
    async fn test_mark_as_read_is_idempotent() {
        let store = store();
        store.mark_as_read("1").await.unwrap();
        store.mark_as_read("1").await.unwrap();
        assert_eq!(store.unread_count().await, 2);
        assert!(store.notification("1").await.unwrap().read);
    }

    #[tokio::test]
    async fn test_mark_unknown_notification() {
        let store = store();
        assert_eq!(
            store.mark_as_read("nope").await.unwrap_err(),
            Error::notification_not_found("nope")
        );
    }

    #[tokio::test]
    async fn test_mark_all_as_read() {
        let store = store();
        let mut rx = store.events().subscribe();

        assert_eq!(store.mark_all_as_read().await, 3);
        assert_eq!(store.unread_count().await, 0);

        assert_eq!(
            rx.recv().await.unwrap(),
            FleetEvent::NotificationsRead {
                ids: vec!["1".to_string(), "2".to_string(), "4".to_string()]
            }
        );
        match rx.recv().await.unwrap() {
            FleetEvent::Toast(toast) => assert_eq!(toast.title, "All notifications marked as read"),
            other => panic!("unexpected event {:?}", other),
        }

        // Nothing left to change, but the toast still fires.
        assert_eq!(store.mark_all_as_read().await, 0);
        assert!(matches!(rx.recv().await.unwrap(), FleetEvent::Toast(_)));
    }

    #[tokio::test]
    async fn test_delete_notification() {
        let store = store();
        let removed = store.delete_notification("3").await.unwrap();
        assert_eq!(removed.title, "System Update Available");
        assert_eq!(store.len().await, 9);
        assert!(store.notification("3").await.is_none());
        assert!(store.delete_notification("3").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_selected_counts() {
        let store = store();
        let mut rx = store.events().subscribe();

        let removed = store
            .delete_selected_notifications(&["2", "5", "missing"])
            .await;
        assert_eq!(removed, 2);
        assert_eq!(store.len().await, 8);
        assert_eq!(store.unread_count().await, 2);

        assert_eq!(
            rx.recv().await.unwrap(),
            FleetEvent::NotificationsDeleted {
                ids: vec!["2".to_string(), "5".to_string()]
            }
        );
        match rx.recv().await.unwrap() {
            FleetEvent::Toast(toast) => assert_eq!(toast.title, "3 notifications deleted"),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_selected_keeps_order() {
        let store = store();
        store
            .delete_selected_notifications(&["1".to_string(), "10".to_string()])
            .await;
        let ids: Vec<_> = store.notifications().await.into_iter().map(|n| n.id).collect();
        assert_eq!(ids, ["2", "3", "4", "5", "6", "7", "8", "9"]);
    }

    #[tokio::test]
    async fn test_without_samples() {
        let config = NotificationSimConfig {
            seed_samples: false,
            ..Default::default()
        };
        let store = NotificationStore::new(&config, sim_rng(None), EventDispatcher::default());
        assert!(store.is_empty().await);
        assert_eq!(store.unread_count().await, 0);
    }

    #[tokio::test]
    async fn test_tick_prepends_unread() {
        let config = NotificationSimConfig {
            probabilities: always(),
            ..Default::default()
        };
        let store = NotificationStore::new(&config, sim_rng(Some(9)), EventDispatcher::default());
        let mut rx = store.events().subscribe();

        let created = store.tick().await.unwrap();
        let feed = store.notifications().await;
        assert_eq!(feed.len(), 11);
        assert_eq!(feed[0], created);
        assert!(!created.read);
        assert_eq!(store.unread_count().await, 4);

        assert!(matches!(
            rx.recv().await.unwrap(),
            FleetEvent::NotificationCreated { .. }
        ));
        match rx.recv().await.unwrap() {
            FleetEvent::Toast(toast) => {
                assert_eq!(toast.title, ACTIVITY_TITLE);
                assert_eq!(toast.description, Some(created.message.clone()));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tick_with_zero_creation_never_adds() {
        let config = NotificationSimConfig {
            probabilities: NotificationProbabilities {
                creation: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let store = NotificationStore::new(&config, sim_rng(Some(9)), EventDispatcher::default());
        for _ in 0..20 {
            assert!(store.tick().await.is_none());
        }
        assert_eq!(store.len().await, 10);
        assert_eq!(store.check_count().await, 20);
    }

    #[test]
    fn test_synthesized_shape() {
        let mut rng = sim_rng(Some(21));
        let now = OffsetDateTime::now_utc();
        for _ in 0..50 {
            let n = synthesize(&mut rng, &always(), now).unwrap();
            assert!(n.id.starts_with("new-"));
            assert_eq!(n.id.len(), "new-".len() + 36);
            assert_eq!(n.title, ACTIVITY_TITLE);
            assert!(n.message.starts_with("New activity detected at "));
            assert_eq!(n.message.len(), "New activity detected at HH:MM:SS".len());
            assert!(matches!(
                n.notification_type,
                NotificationType::Info | NotificationType::Warning
            ));
            assert!(ACTIVITY_CATEGORIES.contains(&n.category.as_str()));
            assert_eq!(n.timestamp, now);
        }
    }

    #[test]
    fn test_synthesized_ids_unique() {
        let mut rng = sim_rng(Some(22));
        let now = OffsetDateTime::now_utc();
        let mut ids: Vec<_> = (0..100)
            .filter_map(|_| synthesize(&mut rng, &always(), now))
            .map(|n| n.id)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_warning_share_extremes() {
        let mut rng = sim_rng(Some(23));
        let now = OffsetDateTime::now_utc();
        let all_warnings = NotificationProbabilities {
            creation: 1.0,
            warning_share: 1.0,
            device_source: 0.0,
        };
        for _ in 0..20 {
            let n = synthesize(&mut rng, &all_warnings, now).unwrap();
            assert_eq!(n.notification_type, NotificationType::Warning);
            assert_eq!(n.source, NotificationSource::System);
        }
    }
}
