//! Store event system.
//!
//! Every store mutation publishes a [`FleetEvent`] through an
//! [`EventDispatcher`]. Consumers subscribe and re-read the store snapshots
//! they care about; events carry identifiers and small payloads, not full
//! fleet state.
//!
//! The channel is a `tokio::sync::broadcast` channel: senders never block,
//! and a subscriber that falls more than `capacity` events behind loses the
//! oldest ones.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use viot_types::{Device, DeviceStatus, DeviceType, Notification};

/// Lightweight reference to a device for events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRef {
    /// Device id.
    pub id: String,
    /// Device name at the time of the event.
    pub name: String,
    /// Device type.
    pub device_type: DeviceType,
}

impl From<&Device> for DeviceRef {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            device_type: device.device_type,
        }
    }
}

/// A status transition applied by a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Device id.
    pub device_id: String,
    /// Status before the tick.
    pub from: DeviceStatus,
    /// Status after the tick.
    pub to: DeviceStatus,
}

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// Severity.
    pub level: ToastLevel,
    /// Headline.
    pub title: String,
    /// Optional detail line.
    pub description: Option<String>,
}

impl Toast {
    /// Success toast.
    pub fn success(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            title: title.into(),
            description,
        }
    }

    /// Info toast.
    pub fn info(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            title: title.into(),
            description,
        }
    }

    /// Error toast.
    pub fn error(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            title: title.into(),
            description,
        }
    }
}

/// Events published by the stores.
///
/// All events are serializable for logging and IPC.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new event types
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum FleetEvent {
    /// The initial device batch was generated.
    DevicesSeeded { count: usize },
    /// The initial device batch could not be generated.
    DeviceInitFailed { error: String },
    /// A device was added.
    DeviceAdded { device: DeviceRef },
    /// A device's editable fields changed.
    DeviceUpdated { device: DeviceRef },
    /// A device was removed.
    DeviceRemoved { device: DeviceRef },
    /// The selected device changed (`None` clears the selection).
    SelectionChanged { device_id: Option<String> },
    /// A simulation tick was applied to every device.
    DevicesTicked {
        tick: u64,
        device_count: usize,
        status_changes: Vec<StatusChange>,
    },
    /// A notification was synthesized.
    NotificationCreated { notification: Notification },
    /// Notifications were marked as read.
    NotificationsRead { ids: Vec<String> },
    /// Notifications were deleted.
    NotificationsDeleted { ids: Vec<String> },
    /// A toast to show the user.
    Toast(Toast),
}

/// Sender for fleet events.
pub type EventSender = broadcast::Sender<FleetEvent>;

/// Receiver for fleet events.
pub type EventReceiver = broadcast::Receiver<FleetEvent>;

/// Event dispatcher for sending events to multiple receivers.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    sender: EventSender,
}

impl EventDispatcher {
    /// Create a new event dispatcher.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Send an event.
    pub fn send(&self, event: FleetEvent) {
        // Ignore error if no receivers
        let _ = self.sender.send(event);
    }

    /// Send a toast.
    pub fn toast(&self, toast: Toast) {
        self.send(FleetEvent::Toast(toast));
    }

    /// Get the number of active receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dispatch_to_multiple_subscribers() {
        let events = EventDispatcher::default();
        let mut a = events.subscribe();
        let mut b = events.subscribe();
        assert_eq!(events.receiver_count(), 2);

        events.send(FleetEvent::DevicesSeeded { count: 3 });

        assert_eq!(a.recv().await.unwrap(), FleetEvent::DevicesSeeded { count: 3 });
        assert_eq!(b.recv().await.unwrap(), FleetEvent::DevicesSeeded { count: 3 });
    }

    #[test]
    fn test_send_without_subscribers_is_silent() {
        let events = EventDispatcher::new(4);
        events.toast(Toast::success("Device Added", None));
        assert_eq!(events.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags() {
        let events = EventDispatcher::new(2);
        let mut rx = events.subscribe();
        for count in 0..5 {
            events.send(FleetEvent::DevicesSeeded { count });
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        assert_eq!(rx.recv().await.unwrap(), FleetEvent::DevicesSeeded { count: 3 });
    }

    #[test]
    fn test_event_serialization() {
        let event = FleetEvent::SelectionChanged {
            device_id: Some("4".to_string()),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "selection_changed");
        assert_eq!(json["device_id"], "4");

        let toast = FleetEvent::Toast(Toast::info("New Activity Detected", None));
        let json = serde_json::to_value(&toast).unwrap();
        assert_eq!(json["type"], "toast");
        assert_eq!(json["level"], "info");
        assert_eq!(json["title"], "New Activity Detected");
    }

    #[test]
    fn test_toast_levels() {
        assert_eq!(Toast::success("a", None).level, ToastLevel::Success);
        assert_eq!(Toast::info("a", None).level, ToastLevel::Info);
        assert_eq!(Toast::error("a", None).level, ToastLevel::Error);
        assert!(serde_json::from_str::<ToastLevel>("\"warning\"").is_err());
    }
}
