//! Query builders for device and notification snapshots.
//!
//! Both builders filter a snapshot taken from a store. They never touch the
//! store itself, so a query can be re-applied to any snapshot.
//!
//! # Example
//!
//! ```
//! use viot_core::{DeviceQuery, NotificationQuery, NotificationTab};
//! use viot_types::DeviceStatus;
//!
//! let offline_kitchen = DeviceQuery::new()
//!     .location("Kitchen")
//!     .status(DeviceStatus::Offline);
//!
//! let unread_alerts = NotificationQuery::new()
//!     .tab(NotificationTab::Unread)
//!     .category("alerts")
//!     .oldest_first();
//! # let _ = (offline_kitchen, unread_alerts);
//! ```

use viot_types::{Device, DeviceStatus, DeviceType, Notification, NotificationType};

/// Fluent filter for device lists.
///
/// Unset fields match everything. `search` is a case-insensitive substring
/// match over name, location and type name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeviceQuery {
    /// Free-text search.
    pub search: Option<String>,
    /// Exact location.
    pub location: Option<String>,
    /// Exact device type.
    pub device_type: Option<DeviceType>,
    /// Exact status.
    pub status: Option<DeviceStatus>,
}

impl DeviceQuery {
    /// Create a query that matches every device.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by free text. An empty string matches everything.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Filter by location.
    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Filter by device type.
    #[must_use]
    pub fn device_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = Some(device_type);
        self
    }

    /// Filter by status.
    #[must_use]
    pub fn status(mut self, status: DeviceStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether `device` passes every filter.
    pub fn matches(&self, device: &Device) -> bool {
        if let Some(ref needle) = self.search {
            let needle = needle.to_lowercase();
            let hit = device.name.to_lowercase().contains(&needle)
                || device.location.to_lowercase().contains(&needle)
                || device.device_type.as_str().contains(&needle);
            if !hit {
                return false;
            }
        }
        self.location.as_ref().is_none_or(|l| *l == device.location)
            && self.device_type.is_none_or(|t| t == device.device_type)
            && self.status.is_none_or(|s| s == device.status)
    }

    /// Matching devices, in their original order.
    pub fn apply<'a>(&self, devices: &'a [Device]) -> Vec<&'a Device> {
        devices.iter().filter(|d| self.matches(d)).collect()
    }
}

/// Read-state tab of the notification feed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTab {
    #[default]
    All,
    Unread,
    Read,
}

/// Sort order for notification results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Fluent filter for the notification feed.
///
/// Results are sorted by timestamp, newest first unless
/// [`oldest_first`](Self::oldest_first) is set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NotificationQuery {
    /// Read-state tab.
    pub tab: NotificationTab,
    /// Case-insensitive search over title and message.
    pub search: Option<String>,
    /// Exact notification type.
    pub notification_type: Option<NotificationType>,
    /// Exact category.
    pub category: Option<String>,
    /// Result ordering.
    pub order: SortOrder,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl NotificationQuery {
    /// Create a query that matches every notification, newest first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a read-state tab.
    #[must_use]
    pub fn tab(mut self, tab: NotificationTab) -> Self {
        self.tab = tab;
        self
    }

    /// Filter by free text.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Filter by type.
    #[must_use]
    pub fn notification_type(mut self, notification_type: NotificationType) -> Self {
        self.notification_type = Some(notification_type);
        self
    }

    /// Filter by category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Order results oldest first.
    #[must_use]
    pub fn oldest_first(mut self) -> Self {
        self.order = SortOrder::OldestFirst;
        self
    }

    /// Keep at most `limit` results.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `notification` passes every filter.
    pub fn matches(&self, notification: &Notification) -> bool {
        let tab = match self.tab {
            NotificationTab::All => true,
            NotificationTab::Unread => !notification.read,
            NotificationTab::Read => notification.read,
        };
        if !tab {
            return false;
        }
        if let Some(ref needle) = self.search {
            let needle = needle.to_lowercase();
            if !notification.title.to_lowercase().contains(&needle)
                && !notification.message.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        self.notification_type
            .is_none_or(|t| t == notification.notification_type)
            && self
                .category
                .as_ref()
                .is_none_or(|c| *c == notification.category)
    }

    /// Matching notifications, sorted and limited.
    pub fn apply<'a>(&self, notifications: &'a [Notification]) -> Vec<&'a Notification> {
        let mut result: Vec<_> = notifications.iter().filter(|n| self.matches(n)).collect();
        match self.order {
            SortOrder::NewestFirst => result.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortOrder::OldestFirst => result.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        }
        if let Some(limit) = self.limit {
            result.truncate(limit);
        }
        result
    }
}

/// Distinct locations, in first-seen order.
pub fn distinct_locations(devices: &[Device]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for device in devices {
        if !seen.contains(&device.location) {
            seen.push(device.location.clone());
        }
    }
    seen
}

/// Distinct device types, in first-seen order.
pub fn distinct_types(devices: &[Device]) -> Vec<DeviceType> {
    let mut seen = Vec::new();
    for device in devices {
        if !seen.contains(&device.device_type) {
            seen.push(device.device_type);
        }
    }
    seen
}

/// Distinct notification categories, in first-seen order.
pub fn distinct_categories(notifications: &[Notification]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for notification in notifications {
        if !seen.contains(&notification.category) {
            seen.push(notification.category.clone());
        }
    }
    seen
}
