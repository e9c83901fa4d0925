//! Notification records.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ParseError;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NotificationType {
    /// Informational.
    Info,
    /// Needs attention.
    Warning,
    /// An operation completed.
    Success,
    /// Something failed.
    Error,
}

impl NotificationType {
    /// Every notification type, in declaration order.
    pub const ALL: [NotificationType; 4] = [
        NotificationType::Info,
        NotificationType::Warning,
        NotificationType::Success,
        NotificationType::Error,
    ];

    /// Lower-case name as used in serialized data.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Info => "info",
            NotificationType::Warning => "warning",
            NotificationType::Success => "success",
            NotificationType::Error => "error",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        NotificationType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| ParseError::UnknownNotificationType(s.to_string()))
    }
}

/// Origin of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NotificationSource {
    /// Raised on behalf of a device.
    Device,
    /// Raised by the platform itself.
    System,
}

impl fmt::Display for NotificationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationSource::Device => f.write_str("device"),
            NotificationSource::System => f.write_str("system"),
        }
    }
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Notification {
    /// Unique identifier.
    pub id: String,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Creation time.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
    /// Severity.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub notification_type: NotificationType,
    /// Whether the user has seen it.
    pub read: bool,
    /// Who raised it.
    pub source: NotificationSource,
    /// Free-form grouping such as "battery" or "updates".
    pub category: String,
}
