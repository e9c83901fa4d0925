//! Platform-agnostic types for the virtual IoT fleet simulator.
//!
//! This crate provides the data model shared by the simulation core
//! (viot-core) and its front ends.
//!
//! # Features
//!
//! - Device records with a fixed-length rolling history
//! - Device type table (reading ranges, units, labels)
//! - Notification records
//! - Error types for parsing names from text
//!
//! # Example
//!
//! ```
//! use viot_types::{DeviceStatus, DeviceType};
//!
//! let kind: DeviceType = "light".parse().unwrap();
//! assert_eq!(kind.reading_range().max(), 1000);
//! assert!(DeviceStatus::Offline.is_issue());
//! ```

pub mod error;
pub mod notification;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use notification::{Notification, NotificationSource, NotificationType};
pub use types::{
    Device, DeviceStatus, DeviceType, DeviceUpdate, HISTORY_LEN, HistoryPoint, MAX_BATTERY,
    MIN_BATTERY, ReadingRange,
};
