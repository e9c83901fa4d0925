//! Error types for viot-core.
//!
//! Every store operation is an in-memory mutation, so nothing here is
//! transient and nothing is retried. Errors fall into two groups:
//!
//! | Error | Meaning |
//! |-------|---------|
//! | [`Error::DeviceNotFound`] | Operation named a device id the store does not hold |
//! | [`Error::NotificationNotFound`] | Operation named a notification id the store does not hold |
//! | [`Error::IdsExhausted`] | The device id counter has no values left |
//! | [`Error::InvalidConfig`] | Simulation parameters are unusable (e.g. no seed locations) |
//! | [`Error::InvalidRange`] | A reading range with `min > max` |
//! | [`Error::Parse`] | A name could not be parsed into a simulator value |
//!
//! Device seeding failures are not surfaced as errors to the caller of
//! [`crate::DeviceStore::seeded`]; the store records them in its
//! [`init_error`](crate::DeviceStore::init_error) flag instead.

use thiserror::Error;

/// Errors that can occur while operating the simulation.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// No device with this id.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// No notification with this id.
    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    /// Every device id has been handed out.
    #[error("Device ids exhausted")]
    IdsExhausted,

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading range with inverted bounds.
    #[error("Invalid reading range: min {min} is greater than max {max}")]
    InvalidRange {
        /// Lower bound supplied.
        min: i32,
        /// Upper bound supplied.
        max: i32,
    },

    /// Failed to parse a value.
    #[error("Parse error: {0}")]
    Parse(viot_types::ParseError),
}

impl Error {
    /// Create a device not found error.
    pub fn device_not_found(id: impl Into<String>) -> Self {
        Self::DeviceNotFound(id.into())
    }

    /// Create a notification not found error.
    pub fn notification_not_found(id: impl Into<String>) -> Self {
        Self::NotificationNotFound(id.into())
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

impl From<viot_types::ParseError> for Error {
    fn from(err: viot_types::ParseError) -> Self {
        match err {
            viot_types::ParseError::InvalidRange { min, max } => Error::InvalidRange { min, max },
            other => Error::Parse(other),
        }
    }
}

/// Result type alias using viot-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
