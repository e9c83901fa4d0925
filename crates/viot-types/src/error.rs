//! Error types for value parsing in viot-types.

use thiserror::Error;

/// Errors that can occur when parsing simulator values from text.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The name does not match any known device type.
    #[error("Unknown device type: {0}")]
    UnknownDeviceType(String),

    /// The name does not match any known device status.
    #[error("Unknown device status: {0}")]
    UnknownStatus(String),

    /// The name does not match any known notification type.
    #[error("Unknown notification type: {0}")]
    UnknownNotificationType(String),

    /// A reading range whose lower bound exceeds its upper bound.
    #[error("Invalid reading range: min {min} is greater than max {max}")]
    InvalidRange {
        /// Lower bound supplied.
        min: i32,
        /// Upper bound supplied.
        max: i32,
    },
}

/// Result type alias using viot-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
