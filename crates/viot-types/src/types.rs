//! Core types for simulated device data.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ParseError;

/// Number of points kept in a device's rolling history window.
pub const HISTORY_LEN: usize = 24;

/// Lowest battery level a device can report.
pub const MIN_BATTERY: u8 = 1;

/// Battery level of a freshly added device.
pub const MAX_BATTERY: u8 = 100;

/// Kind of simulated sensor.
///
/// The type fixes the range of readings the sensor produces and the unit
/// they are displayed in.
///
/// # Examples
///
/// ```
/// use viot_types::DeviceType;
///
/// let range = DeviceType::Temperature.reading_range();
/// assert_eq!((range.min(), range.max()), (18, 30));
/// assert_eq!(DeviceType::Light.unit(), "lux");
/// assert_eq!("humidity".parse::<DeviceType>(), Ok(DeviceType::Humidity));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DeviceType {
    /// Air temperature in degrees Celsius.
    Temperature,
    /// Motion activity as a percentage.
    Motion,
    /// Link throughput in Mbps.
    Connectivity,
    /// Relative humidity percentage.
    Humidity,
    /// Illuminance in lux.
    Light,
    /// Unitless security score.
    Security,
}

impl DeviceType {
    /// Every device type, in declaration order.
    pub const ALL: [DeviceType; 6] = [
        DeviceType::Temperature,
        DeviceType::Motion,
        DeviceType::Connectivity,
        DeviceType::Humidity,
        DeviceType::Light,
        DeviceType::Security,
    ];

    /// Inclusive range of readings this sensor produces.
    #[must_use]
    pub const fn reading_range(&self) -> ReadingRange {
        match self {
            DeviceType::Temperature => ReadingRange::new_unchecked(18, 30),
            DeviceType::Humidity => ReadingRange::new_unchecked(30, 90),
            DeviceType::Light => ReadingRange::new_unchecked(0, 1000),
            DeviceType::Motion | DeviceType::Connectivity | DeviceType::Security => {
                ReadingRange::new_unchecked(0, 100)
            }
        }
    }

    /// Unit of measure for readings. Empty for unitless sensors.
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            DeviceType::Temperature => "°C",
            DeviceType::Humidity | DeviceType::Motion => "%",
            DeviceType::Connectivity => "Mbps",
            DeviceType::Light => "lux",
            DeviceType::Security => "",
        }
    }

    /// Long human-readable label, e.g. "Connectivity Device".
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            DeviceType::Temperature => "Temperature Sensor",
            DeviceType::Motion => "Motion Sensor",
            DeviceType::Connectivity => "Connectivity Device",
            DeviceType::Humidity => "Humidity Sensor",
            DeviceType::Light => "Light Sensor",
            DeviceType::Security => "Security Device",
        }
    }

    /// Lower-case name as used in serialized data.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Temperature => "temperature",
            DeviceType::Motion => "motion",
            DeviceType::Connectivity => "connectivity",
            DeviceType::Humidity => "humidity",
            DeviceType::Light => "light",
            DeviceType::Security => "security",
        }
    }

    /// Capitalised name, e.g. "Humidity".
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            DeviceType::Temperature => "Temperature",
            DeviceType::Motion => "Motion",
            DeviceType::Connectivity => "Connectivity",
            DeviceType::Humidity => "Humidity",
            DeviceType::Light => "Light",
            DeviceType::Security => "Security",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        DeviceType::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| ParseError::UnknownDeviceType(s.to_string()))
    }
}

/// Operational status of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DeviceStatus {
    /// Reporting normally.
    Online,
    /// Not reporting.
    Offline,
    /// Reporting, but flagged.
    Warning,
    /// Taken out of service by the operator.
    Maintenance,
}

impl DeviceStatus {
    /// Every status, in declaration order.
    pub const ALL: [DeviceStatus; 4] = [
        DeviceStatus::Online,
        DeviceStatus::Offline,
        DeviceStatus::Warning,
        DeviceStatus::Maintenance,
    ];

    /// Lower-case name as used in serialized data.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Warning => "warning",
            DeviceStatus::Maintenance => "maintenance",
        }
    }

    /// Whether the status counts as an issue (offline or warning).
    #[must_use]
    pub const fn is_issue(&self) -> bool {
        matches!(self, DeviceStatus::Offline | DeviceStatus::Warning)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        DeviceStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == lower)
            .ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}

/// Inclusive `[min, max]` range of sensor readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRange"))]
pub struct ReadingRange {
    min: i32,
    max: i32,
}

/// Unchecked wire form of [`ReadingRange`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawRange {
    min: i32,
    max: i32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRange> for ReadingRange {
    type Error = ParseError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Self::new(raw.min, raw.max)
    }
}

impl ReadingRange {
    /// Create a range, rejecting `min > max`.
    pub fn new(min: i32, max: i32) -> Result<Self, ParseError> {
        if min > max {
            return Err(ParseError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    const fn new_unchecked(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub const fn min(&self) -> i32 {
        self.min
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Whether `value` lies inside the range.
    #[must_use]
    pub const fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// One sample in a device's rolling history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryPoint {
    /// When the sample was taken.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub timestamp: OffsetDateTime,
    /// Sample value.
    pub value: i32,
}

/// A simulated device and its telemetry.
///
/// Invariants maintained by the simulator:
/// - `history.len() == HISTORY_LEN`
/// - `last_reading` equals the value of the newest history point
/// - `battery_level` lies in `[MIN_BATTERY, MAX_BATTERY]`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Device {
    /// Unique identifier.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Sensor kind.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub device_type: DeviceType,
    /// Current status.
    pub status: DeviceStatus,
    /// Most recent reading.
    pub last_reading: i32,
    /// Battery percentage.
    pub battery_level: u8,
    /// Where the device is installed.
    pub location: String,
    /// Cosmetic IPv4 address.
    pub ip_address: String,
    /// Cosmetic MAC address, upper-case and colon separated.
    pub mac_address: String,
    /// Firmware tag such as `v1.4.2`.
    pub firmware_version: String,
    /// When the firmware was last updated.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub last_updated: OffsetDateTime,
    /// Rolling window of samples, oldest first.
    pub history: Vec<HistoryPoint>,
    /// Accumulated reward points.
    pub reward_points: u64,
}

impl Device {
    /// Unit of this device's readings.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        self.device_type.unit()
    }

    /// Push a new sample, dropping the oldest so the window length is kept.
    pub fn push_reading(&mut self, point: HistoryPoint) {
        if self.history.len() >= HISTORY_LEN {
            let excess = self.history.len() + 1 - HISTORY_LEN;
            self.history.drain(..excess);
        }
        self.history.push(point);
        self.last_reading = point.value;
    }

    /// Merge the fields present in `update` into this device.
    pub fn apply(&mut self, update: &DeviceUpdate) {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(location) = &update.location {
            self.location.clone_from(location);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(firmware) = &update.firmware_version {
            self.firmware_version.clone_from(firmware);
        }
        if let Some(ip) = &update.ip_address {
            self.ip_address.clone_from(ip);
        }
    }
}

/// Partial set of user-editable device fields.
///
/// Telemetry fields (readings, history, battery, rewards) are owned by the
/// simulation and cannot be edited.
///
/// # Examples
///
/// ```
/// use viot_types::{DeviceStatus, DeviceUpdate};
///
/// let update = DeviceUpdate::new()
///     .status(DeviceStatus::Maintenance)
///     .location("Attic");
/// assert!(!update.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct DeviceUpdate {
    /// New display label.
    pub name: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New status.
    pub status: Option<DeviceStatus>,
    /// New firmware tag.
    pub firmware_version: Option<String>,
    /// New IP address.
    pub ip_address: Option<String>,
}

impl DeviceUpdate {
    /// Create an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the location.
    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the status.
    #[must_use]
    pub fn status(mut self, status: DeviceStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the firmware tag.
    #[must_use]
    pub fn firmware_version(mut self, firmware: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware.into());
        self
    }

    /// Set the IP address.
    #[must_use]
    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.status.is_none()
            && self.firmware_version.is_none()
            && self.ip_address.is_none()
    }
}
