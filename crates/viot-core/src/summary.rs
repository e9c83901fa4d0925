//! Fleet statistics and chart data.
//!
//! [`FleetSummary`] aggregates a device snapshot into the figures a
//! dashboard overview shows. [`BatteryBand`] classifies a battery level the
//! same way a device card colours it.
//!
//! # Example
//!
//! ```
//! use viot_core::{BatteryBand, FleetSummary};
//!
//! let summary = FleetSummary::from_devices(&[]);
//! assert_eq!(summary.total, 0);
//! assert_eq!(summary.online_percent, 0);
//!
//! assert_eq!(BatteryBand::from_level(15), BatteryBand::Critical);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use viot_types::{Device, DeviceStatus};

/// Battery level below which a device counts as low in the summary.
pub const LOW_BATTERY_THRESHOLD: u8 = 30;

/// Battery band for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryBand {
    /// Below 20%.
    Critical,
    /// 20% to 49%.
    Low,
    /// 50% and above.
    Normal,
}

impl BatteryBand {
    /// Classify a battery percentage.
    pub fn from_level(level: u8) -> Self {
        match level {
            0..20 => BatteryBand::Critical,
            20..50 => BatteryBand::Low,
            _ => BatteryBand::Normal,
        }
    }
}

/// Aggregate figures for a device snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSummary {
    /// Number of devices.
    pub total: usize,
    /// Devices online.
    pub online: usize,
    /// Devices offline.
    pub offline: usize,
    /// Devices in warning.
    pub warning: usize,
    /// Devices in maintenance.
    pub maintenance: usize,
    /// Offline plus warning.
    pub devices_with_issues: usize,
    /// Share of devices online, rounded; 0 for an empty fleet.
    pub online_percent: u32,
    /// Mean battery level, rounded; 0 for an empty fleet.
    pub average_battery: u32,
    /// Devices below [`LOW_BATTERY_THRESHOLD`].
    pub low_battery: usize,
    /// Sum of reward points.
    pub total_rewards: u64,
    /// Device count per type name.
    pub by_type: BTreeMap<String, usize>,
    /// Device count per location.
    pub by_location: BTreeMap<String, usize>,
}

impl FleetSummary {
    /// Aggregate a device snapshot.
    pub fn from_devices(devices: &[Device]) -> Self {
        let mut summary = Self {
            total: devices.len(),
            ..Default::default()
        };

        let mut battery_sum: u64 = 0;
        for device in devices {
            match device.status {
                DeviceStatus::Online => summary.online += 1,
                DeviceStatus::Offline => summary.offline += 1,
                DeviceStatus::Warning => summary.warning += 1,
                DeviceStatus::Maintenance => summary.maintenance += 1,
            }
            if device.battery_level < LOW_BATTERY_THRESHOLD {
                summary.low_battery += 1;
            }
            battery_sum += u64::from(device.battery_level);
            summary.total_rewards = summary.total_rewards.saturating_add(device.reward_points);
            *summary
                .by_type
                .entry(device.device_type.as_str().to_string())
                .or_default() += 1;
            *summary
                .by_location
                .entry(device.location.clone())
                .or_default() += 1;
        }

        summary.devices_with_issues = summary.offline + summary.warning;
        if summary.total > 0 {
            let total = summary.total as f64;
            summary.online_percent = (summary.online as f64 / total * 100.0).round() as u32;
            summary.average_battery = (battery_sum as f64 / total).round() as u32;
        }
        summary
    }
}

/// A device's history as `("HH:MM", value)` pairs, oldest first.
pub fn chart_series(device: &Device) -> Vec<(String, i32)> {
    device
        .history
        .iter()
        .map(|p| {
            (
                format!("{:02}:{:02}", p.timestamp.hour(), p.timestamp.minute()),
                p.value,
            )
        })
        .collect()
}
