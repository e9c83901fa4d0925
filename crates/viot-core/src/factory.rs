//! Device construction.
//!
//! [`DeviceFactory`] builds fully populated [`Device`] records, either random
//! ones for the initial fleet or user-requested ones for "add device".

use rand::Rng;
use rand::seq::IndexedRandom;
use time::{Duration as TimeDuration, OffsetDateTime};

use viot_types::{Device, DeviceStatus, DeviceType, HISTORY_LEN, HistoryPoint, MAX_BATTERY};

use crate::config::DeviceSimConfig;
use crate::error::{Error, Result};
use crate::generator::{chance, generate_reading};

/// Spacing between seeded history points.
const HISTORY_STEP: TimeDuration = TimeDuration::hours(1);

/// Builds device records.
#[derive(Debug, Clone)]
pub struct DeviceFactory {
    locations: Vec<String>,
    initial_online: f64,
}

impl DeviceFactory {
    /// Create a factory from device settings.
    pub fn new(config: &DeviceSimConfig) -> Self {
        Self {
            locations: config.locations.clone(),
            initial_online: config.initial_online,
        }
    }

    /// Build a random device with the given id.
    ///
    /// Fails when there are no locations to pick from.
    pub fn random_device<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        id: &str,
        now: OffsetDateTime,
    ) -> Result<Device> {
        let device_type = *DeviceType::ALL
            .choose(rng)
            .ok_or_else(|| Error::invalid_config("no device types"))?;
        let location = self
            .locations
            .choose(rng)
            .ok_or_else(|| Error::invalid_config("no locations configured for seeded devices"))?
            .clone();
        let history = seed_history(rng, device_type, now);
        let last_reading = history.last().map_or(0, |p| p.value);

        let status = if chance(rng, self.initial_online) {
            DeviceStatus::Online
        } else if chance(rng, 0.5) {
            DeviceStatus::Offline
        } else {
            DeviceStatus::Warning
        };

        Ok(Device {
            id: id.to_string(),
            name: format!("{} Sensor {}", device_type.title(), id),
            device_type,
            status,
            last_reading,
            battery_level: rng.random_range(30..=MAX_BATTERY),
            location,
            ip_address: format!("192.168.{}.{}", rng.random::<u8>(), rng.random::<u8>()),
            mac_address: random_mac(rng),
            firmware_version: format!(
                "v{}.{}.{}",
                rng.random_range(1..=3),
                rng.random_range(0..=9),
                rng.random_range(0..=9)
            ),
            last_updated: now - TimeDuration::days(rng.random_range(1..=30)),
            history,
            reward_points: rng.random_range(0..=1000),
        })
    }

    /// Build a user-added device: online, full battery, no rewards.
    pub fn new_device<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        id: &str,
        name: &str,
        device_type: DeviceType,
        location: &str,
        now: OffsetDateTime,
    ) -> Device {
        let history = seed_history(rng, device_type, now);
        let last_reading = history.last().map_or(0, |p| p.value);

        Device {
            id: id.to_string(),
            name: name.to_string(),
            device_type,
            status: DeviceStatus::Online,
            last_reading,
            battery_level: MAX_BATTERY,
            location: location.to_string(),
            ip_address: format!("192.168.1.{}", rng.random_range(2..=254)),
            mac_address: random_mac(rng),
            firmware_version: "v1.0.0".to_string(),
            last_updated: now,
            history,
            reward_points: 0,
        }
    }

    /// Build `count` random devices with ids `"1"..="count"`.
    pub fn seed<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
        now: OffsetDateTime,
    ) -> Result<Vec<Device>> {
        (1..=count)
            .map(|i| self.random_device(rng, &i.to_string(), now))
            .collect()
    }
}

/// Hourly history ending at `now`, oldest first.
fn seed_history<R: Rng + ?Sized>(
    rng: &mut R,
    device_type: DeviceType,
    now: OffsetDateTime,
) -> Vec<HistoryPoint> {
    let range = device_type.reading_range();
    (0..HISTORY_LEN)
        .map(|i| {
            let hours_back = (HISTORY_LEN - 1 - i) as i32;
            HistoryPoint {
                timestamp: now - HISTORY_STEP * hours_back,
                value: generate_reading(rng, range),
            }
        })
        .collect()
}

fn random_mac<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 6] = rng.random();
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}
