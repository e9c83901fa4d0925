//! The device store.
//!
//! [`DeviceStore`] owns the fleet: the device list, the selected device and
//! the RNG that drives the simulation. All state sits behind a single
//! `RwLock`, and every operation takes the lock exactly once, so a reader
//! never sees a half-applied tick.
//!
//! The selection is kept as an id and resolved against the current list on
//! every read. Ticks and updates therefore never leave a stale copy of the
//! selected device behind.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use viot_types::{Device, DeviceStatus, DeviceType, DeviceUpdate, HistoryPoint, MIN_BATTERY};

use crate::config::{DeviceSimConfig, TickProbabilities};
use crate::error::{Error, Result};
use crate::events::{DeviceRef, EventDispatcher, FleetEvent, StatusChange, Toast};
use crate::factory::DeviceFactory;
use crate::generator::{SimRng, chance, reading_for};
use crate::traits::Simulated;

/// Message recorded when the initial batch cannot be generated.
pub const INIT_ERROR_MESSAGE: &str = "Failed to initialize devices";

/// Outcome of one device tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Sequence number of this tick, starting at 1.
    pub tick: u64,
    /// Number of devices updated.
    pub device_count: usize,
    /// Devices whose status changed.
    pub status_changes: Vec<StatusChange>,
}

struct DeviceState {
    devices: Vec<Device>,
    selected: Option<String>,
    /// `None` once every id has been handed out.
    next_id: Option<u64>,
    ticks: u64,
    init_error: Option<String>,
    rng: SimRng,
}

/// In-memory owner of the device fleet.
pub struct DeviceStore {
    state: RwLock<DeviceState>,
    factory: DeviceFactory,
    probabilities: TickProbabilities,
    tick_interval: Duration,
    events: EventDispatcher,
}

impl std::fmt::Debug for DeviceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceStore")
            .field("tick_interval", &self.tick_interval)
            .field("probabilities", &self.probabilities)
            .finish_non_exhaustive()
    }
}

impl DeviceStore {
    /// Create an empty store.
    pub fn new(config: &DeviceSimConfig, rng: SimRng, events: EventDispatcher) -> Self {
        Self::with_devices(Vec::new(), config, rng, events)
    }

    /// Create a store holding `devices`.
    ///
    /// The id counter starts after the largest numeric id present.
    pub fn with_devices(
        devices: Vec<Device>,
        config: &DeviceSimConfig,
        rng: SimRng,
        events: EventDispatcher,
    ) -> Self {
        let next_id = devices
            .iter()
            .filter_map(|d| d.id.parse::<u64>().ok())
            .max()
            .map_or(Some(1), |max| max.checked_add(1));

        Self {
            state: RwLock::new(DeviceState {
                devices,
                selected: None,
                next_id,
                ticks: 0,
                init_error: None,
                rng,
            }),
            factory: DeviceFactory::new(config),
            probabilities: config.probabilities.clone(),
            tick_interval: config.tick_interval(),
            events,
        }
    }

    /// Create a store and generate the initial fleet.
    ///
    /// A generation failure does not propagate: the store starts empty and
    /// [`init_error`](Self::init_error) reports the failure.
    pub fn seeded(config: &DeviceSimConfig, mut rng: SimRng, events: EventDispatcher) -> Self {
        let factory = DeviceFactory::new(config);
        let now = OffsetDateTime::now_utc();

        match factory.seed(&mut rng, config.initial_count, now) {
            Ok(devices) => {
                info!("Seeded {} devices", devices.len());
                let count = devices.len();
                let store = Self::with_devices(devices, config, rng, events);
                store.events.send(FleetEvent::DevicesSeeded { count });
                store
            }
            Err(e) => {
                error!("Device initialization failed: {}", e);
                let mut store = Self::new(config, rng, events);
                store.state.get_mut().init_error = Some(INIT_ERROR_MESSAGE.to_string());
                store.events.send(FleetEvent::DeviceInitFailed {
                    error: e.to_string(),
                });
                store
                    .events
                    .toast(Toast::error(INIT_ERROR_MESSAGE, Some(e.to_string())));
                store
            }
        }
    }

    /// Get the event dispatcher.
    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// Interval between ticks when driven by a session.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Snapshot of every device, in insertion order.
    pub async fn devices(&self) -> Vec<Device> {
        self.state.read().await.devices.clone()
    }

    /// Snapshot of one device.
    pub async fn device(&self, id: &str) -> Option<Device> {
        self.state
            .read()
            .await
            .devices
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    /// Number of devices.
    pub async fn len(&self) -> usize {
        self.state.read().await.devices.len()
    }

    /// Whether the fleet is empty.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.devices.is_empty()
    }

    /// Number of ticks applied so far.
    pub async fn tick_count(&self) -> u64 {
        self.state.read().await.ticks
    }

    /// Initialization failure message, if seeding failed.
    pub async fn init_error(&self) -> Option<String> {
        self.state.read().await.init_error.clone()
    }

    /// Id of the selected device.
    pub async fn selected_id(&self) -> Option<String> {
        self.state.read().await.selected.clone()
    }

    /// Current snapshot of the selected device.
    pub async fn selected_device(&self) -> Option<Device> {
        let state = self.state.read().await;
        let id = state.selected.as_deref()?;
        state.devices.iter().find(|d| d.id == id).cloned()
    }

    /// Select a device by id, or clear the selection with `None`.
    pub async fn set_selected_device(&self, id: Option<&str>) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(id) = id
            && !state.devices.iter().any(|d| d.id == id)
        {
            warn!("Cannot select unknown device {}", id);
            return Err(Error::device_not_found(id));
        }
        state.selected = id.map(str::to_string);
        drop(state);

        self.events.send(FleetEvent::SelectionChanged {
            device_id: id.map(str::to_string),
        });
        Ok(())
    }

    /// Add a new device. It starts online with a full battery and no rewards.
    ///
    /// Fails with [`Error::IdsExhausted`] once the id counter has run out.
    pub async fn add_device(
        &self,
        name: &str,
        device_type: DeviceType,
        location: &str,
    ) -> Result<Device> {
        let mut state = self.state.write().await;
        let Some(next) = state.next_id else {
            warn!("Cannot add {}: device ids exhausted", name);
            return Err(Error::IdsExhausted);
        };
        state.next_id = next.checked_add(1);
        let id = next.to_string();

        let now = OffsetDateTime::now_utc();
        let device = self
            .factory
            .new_device(&mut state.rng, &id, name, device_type, location, now);
        state.devices.push(device.clone());
        drop(state);

        info!("Added device {} ({})", device.id, device.name);
        self.events.send(FleetEvent::DeviceAdded {
            device: DeviceRef::from(&device),
        });
        self.events.toast(Toast::success(
            "Device Added",
            Some(format!("{} has been added to your network", name)),
        ));
        Ok(device)
    }

    /// Merge `update` into the device with `id` and return the new snapshot.
    pub async fn update_device(&self, id: &str, update: &DeviceUpdate) -> Result<Device> {
        let mut state = self.state.write().await;
        let Some(device) = state.devices.iter_mut().find(|d| d.id == id) else {
            warn!("Cannot update unknown device {}", id);
            return Err(Error::device_not_found(id));
        };
        device.apply(update);
        let device = device.clone();
        drop(state);

        debug!("Updated device {}: {:?}", id, update);
        self.events.send(FleetEvent::DeviceUpdated {
            device: DeviceRef::from(&device),
        });
        self.events.toast(Toast::success(
            "Device Updated",
            Some("Device settings have been updated".to_string()),
        ));
        Ok(device)
    }

    /// Remove the device with `id`, clearing the selection if it pointed there.
    pub async fn remove_device(&self, id: &str) -> Result<Device> {
        let mut state = self.state.write().await;
        let Some(index) = state.devices.iter().position(|d| d.id == id) else {
            warn!("Cannot remove unknown device {}", id);
            return Err(Error::device_not_found(id));
        };
        let device = state.devices.remove(index);
        let was_selected = state.selected.as_deref() == Some(id);
        if was_selected {
            state.selected = None;
        }
        drop(state);

        info!("Removed device {} ({})", device.id, device.name);
        if was_selected {
            self.events
                .send(FleetEvent::SelectionChanged { device_id: None });
        }
        self.events.send(FleetEvent::DeviceRemoved {
            device: DeviceRef::from(&device),
        });
        self.events.toast(Toast::success(
            "Device Removed",
            Some("Device has been removed from your network".to_string()),
        ));
        Ok(device)
    }

    /// Apply one simulation step to every device.
    pub async fn tick(&self) -> TickReport {
        let now = OffsetDateTime::now_utc();
        let mut state = self.state.write().await;
        let state = &mut *state;

        let status_changes =
            simulate_tick(&mut state.devices, &mut state.rng, &self.probabilities, now);
        state.ticks += 1;
        let report = TickReport {
            tick: state.ticks,
            device_count: state.devices.len(),
            status_changes,
        };

        debug!(
            "Device tick {}: {} devices, {} status changes",
            report.tick,
            report.device_count,
            report.status_changes.len()
        );
        self.events.send(FleetEvent::DevicesTicked {
            tick: report.tick,
            device_count: report.device_count,
            status_changes: report.status_changes.clone(),
        });
        report
    }
}

#[async_trait]
impl Simulated for DeviceStore {
    fn name(&self) -> &'static str {
        "devices"
    }

    fn period(&self) -> Duration {
        self.tick_interval
    }

    async fn tick(&self) {
        DeviceStore::tick(self).await;
    }
}

/// Advance every device by one step.
///
/// For each device, independently:
/// 1. status may flip to offline/warning, or an offline device may recover
/// 2. a new reading is appended to the history window
/// 3. the battery may drop by one, never below [`MIN_BATTERY`]
/// 4. a device that was online before the step may earn reward points
///
/// Returns the status transitions that occurred.
pub fn simulate_tick<R: Rng + ?Sized>(
    devices: &mut [Device],
    rng: &mut R,
    probabilities: &TickProbabilities,
    now: OffsetDateTime,
) -> Vec<StatusChange> {
    let mut changes = Vec::new();

    for device in devices.iter_mut() {
        let before = device.status;
        let after = next_status(rng, before, probabilities);
        device.status = after;
        if after != before {
            changes.push(StatusChange {
                device_id: device.id.clone(),
                from: before,
                to: after,
            });
        }

        let value = reading_for(rng, device.device_type);
        device.push_reading(HistoryPoint {
            timestamp: now,
            value,
        });

        if chance(rng, probabilities.battery_decay) {
            device.battery_level = device.battery_level.saturating_sub(1).max(MIN_BATTERY);
        }

        if before == DeviceStatus::Online && chance(rng, probabilities.reward_accrual) {
            device.reward_points = device
                .reward_points
                .saturating_add(probabilities.reward_increment);
        }
    }

    changes
}

fn next_status<R: Rng + ?Sized>(
    rng: &mut R,
    current: DeviceStatus,
    probabilities: &TickProbabilities,
) -> DeviceStatus {
    if chance(rng, probabilities.status_flip) {
        if chance(rng, probabilities.offline_share) {
            DeviceStatus::Offline
        } else {
            DeviceStatus::Warning
        }
    } else if current == DeviceStatus::Offline && chance(rng, probabilities.recovery) {
        DeviceStatus::Online
    } else {
        current
    }
}
