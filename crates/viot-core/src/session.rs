//! Session lifetime: both stores plus their tickers.
//!
//! A [`Session`] is the only thing that spawns background work. Each store is
//! driven by its own task bound to the session's cancellation token, so no
//! ticker outlives the session that started it.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::devices::DeviceStore;
use crate::error::{Error, Result};
use crate::events::{EventDispatcher, EventReceiver};
use crate::generator::sim_rng;
use crate::notifications::NotificationStore;
use crate::traits::Simulated;

/// Offset applied to the configured seed for the notification RNG, so the
/// two stores draw independent streams.
const NOTIFICATION_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// Shortest period a ticker will run at.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Owner of the device and notification stores and their tickers.
///
/// # Example
///
/// ```ignore
/// use viot_core::{Session, SimulationConfig};
///
/// let session = Session::start(&SimulationConfig::default())?;
/// let mut events = session.subscribe();
/// while let Ok(event) = events.recv().await {
///     println!("{:?}", event);
/// }
/// session.shutdown().await;
/// ```
#[derive(Debug)]
pub struct Session {
    devices: Arc<DeviceStore>,
    notifications: Arc<NotificationStore>,
    events: EventDispatcher,
    cancel: CancellationToken,
    tickers: Vec<JoinHandle<()>>,
}

impl Session {
    /// Seed both stores and start their tickers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: &SimulationConfig) -> Result<Self> {
        Self::start_with_events(config, EventDispatcher::new(config.events.capacity))
    }

    /// Like [`start`](Self::start), publishing through `events`.
    ///
    /// Subscribe to `events` before calling this to observe seeding.
    pub fn start_with_events(config: &SimulationConfig, events: EventDispatcher) -> Result<Self> {
        let mut session = Self::detached(config, events)?;
        session.tickers = vec![
            spawn_ticker(session.devices.clone(), session.cancel.clone()),
            spawn_ticker(session.notifications.clone(), session.cancel.clone()),
        ];
        info!(
            "Session started: {} devices, tick every {:?}, notification check every {:?}",
            config.devices.initial_count,
            config.devices.tick_interval(),
            config.notifications.check_interval()
        );
        Ok(session)
    }

    /// Seed both stores without starting any tickers.
    ///
    /// The caller advances the stores by calling their `tick` methods.
    pub fn detached(config: &SimulationConfig, events: EventDispatcher) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::invalid_config(e.to_string()))?;

        let devices = DeviceStore::seeded(&config.devices, sim_rng(config.seed), events.clone());
        let notifications = NotificationStore::new(
            &config.notifications,
            sim_rng(config.seed.map(|s| s.wrapping_add(NOTIFICATION_SEED_OFFSET))),
            events.clone(),
        );

        Ok(Self {
            devices: Arc::new(devices),
            notifications: Arc::new(notifications),
            events,
            cancel: CancellationToken::new(),
            tickers: Vec::new(),
        })
    }

    /// The device store.
    pub fn devices(&self) -> &Arc<DeviceStore> {
        &self.devices
    }

    /// The notification store.
    pub fn notifications(&self) -> &Arc<NotificationStore> {
        &self.notifications
    }

    /// The event dispatcher shared by both stores.
    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// Subscribe to store events.
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Token cancelled when the session stops.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the tickers are still running.
    pub fn is_running(&self) -> bool {
        !self.tickers.is_empty() && !self.cancel.is_cancelled()
    }

    /// Stop both tickers and wait for them to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        let tickers = std::mem::take(&mut self.tickers);
        for result in join_all(tickers).await {
            if let Err(e) = result {
                warn!("Ticker task failed: {}", e);
            }
        }
        info!("Session stopped");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn a task that ticks `store` every period until `cancel` fires.
///
/// The first tick happens one full period after the call.
pub fn spawn_ticker(store: Arc<dyn Simulated>, cancel: CancellationToken) -> JoinHandle<()> {
    let period = store.period().max(MIN_PERIOD);

    tokio::spawn(async move {
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        timer.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("{} ticker cancelled", store.name());
                    break;
                }
                _ = timer.tick() => {
                    store.tick().await;
                }
            }
        }
    })
}
