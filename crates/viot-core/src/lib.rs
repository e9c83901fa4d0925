//! In-memory simulation engine for a virtual IoT fleet.
//!
//! This crate owns the state behind a smart-home dashboard: a fleet of
//! simulated sensors whose telemetry drifts over time, and a notification
//! feed that occasionally reports new activity. Nothing touches real
//! hardware or the network; every reading comes from a seeded RNG.
//!
//! # Features
//!
//! - **Device store**: seed, add, edit, remove and select devices
//! - **Notification store**: mark read, delete, bulk delete, unread count
//! - **Simulation ticks**: status flips, readings, battery decay, rewards
//! - **Events**: every mutation is published on a broadcast channel
//! - **Queries**: search and filter snapshots, fleet statistics
//! - **Sessions**: background tickers bound to a cancellation token
//!
//! # Device Types
//!
//! | Type | Reading range | Unit |
//! |------|---------------|------|
//! | temperature | 18..=30 | °C |
//! | humidity | 30..=90 | % |
//! | light | 0..=1000 | lux |
//! | motion | 0..=100 | % |
//! | connectivity | 0..=100 | Mbps |
//! | security | 0..=100 | (none) |
//!
//! # Quick Start
//!
//! ```no_run
//! use viot_core::{FleetSummary, Session, SimulationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SimulationConfig::default();
//!     let session = Session::start(&config)?;
//!
//!     let mut events = session.subscribe();
//!     let event = events.recv().await?;
//!     println!("{:?}", event);
//!
//!     let devices = session.devices().devices().await;
//!     let summary = FleetSummary::from_devices(&devices);
//!     println!("{} of {} devices online", summary.online, summary.total);
//!
//!     session.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod devices;
pub mod error;
pub mod events;
pub mod factory;
pub mod generator;
pub mod notifications;
pub mod query;
pub mod session;
pub mod summary;
pub mod traits;

pub use config::{
    ConfigError, DeviceSimConfig, EventConfig, NotificationProbabilities, NotificationSimConfig,
    SimulationConfig, TickProbabilities, ValidationError, default_config_path,
};
pub use devices::{DeviceStore, INIT_ERROR_MESSAGE, TickReport, simulate_tick};
pub use error::{Error, Result};
pub use events::{
    DeviceRef, EventDispatcher, EventReceiver, EventSender, FleetEvent, StatusChange, Toast,
    ToastLevel,
};
pub use factory::DeviceFactory;
pub use generator::{SimRng, generate_in, generate_reading, sim_rng};
pub use notifications::{NotificationStore, sample_notifications};
pub use query::{
    DeviceQuery, NotificationQuery, NotificationTab, SortOrder, distinct_categories,
    distinct_locations, distinct_types,
};
pub use session::{Session, spawn_ticker};
pub use summary::{BatteryBand, FleetSummary, LOW_BATTERY_THRESHOLD, chart_series};
pub use traits::Simulated;

// Re-export types
pub use viot_types;
pub use viot_types::{
    Device, DeviceStatus, DeviceType, DeviceUpdate, HistoryPoint, Notification,
    NotificationSource, NotificationType, ReadingRange,
};
