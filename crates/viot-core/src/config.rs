//! Simulation configuration.
//!
//! Every probability used by the device and notification tickers is a named
//! field here rather than a literal in the tick code.
//!
//! # Example Configuration
//!
//! ```toml
//! seed = 42
//!
//! [devices]
//! initial_count = 12
//! tick_interval_secs = 5
//!
//! [devices.probabilities]
//! status_flip = 0.1
//! battery_decay = 0.2
//!
//! [notifications]
//! check_interval_secs = 60
//! seed_samples = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default seed locations for randomly generated devices.
pub const DEFAULT_LOCATIONS: [&str; 9] = [
    "Living Room",
    "Kitchen",
    "Bedroom",
    "Office",
    "Garage",
    "Basement",
    "Hallway",
    "Bathroom",
    "Patio",
];

/// Upper bound on the seed batch size.
pub const MAX_INITIAL_DEVICES: usize = 10_000;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed RNG seed for reproducible runs. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Device store settings.
    pub devices: DeviceSimConfig,
    /// Notification store settings.
    pub notifications: NotificationSimConfig,
    /// Event channel settings.
    pub events: EventConfig,
}

impl SimulationConfig {
    /// Load configuration from the default path, falling back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return every problem found.
    ///
    /// This checks:
    /// - All probabilities lie in `[0, 1]`
    /// - Tick intervals are non-zero
    /// - The seed batch is not absurdly large
    /// - There is at least one non-empty seed location
    /// - The event channel has capacity
    ///
    /// # Example
    ///
    /// ```
    /// use viot_core::SimulationConfig;
    ///
    /// let config = SimulationConfig::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.devices.validate());
        errors.extend(self.notifications.validate());
        errors.extend(self.events.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Device store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSimConfig {
    /// Number of devices generated at session start.
    pub initial_count: usize,
    /// Seconds between simulation ticks.
    pub tick_interval_secs: u64,
    /// Locations randomly assigned to seeded devices.
    pub locations: Vec<String>,
    /// Probability that a seeded device starts online.
    pub initial_online: f64,
    /// Per-tick transition probabilities.
    pub probabilities: TickProbabilities,
}

impl Default for DeviceSimConfig {
    fn default() -> Self {
        Self {
            initial_count: 12,
            tick_interval_secs: 5,
            locations: DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect(),
            initial_online: 0.8,
            probabilities: TickProbabilities::default(),
        }
    }
}

impl DeviceSimConfig {
    /// Interval between device ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    /// Validate device settings.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.initial_count > MAX_INITIAL_DEVICES {
            errors.push(ValidationError::new(
                "devices.initial_count",
                format!(
                    "initial count {} exceeds maximum of {}",
                    self.initial_count, MAX_INITIAL_DEVICES
                ),
            ));
        }
        if self.tick_interval_secs == 0 {
            errors.push(ValidationError::new(
                "devices.tick_interval_secs",
                "tick interval must be at least 1 second",
            ));
        }
        if self.locations.is_empty() {
            errors.push(ValidationError::new(
                "devices.locations",
                "at least one location is required",
            ));
        }
        for (i, location) in self.locations.iter().enumerate() {
            if location.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("devices.locations[{}]", i),
                    "location cannot be empty",
                ));
            }
        }
        check_probability(&mut errors, "devices.initial_online", self.initial_online);
        errors.extend(self.probabilities.validate("devices.probabilities"));

        errors
    }
}

/// Probabilities applied to every device on each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickProbabilities {
    /// Chance that a device's status flips to offline or warning.
    pub status_flip: f64,
    /// Share of flips that land on offline (the rest land on warning).
    pub offline_share: f64,
    /// Chance that an offline device comes back online when it did not flip.
    pub recovery: f64,
    /// Chance that the battery drops by one point.
    pub battery_decay: f64,
    /// Chance that an online device earns reward points.
    pub reward_accrual: f64,
    /// Points earned per successful accrual.
    pub reward_increment: u64,
}

impl Default for TickProbabilities {
    fn default() -> Self {
        Self {
            status_flip: 0.1,
            offline_share: 0.5,
            recovery: 0.3,
            battery_decay: 0.2,
            reward_accrual: 0.3,
            reward_increment: 5,
        }
    }
}

impl TickProbabilities {
    /// Validate every probability under `prefix`.
    pub fn validate(&self, prefix: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        check_probability(&mut errors, &format!("{prefix}.status_flip"), self.status_flip);
        check_probability(&mut errors, &format!("{prefix}.offline_share"), self.offline_share);
        check_probability(&mut errors, &format!("{prefix}.recovery"), self.recovery);
        check_probability(&mut errors, &format!("{prefix}.battery_decay"), self.battery_decay);
        check_probability(&mut errors, &format!("{prefix}.reward_accrual"), self.reward_accrual);
        errors
    }
}

/// Notification store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSimConfig {
    /// Seconds between synthesis checks.
    pub check_interval_secs: u64,
    /// Whether the store starts with the sample notifications.
    pub seed_samples: bool,
    /// Synthesis probabilities.
    pub probabilities: NotificationProbabilities,
}

impl Default for NotificationSimConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 60,
            seed_samples: true,
            probabilities: NotificationProbabilities::default(),
        }
    }
}

impl NotificationSimConfig {
    /// Interval between synthesis checks.
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    /// Validate notification settings.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.check_interval_secs == 0 {
            errors.push(ValidationError::new(
                "notifications.check_interval_secs",
                "check interval must be at least 1 second",
            ));
        }
        let p = &self.probabilities;
        check_probability(&mut errors, "notifications.probabilities.creation", p.creation);
        check_probability(
            &mut errors,
            "notifications.probabilities.warning_share",
            p.warning_share,
        );
        check_probability(
            &mut errors,
            "notifications.probabilities.device_source",
            p.device_source,
        );
        errors
    }
}

/// Probabilities used when synthesizing notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationProbabilities {
    /// Chance that a check produces a notification.
    pub creation: f64,
    /// Share of generated notifications that are warnings (the rest are info).
    pub warning_share: f64,
    /// Share of generated notifications attributed to a device.
    pub device_source: f64,
}

impl Default for NotificationProbabilities {
    fn default() -> Self {
        Self {
            creation: 0.2,
            warning_share: 0.3,
            device_source: 0.5,
        }
    }
}

/// Event channel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Broadcast buffer size. Slow subscribers lose the oldest events.
    pub capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self { capacity: 100 }
    }
}

impl EventConfig {
    /// Validate event settings.
    pub fn validate(&self) -> Vec<ValidationError> {
        if self.capacity == 0 {
            vec![ValidationError::new(
                "events.capacity",
                "capacity must be greater than 0",
            )]
        } else {
            Vec::new()
        }
    }
}

fn check_probability(errors: &mut Vec<ValidationError>, field: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ValidationError::new(
            field,
            format!("probability {} must be between 0 and 1", value),
        ));
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field path (e.g., `devices.tick_interval_secs`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("viot")
        .join("config.toml")
}
