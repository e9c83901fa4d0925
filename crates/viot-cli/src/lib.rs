//! Command-line interface for the virtual IoT fleet simulator.
//!
//! The `viot` binary drives the in-memory simulation from `viot-core`: it can
//! stream a live session's events, print a seeded fleet, or advance a fleet
//! offline and report its statistics.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `run` | Run a live session and print events as they happen |
//! | `snapshot` | Seed a fleet and print it |
//! | `summary` | Advance a fleet offline and print its statistics |
//! | `config` | Show, locate or initialize the configuration file |
//! | `completions` | Generate shell completions |
//!
//! # Output Formats
//!
//! - **Text** (default): tables and one line per event
//! - **JSON**: pretty JSON for snapshots and summaries, one object per line
//!   for `run`
//!
//! # Configuration
//!
//! Settings are read from `~/.config/viot/config.toml` (or the platform
//! equivalent), overridden by `--config` or `VIOT_CONFIG`. Write the
//! defaults with `viot config init`.
//!
//! # Environment Variables
//!
//! - `VIOT_CONFIG`: configuration file path
//! - `VIOT_SEED`: RNG seed (overridden by `--seed`)
//! - `NO_COLOR`: disable colored output when set
//! - `RUST_LOG`: log filter when neither `-v` nor `-q` is given
//!
//! # Examples
//!
//! Stream ten device ticks as JSON lines:
//! ```bash
//! viot run --ticks 10 --format json
//! ```
//!
//! Print a reproducible fleet with its notification feed:
//! ```bash
//! viot snapshot --seed 42 --notifications
//! ```
//!
//! Fleet statistics after an hour of simulated ticks:
//! ```bash
//! viot summary --ticks 720
//! ```

// Re-export core dependencies for convenience
pub use viot_core;
pub use viot_types;
