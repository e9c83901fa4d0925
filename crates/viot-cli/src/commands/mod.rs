//! Command implementations for the CLI.

mod config;
mod run;
mod snapshot;
mod summary;

pub use config::cmd_config;
pub use run::{RunArgs, cmd_run};
pub use snapshot::{SnapshotArgs, cmd_snapshot};
pub use summary::cmd_summary;
