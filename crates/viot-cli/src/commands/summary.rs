//! Summary command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;
use viot_core::{EventDispatcher, FleetSummary, Session, SimulationConfig};

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_summary_text};
use crate::util::write_output;

pub async fn cmd_summary(
    mut config: SimulationConfig,
    seed: Option<u64>,
    ticks: u64,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    if seed.is_some() {
        config.seed = seed;
    }

    let session = Session::detached(&config, EventDispatcher::new(config.events.capacity))
        .context("Failed to seed fleet")?;
    let store = session.devices();
    for _ in 0..ticks {
        let report = store.tick().await;
        debug!(
            "tick {}: {} status changes",
            report.tick,
            report.status_changes.len()
        );
    }

    let summary = FleetSummary::from_devices(&store.devices().await);
    let content = match format {
        OutputFormat::Json => opts.as_json(&summary)?,
        OutputFormat::Text => format_summary_text(&summary, opts),
    };
    write_output(output, &content)
}
