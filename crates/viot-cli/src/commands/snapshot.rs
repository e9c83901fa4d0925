//! Snapshot command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use viot_core::{Device, EventDispatcher, Notification, Session, SimulationConfig};

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_devices_text, format_notifications_text};
use crate::style;
use crate::util::write_output;

/// Arguments for the snapshot command.
#[derive(Debug, Clone)]
pub struct SnapshotArgs {
    pub seed: Option<u64>,
    pub format: OutputFormat,
    /// Seed batch size override.
    pub devices: Option<usize>,
    pub notifications: bool,
}

#[derive(Serialize)]
struct SnapshotJson<'a> {
    devices: &'a [Device],
    notifications: &'a [Notification],
}

pub async fn cmd_snapshot(
    mut config: SimulationConfig,
    args: SnapshotArgs,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(count) = args.devices {
        config.devices.initial_count = count;
    }

    let session = Session::detached(&config, EventDispatcher::new(config.events.capacity))
        .context("Failed to seed fleet")?;
    if let Some(error) = session.devices().init_error().await {
        anyhow::bail!("{}", error);
    }
    let devices = session.devices().devices().await;
    let notifications = if args.notifications {
        session.notifications().notifications().await
    } else {
        Vec::new()
    };

    let content = match args.format {
        OutputFormat::Json if args.notifications => opts.as_json(&SnapshotJson {
            devices: &devices,
            notifications: &notifications,
        })?,
        OutputFormat::Json => opts.as_json(&devices)?,
        OutputFormat::Text => {
            let mut text = format_devices_text(&devices, opts);
            if args.notifications {
                text.push('\n');
                text.push_str(&style::format_title("Notifications", opts.no_color));
                text.push('\n');
                text.push_str(&format_notifications_text(&notifications, opts));
            }
            text
        }
    };

    write_output(output, &content)
}
