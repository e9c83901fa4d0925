//! Run command implementation.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{info, warn};
use viot_core::{EventDispatcher, EventReceiver, FleetEvent, Session, SimulationConfig};

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_event_json, format_event_text};
use crate::util::open_output;

/// Arguments for the run command.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub seed: Option<u64>,
    pub format: OutputFormat,
    /// Stop after this many device ticks.
    pub ticks: Option<u64>,
    pub no_toasts: bool,
}

pub async fn cmd_run(
    mut config: SimulationConfig,
    args: RunArgs,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let events = EventDispatcher::new(config.events.capacity);
    let mut rx = events.subscribe();
    let session =
        Session::start_with_events(&config, events).context("Failed to start session")?;
    let mut sink = open_output(output)?;

    match args.ticks {
        Some(n) => info!("Running for {} device ticks", n),
        None => info!("Running until interrupted (Ctrl-C to stop)"),
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ticks_seen: u64 = 0;

    loop {
        if args.ticks.is_some_and(|n| ticks_seen >= n) {
            drain_pending(&mut rx, &args, opts, &mut sink)?;
            break;
        }

        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted, stopping session");
                break;
            }
            event = rx.recv() => match event {
                Ok(event) => {
                    if matches!(event, FleetEvent::DevicesTicked { .. }) {
                        ticks_seen += 1;
                    }
                    emit(&event, &args, opts, &mut sink)?;
                }
                Err(RecvError::Lagged(n)) => warn!("Output fell behind, {} events dropped", n),
                Err(RecvError::Closed) => break,
            }
        }
    }

    session.shutdown().await;
    sink.flush()?;
    Ok(())
}

/// Print whatever is already queued without waiting for more.
fn drain_pending(
    rx: &mut EventReceiver,
    args: &RunArgs,
    opts: &FormatOptions,
    sink: &mut impl Write,
) -> Result<()> {
    loop {
        match rx.try_recv() {
            Ok(event) => emit(&event, args, opts, sink)?,
            Err(TryRecvError::Lagged(n)) => warn!("Output fell behind, {} events dropped", n),
            Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(()),
        }
    }
}

fn emit(
    event: &FleetEvent,
    args: &RunArgs,
    opts: &FormatOptions,
    sink: &mut impl Write,
) -> Result<()> {
    if args.no_toasts && matches!(event, FleetEvent::Toast(_)) {
        return Ok(());
    }
    let line = match args.format {
        OutputFormat::Json => format_event_json(event)?,
        OutputFormat::Text => format_event_text(event, opts),
    };
    sink.write_all(line.as_bytes())?;
    sink.flush()?;
    Ok(())
}
