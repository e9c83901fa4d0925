use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod format;
mod style;
mod util;

use cli::{Cli, Commands};
use commands::{RunArgs, SnapshotArgs, cmd_config, cmd_run, cmd_snapshot, cmd_summary};
use format::FormatOptions;
use util::load_config;

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "viot", &mut io::stdout());
        return Ok(());
    }

    // Logs go to stderr so event output on stdout stays machine-readable
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let opts = FormatOptions::new(cli.no_color, cli.style).with_compact(cli.compact);
    let output = cli.output.as_ref();
    let config_file = cli.config.as_deref();

    match cli.command {
        Commands::Run {
            sim,
            ticks,
            no_toasts,
        } => {
            let config = load_config(config_file)?;
            let args = RunArgs {
                seed: sim.seed,
                format: sim.format,
                ticks,
                no_toasts,
            };
            cmd_run(config, args, output, &opts).await?;
        }
        Commands::Snapshot {
            sim,
            devices,
            notifications,
        } => {
            let config = load_config(config_file)?;
            let args = SnapshotArgs {
                seed: sim.seed,
                format: sim.format,
                devices,
                notifications,
            };
            cmd_snapshot(config, args, output, &opts).await?;
        }
        Commands::Summary { sim, ticks } => {
            let config = load_config(config_file)?;
            cmd_summary(config, sim.seed, ticks, sim.format, output, &opts).await?;
        }
        Commands::Config { action } => {
            cmd_config(action, config_file, opts.no_color)?;
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
