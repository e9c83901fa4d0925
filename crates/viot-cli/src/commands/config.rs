//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use viot_core::SimulationConfig;

use crate::cli::ConfigAction;
use crate::style;
use crate::util::{config_path, load_config};

pub fn cmd_config(action: ConfigAction, explicit: Option<&Path>, no_color: bool) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(explicit)?;
            let content =
                toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
            print!("{}", content);
        }
        ConfigAction::Path => {
            println!("{}", config_path(explicit).display());
        }
        ConfigAction::Init { force } => {
            let path = config_path(explicit);
            if path.exists() && !force {
                bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            SimulationConfig::default()
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{}",
                style::format_success(
                    &format!("Wrote default configuration to {}", path.display()),
                    no_color
                )
            );
        }
    }
    Ok(())
}
