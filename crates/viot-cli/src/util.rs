//! Utility functions for CLI operations.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use viot_core::{SimulationConfig, default_config_path};

/// Resolve the configuration path: explicit flag first, then the default.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(default_config_path, Path::to_path_buf)
}

/// Load and validate the configuration.
///
/// A missing file at the default location means defaults; a missing file
/// that was named explicitly is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<SimulationConfig> {
    let path = config_path(explicit);
    if explicit.is_none() && !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(SimulationConfig::default());
    }
    let config = SimulationConfig::load_validated(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write output to file or stdout
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

/// Open a streaming sink: a file when given, otherwise stdout.
pub fn open_output(output: Option<&PathBuf>) -> Result<Box<dyn Write + Send>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_path_wins() {
        let path = Path::new("/tmp/viot-test.toml");
        assert_eq!(config_path(Some(path)), path);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "seed = 5\n[devices]\ninitial_count = 3\n").unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.devices.initial_count, 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[devices.probabilities]\nstatus_flip = 1.5\n").unwrap();
        assert!(load_config(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_output(Some(&path), "hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
