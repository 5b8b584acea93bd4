//! Configuration lookup for the genannot binary.
//! Reads the file named by `--config` / GENANNOT_CONFIG, else genannot.toml
//! in the current directory, else falls back to built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use genannot_common::AnnotatorConfig;
use tracing::{info, warn};

pub const CONFIG_ENV: &str = "GENANNOT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "genannot.toml";

/// Where the active configuration comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Named on the command line or via GENANNOT_CONFIG. Must exist.
    Explicit(PathBuf),
    /// Found in the working directory.
    WorkingDir(PathBuf),
    Defaults,
}

pub fn locate(explicit: Option<PathBuf>, default_file: &Path) -> ConfigSource {
    match explicit {
        Some(path) => ConfigSource::Explicit(path),
        None if default_file.exists() => ConfigSource::WorkingDir(default_file.to_path_buf()),
        None => ConfigSource::Defaults,
    }
}

pub fn load(explicit: Option<PathBuf>) -> anyhow::Result<AnnotatorConfig> {
    load_from(locate(explicit, Path::new(DEFAULT_CONFIG_FILE)))
}

pub fn load_from(source: ConfigSource) -> anyhow::Result<AnnotatorConfig> {
    let path = match source {
        ConfigSource::Defaults => {
            warn!("No {DEFAULT_CONFIG_FILE} found and {CONFIG_ENV} not set; using built-in defaults");
            return Ok(AnnotatorConfig::default());
        }
        ConfigSource::Explicit(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            path
        }
        ConfigSource::WorkingDir(path) => path,
    };

    let config = AnnotatorConfig::from_file(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}
