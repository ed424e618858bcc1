// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{ConfigFile, RawActionsSection, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it on its own.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Build the effective configuration for a run.
///
/// Priority per action: `cli` flag, then the optional config file, then the
/// built-in defaults.
pub fn resolve(config_path: Option<&Path>, cli: RawActionsSection) -> Result<ConfigFile> {
    let file = match config_path {
        Some(path) => {
            debug!(path = ?path, "loading config file");
            load_from_path(path)?
        }
        None => RawConfigFile::default(),
    };

    let raw = RawConfigFile {
        actions: cli.merged_over(file.actions),
    };
    ConfigFile::try_from(raw)
}
