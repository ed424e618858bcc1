// src/config/validate.rs

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::model::{ActionPaths, ConfigFile, RawConfigFile};
use crate::errors::{PomoError, Result};
use crate::types::ActionKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PomoError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let defaults = ActionPaths::default();
        let actions = raw.actions;

        let paths = ActionPaths {
            begin: checked_path(ActionKind::Begin, actions.begin, defaults.begin)?,
            pause: checked_path(ActionKind::Pause, actions.pause, defaults.pause)?,
            end: checked_path(ActionKind::End, actions.end, defaults.end)?,
        };

        Ok(ConfigFile::new_unchecked(paths))
    }
}

fn checked_path(kind: ActionKind, path: Option<PathBuf>, default: PathBuf) -> Result<PathBuf> {
    let path = path.unwrap_or(default);
    if path.as_os_str().is_empty() {
        return Err(PomoError::ConfigError(format!(
            "[actions].{kind} must not be an empty path"
        )));
    }
    Ok(path)
}

/// Warn about action scripts that don't exist yet.
///
/// A missing script is not fatal here: launching it fails at runtime and the
/// cycle is abandoned. Bare program names are resolved through `PATH` by the
/// OS and are not checked.
pub fn warn_missing_scripts(cfg: &ConfigFile) -> Vec<ActionKind> {
    let mut missing = Vec::new();
    for (kind, path) in cfg.actions().iter() {
        if is_bare_name(path) {
            continue;
        }
        if !path.exists() {
            warn!(action = %kind, path = ?path, "action script does not exist");
            missing.push(kind);
        }
    }
    missing
}

fn is_bare_name(path: &Path) -> bool {
    path.components().count() == 1 && !path.has_root()
}
