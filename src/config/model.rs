// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::ActionKind;

pub const DEFAULT_BEGIN_SCRIPT: &str = "/home/pi/begin";
pub const DEFAULT_PAUSE_SCRIPT: &str = "/home/pi/pause";
pub const DEFAULT_END_SCRIPT: &str = "/home/pi/end";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [actions]
/// begin = "/home/pi/begin"
/// pause = "/home/pi/pause"
/// end = "/home/pi/end"
/// ```
///
/// Every key is optional; missing ones fall back to CLI flags or defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub actions: RawActionsSection,
}

/// `[actions]` section. Also used to carry the `--begin/--pause/--end` flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawActionsSection {
    #[serde(default)]
    pub begin: Option<PathBuf>,
    #[serde(default)]
    pub pause: Option<PathBuf>,
    #[serde(default)]
    pub end: Option<PathBuf>,
}

impl RawActionsSection {
    /// Layer `self` over `lower`: any path set here wins.
    pub fn merged_over(self, lower: RawActionsSection) -> RawActionsSection {
        RawActionsSection {
            begin: self.begin.or(lower.begin),
            pause: self.pause.or(lower.pause),
            end: self.end.or(lower.end),
        }
    }
}

/// Fully resolved script paths, one per action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPaths {
    pub begin: PathBuf,
    pub pause: PathBuf,
    pub end: PathBuf,
}

impl ActionPaths {
    pub fn path(&self, kind: ActionKind) -> &Path {
        match kind {
            ActionKind::Begin => &self.begin,
            ActionKind::Pause => &self.pause,
            ActionKind::End => &self.end,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionKind, &Path)> {
        [ActionKind::Begin, ActionKind::Pause, ActionKind::End]
            .into_iter()
            .map(move |kind| (kind, self.path(kind)))
    }
}

impl Default for ActionPaths {
    fn default() -> Self {
        Self {
            begin: PathBuf::from(DEFAULT_BEGIN_SCRIPT),
            pause: PathBuf::from(DEFAULT_PAUSE_SCRIPT),
            end: PathBuf::from(DEFAULT_END_SCRIPT),
        }
    }
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    actions: ActionPaths,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(actions: ActionPaths) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &ActionPaths {
        &self.actions
    }

    pub fn into_actions(self) -> ActionPaths {
        self.actions
    }
}
