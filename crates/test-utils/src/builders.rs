#![allow(dead_code)]

use std::path::PathBuf;

use pomobutton::config::{ActionPaths, ConfigFile, RawActionsSection, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn begin(mut self, path: &str) -> Self {
        self.config.actions.begin = Some(PathBuf::from(path));
        self
    }

    pub fn pause(mut self, path: &str) -> Self {
        self.config.actions.pause = Some(PathBuf::from(path));
        self
    }

    pub fn end(mut self, path: &str) -> Self {
        self.config.actions.end = Some(PathBuf::from(path));
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn actions_section(self) -> RawActionsSection {
        self.config.actions
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Distinct, recognisable script paths for machine tests.
pub fn test_actions() -> ActionPaths {
    ConfigBuilder::new()
        .begin("/test/begin")
        .pause("/test/pause")
        .end("/test/end")
        .build()
        .into_actions()
}
