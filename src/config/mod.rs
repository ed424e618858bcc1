// src/config/mod.rs

//! Configuration loading and validation for pomobutton.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and layer CLI flags over it (`loader.rs`).
//! - Validate the resolved action paths (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, resolve};
pub use model::{
    ActionPaths, ConfigFile, RawActionsSection, RawConfigFile, DEFAULT_BEGIN_SCRIPT,
    DEFAULT_END_SCRIPT, DEFAULT_PAUSE_SCRIPT,
};
pub use validate::warn_missing_scripts;
