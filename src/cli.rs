// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pomobutton`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pomobutton",
    version,
    about = "Drive a begin/pause/end work timer from a hardware button.",
    long_about = None
)]
pub struct CliArgs {
    /// Input device node to read button events from (e.g. /dev/input/event0).
    #[arg(value_name = "DEVICE")]
    pub device: PathBuf,

    /// Script launched when a work segment starts. Receives the elapsed seconds.
    ///
    /// Default: `/home/pi/begin`, unless set in the config file.
    #[arg(long, value_name = "PATH")]
    pub begin: Option<PathBuf>,

    /// Script launched when the timer is paused.
    ///
    /// Default: `/home/pi/pause`, unless set in the config file.
    #[arg(long, value_name = "PATH")]
    pub pause: Option<PathBuf>,

    /// Script launched when a work segment finishes. Receives the elapsed seconds.
    ///
    /// Default: `/home/pi/end`, unless set in the config file.
    #[arg(long, value_name = "PATH")]
    pub end: Option<PathBuf>,

    /// Optional TOML file with an `[actions]` section.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POMOBUTTON_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print the action scripts, but don't open the device.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
