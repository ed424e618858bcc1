// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod input;
pub mod logging;
pub mod types;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, RawActionsSection};
use crate::engine::{Runtime, RuntimeOptions, StateMachine};
use crate::errors::Result;
use crate::exec::{Completion, RealProcessRunner};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI flags, optional TOML file, defaults)
/// - the input device reader
/// - the process runner
/// - the state machine and its runtime
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = config::resolve(args.config.as_deref(), cli_overrides(&args))?;

    if args.dry_run {
        print_dry_run(&args, &cfg);
        return Ok(());
    }

    config::warn_missing_scripts(&cfg);

    let device = input::open_device(&args.device)?;
    input::log_pressed_keys(&device);
    let (button_rx, _reader) = input::spawn_reader(device, input::BUTTON_CHANNEL_CAPACITY)?;

    let (completion_tx, completion_rx) = mpsc::channel::<Completion>(16);
    let runner = RealProcessRunner::new(completion_tx);

    // Ctrl-C → graceful shutdown.
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = shutdown_tx.send(()).await;
    });

    let machine = StateMachine::new(cfg.into_actions(), runner);
    let runtime = Runtime::new(
        machine,
        button_rx,
        completion_rx,
        shutdown_rx,
        RuntimeOptions::default(),
    );

    let machine = runtime.run().await;
    info!(
        state = machine.state().name(),
        accumulated = machine.session().accumulated(),
        "pomobutton stopped"
    );
    Ok(())
}

/// The `--begin/--pause/--end` flags as the top config layer.
fn cli_overrides(args: &CliArgs) -> RawActionsSection {
    RawActionsSection {
        begin: args.begin.clone(),
        pause: args.pause.clone(),
        end: args.end.clone(),
    }
}

/// Simple dry-run output: print the device and the resolved actions.
fn print_dry_run(args: &CliArgs, cfg: &ConfigFile) {
    println!("pomobutton dry-run");
    println!("  device = {}", args.device.display());
    if let Some(ref path) = args.config {
        println!("  config = {}", path.display());
    }
    println!();

    println!("actions:");
    for (kind, path) in cfg.actions().iter() {
        println!("  - {kind}: {}", path.display());
    }

    debug!("dry-run complete (no device opened)");
}
