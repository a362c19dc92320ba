// Hide console window on Windows release builds
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use anyhow::Result;
use std::sync::Arc;
use tokio::runtime::Runtime;
use webdesk::app::App;
use webdesk::cli;
use webdesk::config::Config;
use webdesk::single_instance::{InstanceLock, SecondInstanceMessage};

fn main() -> Result<()> {
    // Process CLI arguments first (before logging init for cleaner output)
    let runtime_options = match cli::process_cli() {
        cli::CliResult::Exit(code) => {
            if code == 0 {
                return Ok(());
            }
            std::process::exit(code);
        }
        cli::CliResult::Continue(options) => options,
    };
    // CLI --log-level flag takes highest precedence, then RUST_LOG, then config (applied below).
    webdesk::debug::init_log_bridge(runtime_options.log_level);

    log::info!("Starting webdesk {}", webdesk::VERSION);

    let config = Config::load()?;
    webdesk::debug::apply_config_log_level(config.log_level);

    let message = SecondInstanceMessage::from_args(runtime_options.args.clone());
    let instance = match InstanceLock::acquire(&Config::config_dir(), &message) {
        Ok(InstanceLock::Secondary) => {
            log::info!("Another instance is running, exiting");
            return Ok(());
        }
        Ok(InstanceLock::Primary(instance)) => Some(instance),
        Err(e) => {
            log::warn!("Single-instance check failed, continuing without it: {}", e);
            None
        }
    };

    // Tokio runtime for the single-instance listener
    let runtime = Arc::new(Runtime::new()?);

    let app = App::new(config, Arc::clone(&runtime), runtime_options, instance);
    let result = app.run();

    // Drop the runtime explicitly so Tokio can shut down its worker threads
    // before main returns.
    log::info!("Event loop exited, shutting down runtime");
    if let Ok(rt) = Arc::try_unwrap(runtime) {
        rt.shutdown_timeout(std::time::Duration::from_secs(2));
    }

    if let Err(ref e) = result {
        eprintln!("webdesk: error: {e:#}");
    }
    result
}
