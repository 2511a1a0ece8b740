//! The binary entry point for the starfield background.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.

use clap::Parser;
use starfield_app::PlatformDirs;
use starfield_config::{CliArgs, Config};
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve_with_override(args.config.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to resolve platform directories: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create platform directories: {e}");
    }

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    starfield_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(config_dir = %dirs.config_dir.display(), "Starting starfield background");

    if let Err(e) = starfield_app::run_with_config(config) {
        error!("Event loop failed: {e}");
        std::process::exit(1);
    }
}
