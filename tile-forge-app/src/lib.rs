//! Tile Forge application library.
//!
//! Command-line configuration, logging setup, progress reporting and output
//! writers around the `wfc-core` solver.

pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod setup;

pub use config::AppConfig;
pub use error::AppError;

use clap::Parser;

/// Parses the command line, initializes logging and runs a solve.
///
/// # Errors
///
/// Returns any error raised while loading settings or rules, solving, or
/// writing the output.
pub fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    logging::init_logger(&config);

    log::info!("Tile Forge starting");
    log::debug!("Loaded config: {:?}", config);

    setup::execution::run_standard_mode(&config)?;
    Ok(())
}
