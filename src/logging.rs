//! Logging setup.
//!
//! The terminal is owned by the game while it runs, so log records go to a
//! file instead of stderr.

use std::fs::File;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use env_logger::{Builder, Env, Target};

use crate::config::Config;

/// Routes `log` output into the configured file. `RUST_LOG` overrides the level.
pub fn init(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .wrap_err_with(|| format!("failed to create log file {}", config.log_file))?;

    Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .wrap_err("failed to initialise logger")?;

    log::info!("Logging to {} at level {}", config.log_file, config.log_level);
    Ok(())
}
