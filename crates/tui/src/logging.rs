use std::{fs::OpenOptions, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

/// Sends `tracing` output to the configured log file; the terminal belongs to
/// the UI. `RUST_LOG` wins over the configured level when set.
pub fn init(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let level = &config.log_level;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(format!(
                "ledgerlite={level},engine={level},suggest={level}"
            ))
        })
        .map_err(|err| AppError::Setting(format!("invalid log level {level}: {err}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| AppError::Setting(err.to_string()))?;
    Ok(())
}
