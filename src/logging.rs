use std::fs::File;

use anyhow::{Context, Result};
use simplelog::{Config, WriteLogger};

use crate::config::AppConfig;

/// Sends `log` records to the file named by `config.log_path`, truncating
/// whatever a previous run left there.
pub fn init(config: &AppConfig) -> Result<()> {
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log dir: {}", parent.display()))?;
    }
    let log_file = File::create(&config.log_path)
        .with_context(|| format!("failed to create log file: {}", config.log_path.display()))?;
    WriteLogger::init(config.log_level, Config::default(), log_file)
        .context("logger already initialized")?;
    log::info!("logging to {}", config.log_path.display());
    Ok(())
}
