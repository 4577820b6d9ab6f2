use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Overrides the configured level, e.g. `PARASYS_LOG=debug`.
pub const LOG_ENV: &str = "PARASYS_LOG";

pub fn default_log_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|p| p.join("parasys").join("parasys.log"))
}

/// Installs a file-backed subscriber; the terminal itself belongs to the
/// frame renderer. Returns the log path, or `None` when logging is off.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    if !config.enabled {
        return Ok(None);
    }
    let Some(path) = config.file.clone().or_else(default_log_path) else {
        return Ok(None);
    };

    ensure_parent_dir(&path)?;
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter_for(&config.level)?)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(Some(path))
}

fn filter_for(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(level)?),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
