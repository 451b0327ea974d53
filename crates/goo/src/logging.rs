//! File logging, enabled by the `GOO_LOG` environment variable.
//!
//! The terminal belongs to the UI, so log lines go to `goo.log` in the data
//! directory. The variable's value is an env-filter directive such as
//! `debug` or `goo_sim=trace`.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::{WrapErr, eyre};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GOO_LOG";
const LOG_FILE: &str = "goo.log";

/// Install the subscriber if `GOO_LOG` is set. Returns the log file path.
pub fn init() -> color_eyre::Result<Option<PathBuf>> {
    let Ok(directives) = std::env::var(LOG_ENV) else {
        return Ok(None);
    };

    let dir = goo_config::project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir);
    fs::create_dir_all(&dir)
        .wrap_err_with(|| format!("failed to create log directory {}", dir.display()))?;

    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_new(&directives)
        .wrap_err_with(|| format!("invalid {LOG_ENV} value {directives:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!(e))?;

    Ok(Some(path))
}
