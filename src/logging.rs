use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

/// Send `log` output to `log_file`. The terminal belongs to the TUI, so
/// nothing is written to stderr. Honors `RUST_LOG`, defaulting to `info`.
pub fn init_logging(log_file: &Path) -> Result<()> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }

    let target = Box::new(
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .context("failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(target))
        .try_init()
        .context("logger already initialized")?;

    info!("logging to {}", log_file.display());
    Ok(())
}
