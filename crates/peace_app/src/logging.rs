//! Logging setup.  Everything else logs through the `log` macros.

use anyhow::{Context, Result};
use log::LevelFilter;

/// Environment variable that overrides the configured level.
pub const LEVEL_ENV: &str = "PEACE_LOG";

const TIME_FORMAT: &str = "%H:%M:%S";

/// Installs the global logger writing to stdout.  `PEACE_LOG` wins over
/// `level` when it holds a valid level name.
pub fn init(level: LevelFilter) -> Result<()> {
    let level = std::env::var(LEVEL_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(level);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format(TIME_FORMAT),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()
        .context("installing logger")?;
    Ok(())
}
