//! Logger set-up.
//!
//! The terminal is in raw alternate-screen mode while the app runs, so log
//! lines only go to a file. Without one the logger is off unless `RUST_LOG`
//! asks for stderr output; `RUST_LOG` overrides the configured filter.

use std::fs::OpenOptions;
use std::io::Write;

use env_logger::{Builder, Env, Target};

use crate::config::{ConfigError, LogConfig, Result};

/// Filter used for a log file when neither `RUST_LOG` nor `[log] level` is
/// set.
pub const DEFAULT_FILE_FILTER: &str = "info";

/// Filter without a log file: stderr is the live screen.
pub const NO_FILE_FILTER: &str = "off";

/// The filter applied when `RUST_LOG` is unset. `[log] level` only applies
/// to a log file.
fn default_filter(config: &LogConfig) -> &str {
    match (&config.file, &config.level) {
        (Some(_), Some(level)) => level.as_str(),
        (Some(_), None) => DEFAULT_FILE_FILTER,
        (None, _) => NO_FILE_FILTER,
    }
}

fn builder(config: &LogConfig) -> Result<Builder> {
    let default_filter = default_filter(config);
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] {} - {}",
            buf.timestamp_millis(),
            record.level(),
            record.target(),
            record.args()
        )
    });
    if let Some(path) = &config.file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
        builder.target(Target::Pipe(Box::new(file)));
    } else {
        builder.target(Target::Stderr);
    }
    Ok(builder)
}

/// Install the global logger. Fails only when the log file cannot be
/// opened; a second call is ignored.
pub fn init(config: &LogConfig) -> Result<()> {
    builder(config)?.try_init().ok();
    Ok(())
}
