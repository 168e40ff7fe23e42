//! Opt-in tracing subscriber for hosts that do not install their own.
//!
//! The engine only emits `tracing` events; nothing is recorded until a host
//! calls [`init`] or [`init_with`] (or sets up its own subscriber).

use std::path::PathBuf;

use color_eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

lazy_static::lazy_static! {
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Initialize logging to `datatable.log` in the working directory at WARN level.
pub fn init() -> Result<()> {
    init_with(None, None)
}

/// Initialize logging with a custom path and/or level.
///
/// `RUST_LOG` directives still apply on top of the default level.
pub fn init_with(custom_log_path: Option<PathBuf>, level: Option<tracing::Level>) -> Result<()> {
    let log_path = match custom_log_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            path
        }
        None => std::env::current_dir()?.join(LOG_FILE.as_str()),
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.unwrap_or(tracing::Level::WARN).into())
        .from_env_lossy();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::sync::Mutex::new(log_file))
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name() {
        assert_eq!(LOG_FILE.as_str(), "datatable.log");
    }

    #[test]
    fn test_init_with_creates_log_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("engine.log");

        // A second global subscriber is refused, but the file is opened before that.
        let _ = init_with(Some(path.clone()), Some(tracing::Level::DEBUG));
        assert!(path.exists());
    }
}
