//! File logging
//!
//! The terminal belongs to the reader, so log output goes to a file only.
//! Filtering follows `RSVP_LOG` (e.g. `RSVP_LOG=rsvp_reader=debug`), defaulting to `info`.

use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_ENV: &str = "RSVP_LOG";
pub const LOG_FILE_NAME: &str = "rsvp-reader.log";

/// `<data_local_dir>/rsvp-reader/rsvp-reader.log`, or the temp dir when there is no data dir.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("rsvp-reader"))
        .unwrap_or_else(std::env::temp_dir)
        .join(LOG_FILE_NAME)
}

/// Installs the global subscriber. The returned guard must live until exit so
/// buffered lines get flushed.
pub fn init(path: &Path) -> io::Result<WorkerGuard> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?;
    std::fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::never(&dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::Layer::default()
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .map_err(|err| io::Error::new(io::ErrorKind::AlreadyExists, err))?;

    Ok(guard)
}
