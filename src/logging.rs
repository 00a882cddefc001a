//! JSON line-delimited operation logging.
//!
//! Each record is one JSON object per line:
//! `{"ts_ms": ..., "operation": "...", "data": {...}}`.
//! Logging stays disabled until [`init`] names a target file, so the analysis
//! functions have no side effects unless a caller opts in.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::json;

static LOG_TARGET: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Route subsequent [`log_operation`] calls to `path`, creating parent
/// directories as needed.
pub fn init<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let path = path.as_ref().to_path_buf();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    *lock_target()? = Some(path);
    Ok(())
}

/// Stop writing records.
pub fn disable() {
    if let Ok(mut target) = LOG_TARGET.lock() {
        *target = None;
    }
}

pub fn is_enabled() -> bool {
    LOG_TARGET
        .lock()
        .map(|target| target.is_some())
        .unwrap_or(false)
}

/// Append a record for `operation` to the configured log file.
///
/// A no-op returning `Ok(())` when logging has not been initialised.
pub fn log_operation<T: Serialize>(operation: &str, data: &T) -> io::Result<()> {
    let target = lock_target()?.clone();
    match target {
        Some(path) => append_record(&path, operation, data),
        None => Ok(()),
    }
}

/// Append a single record to `path` regardless of the global target.
pub fn append_record<T: Serialize>(path: &Path, operation: &str, data: &T) -> io::Result<()> {
    let ts_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let record = json!({
        "ts_ms": ts_ms,
        "operation": operation,
        "data": data,
    });
    let mut line = serde_json::to_string(&record).map_err(io::Error::other)?;
    line.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())
}

fn lock_target() -> io::Result<std::sync::MutexGuard<'static, Option<PathBuf>>> {
    LOG_TARGET
        .lock()
        .map_err(|_| io::Error::other("log target lock poisoned"))
}

/// Log and swallow failures; analysis results never depend on the log.
pub(crate) fn record<T: Serialize>(operation: &str, data: &T) {
    if let Err(err) = log_operation(operation, data) {
        eprintln!("failed to log {operation}: {err}");
    }
}
