/// Umbra3D Engine - global logger registry
///
/// Renderers, passes and backends are owned by the host; the only process-wide
/// state is the logger every `engine_*!` macro writes through.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Engine-wide services
///
/// # Example
///
/// ```no_run
/// use umbra_3d_engine::umbra3d::Engine;
/// use umbra_3d_engine::umbra3d::log::{Logger, LogEntry};
///
/// struct Silent;
/// impl Logger for Silent {
///     fn log(&self, _entry: &LogEntry) {}
/// }
///
/// Engine::set_logger(Silent);
/// // ... render frames without console output ...
/// Engine::reset_logger();
/// ```
pub struct Engine;

impl Engine {
    /// Replace the global logger
    ///
    /// A poisoned logger lock leaves the current logger in place.
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Log without source location
    ///
    /// Used by engine_trace!, engine_debug!, engine_info! and engine_warn!.
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level
    /// * `source` - Emitting component (e.g., "umbra3d::Renderer")
    /// * `message` - Log message
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Log with file:line information
    ///
    /// Used by engine_error! (and therefore engine_err!/engine_bail!).
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
