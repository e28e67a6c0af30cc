//! Engine logging for Umbra3D
//!
//! All engine diagnostics (configuration warnings from the render passes,
//! fatal device errors with their call context) go through this module:
//! - a replaceable `Logger` installed on `Engine`
//! - five severities, from Trace to Error
//! - colored console output by default, with local timestamps
//! - file:line attached to ERROR entries

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Sink for engine log entries
///
/// Install a custom implementation with `Engine::set_logger` to capture
/// warnings in tests or forward them to an in-game console.
///
/// # Example
///
/// ```no_run
/// use umbra_3d_engine::umbra3d::log::{Logger, LogEntry, LogSeverity};
///
/// struct WarningCounter(std::sync::atomic::AtomicUsize);
///
/// impl Logger for WarningCounter {
///     fn log(&self, entry: &LogEntry) {
///         if entry.severity == LogSeverity::Warn {
///             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
///         }
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Handle one log entry
    fn log(&self, entry: &LogEntry);
}

/// A single log record
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Time the entry was created
    pub timestamp: SystemTime,

    /// Emitting component (e.g. "umbra3d::ShadowPass")
    pub source: String,

    /// Formatted message
    pub message: String,

    /// Source file (ERROR entries only)
    pub file: Option<&'static str>,

    /// Source line (ERROR entries only)
    pub line: Option<u32>,
}

/// Log severity levels, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-draw tracing
    Trace,

    /// Per-frame diagnostics
    Debug,

    /// Lifecycle events (renderer created, shadow target allocated)
    Info,

    /// Recoverable configuration problems
    Warn,

    /// Fatal failures, reported with file:line
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by the default logger
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// Format an entry without colors: `[timestamp] [SEVERITY] [source] message (file:line)`
pub fn format_entry(entry: &LogEntry) -> String {
    let datetime: DateTime<Local> = entry.timestamp.into();
    let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");

    match (entry.file, entry.line) {
        (Some(file), Some(line)) => format!(
            "[{}] [{}] [{}] {} ({}:{})",
            timestamp,
            entry.severity.label(),
            entry.source,
            entry.message,
            file,
            line
        ),
        _ => format!(
            "[{}] [{}] [{}] {}",
            timestamp,
            entry.severity.label(),
            entry.source,
            entry.message
        ),
    }
}

/// Console logger with colored severities
///
/// Trace is dimmed, Debug cyan, Info green, Warn yellow, Error bold red.
/// Warnings and errors go to stderr, everything else to stdout.
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity = match entry.severity {
            LogSeverity::Trace => entry.severity.label().bright_black(),
            LogSeverity::Debug => entry.severity.label().cyan(),
            LogSeverity::Info => entry.severity.label().green(),
            LogSeverity::Warn => entry.severity.label().yellow(),
            LogSeverity::Error => entry.severity.label().red().bold(),
        };
        let source = entry.source.bright_blue();

        let line = match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity, source, entry.message, file, line
            ),
            _ => format!("[{}] [{}] [{}] {}", timestamp, severity, source, entry.message),
        };

        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
///
/// ```no_run
/// # use umbra_3d_engine::engine_trace;
/// engine_trace!("umbra3d::ForwardPass", "drawing entry {}", 3);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::umbra3d::Engine::log(
            $crate::umbra3d::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::umbra3d::Engine::log(
            $crate::umbra3d::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::umbra3d::Engine::log(
            $crate::umbra3d::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
///
/// ```no_run
/// # use umbra_3d_engine::engine_warn;
/// engine_warn!("umbra3d::ForwardPass", "node '{}' has no shading component", "crate");
/// ```
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::umbra3d::Engine::log(
            $crate::umbra3d::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::umbra3d::Engine::log_detailed(
            $crate::umbra3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
