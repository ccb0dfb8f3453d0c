//! File logging for switchboard runs.
//!
//! Log levels:
//! - ERROR: Failures that reach the outer boundary (decomposition, server)
//! - WARN: Dispatch faults caught at the registry boundary
//! - INFO: Run start/finish, server lifecycle
//! - DEBUG: Each dispatch and its outcome
//! - TRACE: Shared memory writes and raw payloads
//!
//! Debug mode can be enabled with `--debug` flag or `SWITCHBOARD_DEBUG=1` env var.
//!
//! Lines that belong to a run carry a `[run xxxxxxxx]` tag (see
//! `sblog_run!`) so interleaved runs from the server can be told apart.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::OnceLock;

static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

/// Log levels for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Initialize logging to ~/.switchboard/switchboard.log.
///
/// `debug` or `SWITCHBOARD_DEBUG` raises the level to DEBUG.
pub fn init_with_debug(debug: bool) {
    let env_debug = std::env::var("SWITCHBOARD_DEBUG")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);

    let debug_enabled = debug || env_debug;
    DEBUG_ENABLED.store(debug_enabled, Ordering::SeqCst);

    let level = if debug_enabled {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);

    if let Some(dir) = dirs::home_dir().map(|h| h.join(".switchboard")) {
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("switchboard.log");
        // Truncate on startup
        let _ = std::fs::write(&path, "");
        LOG_PATH.set(path).ok();
    }
}

/// Check if debug mode is enabled.
pub fn is_debug() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Get the current log level.
pub fn get_level() -> LogLevel {
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Log a message at the specified level.
///
/// Messages are dropped silently until `init_with_debug` has resolved a log path.
pub fn log_at(level: LogLevel, msg: &str) {
    if level > get_level() {
        return;
    }

    if let Some(path) = LOG_PATH.get() {
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let timestamp = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
            let _ = writeln!(file, "{}", format_line(&timestamp, level, msg));
        }
    }
}

fn format_line(timestamp: &str, level: LogLevel, msg: &str) -> String {
    format!("[{}] [{}] {}", timestamp, level.as_str(), msg)
}

/// Tag for lines belonging to one run: the first 8 characters of its id.
pub fn run_tag(run_id: &str) -> String {
    let short: String = run_id.chars().take(8).collect();
    format!("[run {}]", short)
}

pub fn error(msg: &str) {
    log_at(LogLevel::Error, msg);
}

pub fn warn(msg: &str) {
    log_at(LogLevel::Warn, msg);
}

pub fn info(msg: &str) {
    log_at(LogLevel::Info, msg);
}

pub fn debug(msg: &str) {
    log_at(LogLevel::Debug, msg);
}

pub fn trace(msg: &str) {
    log_at(LogLevel::Trace, msg);
}

/// Log macro for INFO level.
#[macro_export]
macro_rules! sblog {
    ($($arg:tt)*) => {
        $crate::log::info(&format!($($arg)*))
    };
}

/// Log macro for ERROR level.
#[macro_export]
macro_rules! sblog_error {
    ($($arg:tt)*) => {
        $crate::log::error(&format!($($arg)*))
    };
}

/// Log macro for WARN level.
#[macro_export]
macro_rules! sblog_warn {
    ($($arg:tt)*) => {
        $crate::log::warn(&format!($($arg)*))
    };
}

/// Log macro for DEBUG level (only logs when debug mode is enabled).
#[macro_export]
macro_rules! sblog_debug {
    ($($arg:tt)*) => {
        $crate::log::debug(&format!($($arg)*))
    };
}

/// Log macro for TRACE level.
#[macro_export]
macro_rules! sblog_trace {
    ($($arg:tt)*) => {
        $crate::log::trace(&format!($($arg)*))
    };
}

/// Log macro for INFO level, tagged with a run id.
#[macro_export]
macro_rules! sblog_run {
    ($run_id:expr, $($arg:tt)*) => {
        $crate::log::info(&format!("{} {}", $crate::log::run_tag(&$run_id), format!($($arg)*)))
    };
}

/// Log macro for DEBUG level, tagged with a run id.
#[macro_export]
macro_rules! sblog_run_debug {
    ($run_id:expr, $($arg:tt)*) => {
        $crate::log::debug(&format!("{} {}", $crate::log::run_tag(&$run_id), format!($($arg)*)))
    };
}
