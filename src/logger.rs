use std::sync::atomic::{AtomicU8, Ordering};

// Bitflags for log levels
pub const LOG_LEVEL_ERROR: u8 = 1;
pub const LOG_LEVEL_WARN: u8 = 2;
pub const LOG_LEVEL_INFO: u8 = 4;
pub const LOG_LEVEL_TRACE: u8 = 8;

pub const LOG_LEVEL_NONE: u8 = 0;
pub const LOG_LEVEL_ALL: u8 = LOG_LEVEL_ERROR | LOG_LEVEL_WARN | LOG_LEVEL_INFO | LOG_LEVEL_TRACE;
pub const LOG_LEVEL_DEFAULT: u8 = LOG_LEVEL_ERROR | LOG_LEVEL_WARN;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error = 1,
    Warning = 2,
    Info = 4,
    Trace = 8,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Parses the names accepted in `OLEBIND_LOG` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warning),
            "info" => Some(LogLevel::Info),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

// Global state. The mask gates events before they reach the tracing
// dispatcher, so a host subscriber only sees what the binding layer enabled.
pub static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(LOG_LEVEL_DEFAULT);

/// Set the global log level mask
pub fn set_log_level(mask: u8) {
    GLOBAL_LOG_LEVEL.store(mask & LOG_LEVEL_ALL, Ordering::Relaxed);
}

pub fn log_level() -> u8 {
    GLOBAL_LOG_LEVEL.load(Ordering::Relaxed)
}

#[inline]
pub fn is_enabled(level: LogLevel) -> bool {
    log_level() & (level as u8) != 0
}

/// Internal function to log a message if level is enabled
pub fn log_internal(level: LogLevel, msg: std::fmt::Arguments<'_>) {
    if !is_enabled(level) {
        return;
    }
    match level {
        LogLevel::Error => tracing::error!(target: "olebind", "{}", msg),
        LogLevel::Warning => tracing::warn!(target: "olebind", "{}", msg),
        LogLevel::Info => tracing::info!(target: "olebind", "{}", msg),
        LogLevel::Trace => tracing::trace!(target: "olebind", "{}", msg),
    }
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logger::log_internal($crate::logger::LogLevel::Error, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::log_internal($crate::logger::LogLevel::Warning, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::log_internal($crate::logger::LogLevel::Info, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::logger::log_internal($crate::logger::LogLevel::Trace, format_args!($($arg)*))
    };
}
