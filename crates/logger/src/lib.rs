//! Logging infrastructure for glidenav.
//!
//! A small global logger with optional file output and an in-memory
//! ring of recent entries that the reader shows in its status bar.
//! Messages logged before [`init`] are dropped, so library code can log
//! unconditionally.

use chrono::Local;
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// Log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Timestamp in HH:MM:SS format
    pub timestamp: String,
    /// Message level
    pub level: LogLevel,
    /// Message text
    pub message: String,
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert log level to string
    pub fn to_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

#[derive(Debug)]
struct Logger {
    /// Recent entries (last N messages)
    entries: VecDeque<LogEntry>,
    max_entries: usize,
    min_level: LogLevel,
    /// Log file path; memory only when `None`
    file_path: Option<PathBuf>,
}

impl Logger {
    fn new(file_path: Option<PathBuf>, max_entries: usize, min_level: LogLevel) -> Self {
        if let Some(path) = &file_path {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }

            // Clear log file on startup
            if let Ok(mut file) = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
            {
                let _ = writeln!(file, "=== glidenav log start ===");
            }
        }

        Self {
            entries: VecDeque::new(),
            max_entries,
            min_level,
            file_path,
        }
    }

    fn add_entry(&mut self, level: LogLevel, message: String) {
        if level < self.min_level {
            return;
        }

        let timestamp = Local::now().format("%H:%M:%S").to_string();

        // Write to file (create if deleted)
        if let Some(path) = &self.file_path {
            if let Ok(mut file) = OpenOptions::new().append(true).create(true).open(path) {
                let _ = writeln!(file, "[{}] {}: {}", timestamp, level.to_str(), message);
            }
        }

        self.entries.push_back(LogEntry {
            timestamp,
            level,
            message,
        });
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    fn last_at_least(&self, level: LogLevel) -> Option<LogEntry> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.level >= level)
            .cloned()
    }
}

/// Global logger instance that persists for the application lifetime.
static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

/// Run `f` against the global logger if it has been initialized.
fn with_logger<T>(f: impl FnOnce(&mut Logger) -> T) -> Option<T> {
    let mut logger = LOGGER.get()?.lock().ok()?;
    Some(f(&mut *logger))
}

/// Initialize the global logger
///
/// Subsequent calls are ignored.
///
/// # Arguments
///
/// * `file_path` - Path to the log file, or `None` to keep entries in memory only
/// * `max_entries` - Maximum number of log entries to keep in memory
/// * `min_level` - Minimum log level to record (Debug, Info, Warn, Error)
pub fn init(file_path: Option<PathBuf>, max_entries: usize, min_level: LogLevel) {
    LOGGER.get_or_init(|| Mutex::new(Logger::new(file_path, max_entries, min_level)));
}

/// Log a debug message
pub fn debug(message: impl Into<String>) {
    with_logger(|logger| logger.add_entry(LogLevel::Debug, message.into()));
}

/// Log an informational message
pub fn info(message: impl Into<String>) {
    with_logger(|logger| logger.add_entry(LogLevel::Info, message.into()));
}

/// Log a warning message
pub fn warn(message: impl Into<String>) {
    with_logger(|logger| logger.add_entry(LogLevel::Warn, message.into()));
}

/// Log an error message
pub fn error(message: impl Into<String>) {
    with_logger(|logger| logger.add_entry(LogLevel::Error, message.into()));
}

/// Most recent warning or error, for the status bar.
pub fn last_warning() -> Option<LogEntry> {
    with_logger(|logger| logger.last_at_least(LogLevel::Warn)).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("Error".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_min_level_filters_entries() {
        let mut logger = Logger::new(None, 10, LogLevel::Info);
        logger.add_entry(LogLevel::Debug, "hidden".to_string());
        logger.add_entry(LogLevel::Info, "shown".to_string());

        let entries = &logger.entries;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "shown");
    }

    #[test]
    fn test_entries_are_capped() {
        let mut logger = Logger::new(None, 3, LogLevel::Debug);
        for i in 0..5 {
            logger.add_entry(LogLevel::Info, format!("entry {}", i));
        }

        let messages: Vec<_> = logger
            .entries
            .iter()
            .map(|entry| entry.message.as_str())
            .collect();
        assert_eq!(messages, vec!["entry 2", "entry 3", "entry 4"]);
    }

    #[test]
    fn test_last_warning_skips_info() {
        let mut logger = Logger::new(None, 10, LogLevel::Debug);
        logger.add_entry(LogLevel::Warn, "container missing".to_string());
        logger.add_entry(LogLevel::Info, "chapter loaded".to_string());

        let last = logger.last_at_least(LogLevel::Warn).unwrap();
        assert_eq!(last.message, "container missing");
        assert_eq!(last.level, LogLevel::Warn);
    }

    #[test]
    fn test_file_output() {
        let dir = std::env::temp_dir().join(format!("glidenav-logger-{}", std::process::id()));
        let path = dir.join("test.log");

        let mut logger = Logger::new(Some(path.clone()), 10, LogLevel::Debug);
        logger.add_entry(LogLevel::Warn, "written".to_string());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("=== glidenav log start ==="));
        assert!(content.contains("WARN: written"));

        let _ = fs::remove_dir_all(dir);
    }
}
