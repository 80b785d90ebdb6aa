//! Logging with colored module prefixes.
//!
//! This module provides:
//! - `Logger`, an explicit logging capability handed to the asset map and
//!   the hasher (there is no global logger)
//! - `log!`, `debug!` and `error!` macros for formatted output at a level
//!
//! # Example
//!
//! ```ignore
//! let logger = Logger::new(Level::Info, Sink::Stdout);
//! log!(logger, "cp"; "'{}' '{}'", src.display(), dst.display());
//! debug!(logger, "map"; "basedir is {}", basedir);
//! ```

use owo_colors::{OwoColorize, Stream};
#[cfg(test)]
use parking_lot::Mutex;
use std::io::{Write, stderr, stdout};
#[cfg(test)]
use std::sync::Arc;

/// Severity of a log line. Ordered from least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Level {
    /// Only errors (`--quiet`).
    Error,
    /// Filesystem actions: `cp`, `rm`, `mkdir` (default).
    #[default]
    Info,
    /// Discovery traces and skip decisions (`-vv`).
    Debug,
}

impl Level {
    /// Map command-line flags to a level: `--quiet` wins, a single `-v` is
    /// the default and `-vv` or more means debug.
    pub const fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            Self::Error
        } else if verbose >= 2 {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone)]
pub enum Sink {
    Stdout,
    /// Used when the map itself is written to stdout.
    Stderr,
    /// Uncolored lines collected in memory.
    #[cfg(test)]
    Memory(Arc<Mutex<Vec<String>>>),
}

/// Logging capability with a level fixed at construction.
#[derive(Debug, Clone)]
pub struct Logger {
    level: Level,
    sink: Sink,
}

// ============================================================================
// Log Macros
// ============================================================================

/// Log an info message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!(logger, "module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $module:expr; $($arg:tt)*) => {{
        let logger: &$crate::logger::Logger = &$logger;
        if logger.enabled($crate::logger::Level::Info) {
            logger.write($crate::logger::Level::Info, $module, &format!($($arg)*))
        }
    }};
}

/// Log a debug message (only shown with `-vv`)
#[macro_export]
macro_rules! debug {
    ($logger:expr, $module:expr; $($arg:tt)*) => {{
        let logger: &$crate::logger::Logger = &$logger;
        if logger.enabled($crate::logger::Level::Debug) {
            logger.write($crate::logger::Level::Debug, $module, &format!($($arg)*))
        }
    }};
}

/// Log an error message (shown even with `--quiet`)
#[macro_export]
macro_rules! error {
    ($logger:expr, $module:expr; $($arg:tt)*) => {{
        let logger: &$crate::logger::Logger = &$logger;
        logger.write($crate::logger::Level::Error, $module, &format!($($arg)*))
    }};
}

impl Logger {
    pub const fn new(level: Level, sink: Sink) -> Self {
        Self { level, sink }
    }

    /// In-memory logger plus a handle to the collected lines.
    #[cfg(test)]
    pub fn memory(level: Level) -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        (Self::new(level, Sink::Memory(Arc::clone(&lines))), lines)
    }

    /// Check whether a message at `level` would be emitted.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    /// Emit one line. Prefer the macros, which skip formatting when disabled.
    pub fn write(&self, level: Level, module: &str, message: &str) {
        if !self.enabled(level) {
            return;
        }

        match &self.sink {
            Sink::Stdout => {
                let prefix = colorize_prefix(module, level, Stream::Stdout);
                let mut out = stdout().lock();
                writeln!(out, "{prefix} {message}").ok();
                out.flush().ok();
            }
            Sink::Stderr => {
                let prefix = colorize_prefix(module, level, Stream::Stderr);
                let mut out = stderr().lock();
                writeln!(out, "{prefix} {message}").ok();
            }
            #[cfg(test)]
            Sink::Memory(lines) => lines.lock().push(format!("[{module}] {message}")),
        }
    }
}

/// Apply color to a module prefix based on level and module type
#[inline]
fn colorize_prefix(module: &str, level: Level, stream: Stream) -> String {
    let prefix = format!("[{module}]");
    match (level, module) {
        (Level::Error, _) => prefix.if_supports_color(stream, |p| p.bright_red().bold().to_string()).to_string(),
        (Level::Debug, _) => prefix.if_supports_color(stream, |p| p.dimmed().to_string()).to_string(),
        (_, "rm") => prefix.if_supports_color(stream, |p| p.bright_magenta().bold().to_string()).to_string(),
        (_, "cp") => prefix.if_supports_color(stream, |p| p.bright_green().bold().to_string()).to_string(),
        _ => prefix.if_supports_color(stream, |p| p.bright_yellow().bold().to_string()).to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_flags() {
        assert_eq!(Level::from_flags(0, false), Level::Info);
        assert_eq!(Level::from_flags(1, false), Level::Info);
        assert_eq!(Level::from_flags(2, false), Level::Debug);
        assert_eq!(Level::from_flags(3, false), Level::Debug);
        assert_eq!(Level::from_flags(2, true), Level::Error);
    }

    #[test]
    fn test_memory_sink_respects_level() {
        let (logger, lines) = Logger::memory(Level::Info);
        log!(logger, "cp"; "'{}' '{}'", "a.css", "out/x.css");
        debug!(logger, "map"; "hidden");
        error!(logger, "error"; "shown");

        let lines = lines.lock();
        assert_eq!(lines.as_slice(), ["[cp] 'a.css' 'out/x.css'", "[error] shown"]);
    }

    #[test]
    fn test_quiet_keeps_errors_only() {
        let (logger, lines) = Logger::memory(Level::Error);
        log!(logger, "rm"; "gone");
        error!(logger, "error"; "kept");
        assert_eq!(lines.lock().len(), 1);
    }
}
