//! Centralized game logger with verbosity levels and in-memory capture
//!
//! All engine diagnostics (dropped actions, rejected attacks, actions that
//! failed their own checks) flow through this logger. Tests switch it to
//! [`OutputMode::Memory`] and inspect the captured entries.

use crate::game::VerbosityLevel;
use bumpalo::Bump;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::fmt::{self, Write as FmtWrite};
use std::ops::Deref;

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// Subsystem a log line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Queue,
    Action,
    Effect,
    Combat,
    Weather,
    Turn,
}

/// A captured log entry
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    pub category: Option<LogCategory>,
}

/// Guard type that provides read-only access to captured log entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl LogGuard<'_> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }

    /// Count entries from `category` whose message contains `needle`
    pub fn count_matching(&self, category: LogCategory, needle: &str) -> usize {
        self.guard
            .iter()
            .filter(|e| e.category == Some(category) && e.message.contains(needle))
            .count()
    }
}

impl Deref for LogGuard<'_> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Game logger
///
/// Formatting through the `*_fmt` methods goes into a bump arena that is
/// reset after every message, so disabled or captured messages do not churn
/// the global allocator.
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,

    format_bump: RefCell<Bump>,

    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            format_bump: RefCell::new(Bump::new()),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to memory only (suppresses stdout)
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn disable_capture(&mut self) {
        self.output_mode = OutputMode::Stdout;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    /// Print buffered entries allowed by the current verbosity, then clear
    pub fn flush_buffer(&mut self) {
        let buffer = self.log_buffer.borrow();
        for entry in buffer.iter() {
            if entry.level <= self.verbosity {
                self.write_stdout(entry);
            }
        }
        drop(buffer);
        self.clear_logs();
    }

    /// Access captured log entries without copying
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
        self.format_bump.borrow_mut().reset();
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    fn write_stdout(&self, entry: &LogEntry) {
        match self.output_format {
            OutputFormat::Text => {
                if entry.level == VerbosityLevel::Minimal {
                    println!("{}", entry.message);
                } else {
                    println!("  {}", entry.message);
                }
            }
            OutputFormat::Json => {
                if let Ok(line) = serde_json::to_string(entry) {
                    println!("{line}");
                }
            }
        }
    }

    /// Whether a message at `level` would be printed or captured
    #[inline]
    pub fn enabled(&self, level: VerbosityLevel) -> bool {
        level != VerbosityLevel::Silent && (level <= self.verbosity || self.is_capturing())
    }

    /// Log a message at `level`, optionally tagged with a category
    pub fn log(&self, level: VerbosityLevel, category: Option<LogCategory>, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let entry = LogEntry {
            level,
            message: message.to_string(),
            category,
        };
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);
        if should_output && level <= self.verbosity {
            self.write_stdout(&entry);
        }
        if self.is_capturing() {
            self.log_buffer.borrow_mut().push(entry);
        }
    }

    /// Format into the bump arena and log; skipped entirely when disabled
    pub fn log_fmt(&self, level: VerbosityLevel, category: Option<LogCategory>, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let mut bump = self.format_bump.borrow_mut();
        {
            let mut text = bumpalo::collections::String::new_in(&*bump);
            if text.write_fmt(args).is_ok() {
                self.log(level, category, text.as_str());
            }
        }
        bump.reset();
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, None, message);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, None, message);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, None, message);
    }

    /// Normal-level message for a caller error or rejected action
    #[inline]
    pub fn warn(&self, category: LogCategory, args: fmt::Arguments<'_>) {
        self.log_fmt(VerbosityLevel::Normal, Some(category), args);
    }

    /// Verbose-level trace line
    #[inline]
    pub fn trace(&self, category: LogCategory, args: fmt::Arguments<'_>) {
        self.log_fmt(VerbosityLevel::Verbose, Some(category), args);
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

impl Clone for GameLogger {
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            output_format: self.output_format,
            output_mode: self.output_mode,
            format_bump: RefCell::new(Bump::new()),
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}

// Only the configuration is persisted, never the captured entries.
impl Serialize for GameLogger {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("GameLogger", 3)?;
        state.serialize_field("verbosity", &self.verbosity)?;
        state.serialize_field("output_format", &self.output_format)?;
        state.serialize_field("output_mode", &self.output_mode)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for GameLogger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct GameLoggerData {
            verbosity: VerbosityLevel,
            output_format: OutputFormat,
            output_mode: OutputMode,
        }

        let data = GameLoggerData::deserialize(deserializer)?;
        let mut logger = GameLogger::with_verbosity(data.verbosity);
        logger.output_format = data.output_format;
        logger.output_mode = data.output_mode;
        Ok(logger)
    }
}
