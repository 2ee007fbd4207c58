//! Import log sinks
//!
//! Importers never write to a global logger. Each one receives an
//! [`ImportLog`] and records skip/abort reasons and per-sheet counts through
//! it. [`MemoryLog`] keeps entries for display and filtering, [`TracingLog`]
//! forwards them to `tracing`.

use crate::error::{ImportError, ImportResult};
use chrono::{DateTime, Local};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Compile case-insensitive exclusion patterns
pub fn compile_excludes<S: AsRef<str>>(patterns: &[S]) -> ImportResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern.as_ref())
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    ImportError::Config(format!("Invalid log exclude '{}': {}", pattern.as_ref(), e))
                })
        })
        .collect()
}

/// Severity of a log record, least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Information,
    Event,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Information => "Information",
            Severity::Event => "Event",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        };
        f.write_str(name)
    }
}

/// Capability to record import diagnostics
pub trait ImportLog {
    fn record(&mut self, severity: Severity, message: &str);

    fn info(&mut self, message: &str) {
        self.record(Severity::Information, message);
    }

    fn warn(&mut self, message: &str) {
        self.record(Severity::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.record(Severity::Error, message);
    }
}

impl<L: ImportLog + ?Sized> ImportLog for &mut L {
    fn record(&mut self, severity: Severity, message: &str) {
        (**self).record(severity, message);
    }
}

//==============================================================================
// MemoryLog
//==============================================================================

/// A single log entry
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
    pub message: String,
    /// Hidden by an exclusion pattern
    pub excluded: bool,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {}",
            self.severity,
            self.timestamp.format("%H:%M:%S%.3f"),
            self.message
        )
    }
}

/// In-memory log with regex exclusion filters
#[derive(Debug)]
pub struct MemoryLog {
    enabled: bool,
    entries: Vec<LogEntry>,
    excludes: Vec<Regex>,
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLog {
    pub fn new() -> Self {
        Self {
            enabled: true,
            entries: Vec::new(),
            excludes: Vec::new(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Replace the exclusion patterns with a comma-separated list of
    /// case-insensitive regular expressions and re-evaluate every entry.
    pub fn set_excludes(&mut self, comma_list: &str) -> ImportResult<()> {
        let patterns: Vec<&str> = comma_list
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        self.set_exclude_patterns(&patterns)
    }

    pub fn set_exclude_patterns<S: AsRef<str>>(&mut self, patterns: &[S]) -> ImportResult<()> {
        self.excludes = compile_excludes(patterns)?;

        for entry in &mut self.entries {
            entry.excluded = self.excludes.iter().any(|re| re.is_match(&entry.message));
        }
        Ok(())
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Messages of non-excluded entries in recording order
    pub fn messages(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.excluded)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Non-excluded entries at or above `min`, newest first, one per line
    pub fn render(&self, min: Severity) -> String {
        let mut out = String::new();
        for entry in self
            .entries
            .iter()
            .rev()
            .filter(|e| e.severity >= min && !e.excluded)
        {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn write_to(&self, path: &Path) -> ImportResult<()> {
        fs::write(path, self.render(Severity::Information)).map_err(|e| {
            ImportError::Io(std::io::Error::new(
                e.kind(),
                format!("Cannot write to path={}. Err={}", path.display(), e),
            ))
        })
    }
}

impl ImportLog for MemoryLog {
    fn record(&mut self, severity: Severity, message: &str) {
        if !self.enabled {
            return;
        }
        let excluded = self.excludes.iter().any(|re| re.is_match(message));
        self.entries.push(LogEntry {
            severity,
            timestamp: Local::now(),
            message: message.to_string(),
            excluded,
        });
    }
}

//==============================================================================
// TracingLog / TeeLog
//==============================================================================

/// Forwards records to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl ImportLog for TracingLog {
    fn record(&mut self, severity: Severity, message: &str) {
        match severity {
            Severity::Information | Severity::Event => {
                tracing::info!(target: "facility_import::import", "{}", message)
            }
            Severity::Warning => tracing::warn!(target: "facility_import::import", "{}", message),
            Severity::Error => tracing::error!(target: "facility_import::import", "{}", message),
        }
    }
}

/// Sends every record to two sinks
pub struct TeeLog<A, B> {
    pub first: A,
    pub second: B,
}

impl<A: ImportLog, B: ImportLog> TeeLog<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: ImportLog, B: ImportLog> ImportLog for TeeLog<A, B> {
    fn record(&mut self, severity: Severity, message: &str) {
        self.first.record(severity, message);
        self.second.record(severity, message);
    }
}

/// Drops records whose message matches any exclusion pattern
pub struct ExcludeLog<L> {
    inner: L,
    excludes: Vec<Regex>,
}

impl<L: ImportLog> ExcludeLog<L> {
    pub fn new(inner: L, excludes: Vec<Regex>) -> Self {
        Self { inner, excludes }
    }
}

impl<L: ImportLog> ImportLog for ExcludeLog<L> {
    fn record(&mut self, severity: Severity, message: &str) {
        if !self.excludes.iter().any(|re| re.is_match(message)) {
            self.inner.record(severity, message);
        }
    }
}
