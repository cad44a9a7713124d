//! Structured logging with session context.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

/// Log level for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for log aggregation).
    #[default]
    Json,
    /// Human-readable format (for development).
    Human,
}

/// Structured fields of an entry, ordered by key.
pub type Fields = BTreeMap<String, serde_json::Value>;

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Shopper session the entry belongs to.
    pub session: String,
    /// Emitting component (e.g. "order", "tracking").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: Fields,
    /// Microseconds since the logger was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_us: Option<u64>,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// `[LEVEL] component: message | key=value ...`
    pub fn to_human(&self) -> String {
        let mut out = format!("[{}] ", self.level);
        if let Some(component) = &self.component {
            let _ = write!(out, "{}: ", component);
        }
        out.push_str(&self.message);

        for (i, (key, value)) in self.fields.iter().enumerate() {
            out.push_str(if i == 0 { " | " } else { " " });
            let _ = write!(out, "{}={}", key, value);
        }
        out
    }

    /// Render in the given format.
    pub fn render(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Json => self.to_json(),
            LogFormat::Human => self.to_human(),
        }
    }
}

/// Structured logger bound to one shopper session.
///
/// Cheap to clone; each screen-level component takes its own copy tagged
/// with its component name.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    session: String,
    component: Option<String>,
    start_time: std::time::Instant,
    min_level: LogLevel,
    format: LogFormat,
}

impl StructuredLogger {
    /// Create a new logger for a session.
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            component: None,
            start_time: std::time::Instant::now(),
            min_level: LogLevel::Info,
            format: LogFormat::Json,
        }
    }

    /// Set the component name.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, Fields::new());
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, Fields::new());
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, Fields::new());
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, Fields::new());
    }

    /// Build the entry that `log` would emit, or `None` if filtered out.
    pub fn entry(
        &self,
        level: LogLevel,
        message: &str,
        fields: Fields,
    ) -> Option<LogEntry> {
        if level < self.min_level {
            return None;
        }

        Some(LogEntry {
            level,
            message: message.to_string(),
            session: self.session.clone(),
            component: self.component.clone(),
            fields,
            elapsed_us: Some(self.start_time.elapsed().as_micros() as u64),
        })
    }

    fn log(&self, level: LogLevel, message: &str, fields: Fields) {
        let Some(entry) = self.entry(level, message, fields) else {
            return;
        };
        let line = entry.render(self.format);

        match level {
            LogLevel::Trace => tracing::trace!(target: "dwa", "{}", line),
            LogLevel::Debug => tracing::debug!(target: "dwa", "{}", line),
            LogLevel::Info => tracing::info!(target: "dwa", "{}", line),
            LogLevel::Warn => tracing::warn!(target: "dwa", "{}", line),
            LogLevel::Error => tracing::error!(target: "dwa", "{}", line),
        }
    }

    /// Session tag.
    pub fn session(&self) -> &str {
        &self.session
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: Fields,
}

impl<'a> LogBuilder<'a> {
    /// Create a new log builder.
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: Fields::new(),
        }
    }

    /// Attach a field. Strings, integers, floats and booleans all convert
    /// into JSON values.
    pub fn field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Build the entry without emitting it.
    pub fn build(self) -> Option<LogEntry> {
        self.logger.entry(self.level, &self.message, self.fields)
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

impl StructuredLogger {
    /// Start building an info log entry.
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    /// Start building a warn log entry.
    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    /// Start building a debug log entry.
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}
