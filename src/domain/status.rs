//! Non-fatal status records
//!
//! Best-effort operations never throw for a single failed unit. They append a
//! [`StatusRecord`] to the run's [`StatusLog`] and carry on.

use std::fmt;

use crate::error::ScmError;

/// Severity of a status record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// A captured, non-fatal failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRecord {
    severity: Severity,
    source: String,
    message: String,
    cause: Option<String>,
}

impl StatusRecord {
    pub fn new(severity: Severity, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            source: source.into(),
            message: message.into(),
            cause: None,
        }
    }

    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, source, message)
    }

    pub fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, source, message)
    }

    /// Record for a structured error, keeping its debug form as the cause
    pub fn from_error(source: impl Into<String>, err: &ScmError) -> Self {
        Self::error(source, err.to_string()).with_cause(format!("{err:?}"))
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    /// Plain text form used for `status-N.txt` report entries
    pub fn render(&self) -> String {
        let mut text = format!(
            "Severity: {}\nSource: {}\nMessage: {}\n",
            self.severity, self.source, self.message
        );
        if let Some(cause) = &self.cause {
            text.push_str("\nCause:\n");
            text.push_str(cause);
            text.push('\n');
        }
        text
    }
}

/// Append-only status records for a single run
#[derive(Debug, Default)]
pub struct StatusLog {
    records: Vec<StatusRecord>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: StatusRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[StatusRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.records.iter().any(|r| r.severity == Severity::Error)
    }

    pub fn into_records(self) -> Vec<StatusRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_cause() {
        let record = StatusRecord::error("gatherer:env", "boom");
        assert_eq!(
            record.render(),
            "Severity: ERROR\nSource: gatherer:env\nMessage: boom\n"
        );
    }

    #[test]
    fn test_render_with_cause() {
        let record = StatusRecord::warning("cleanup", "Can't delete /tmp/x").with_cause("busy");
        let text = record.render();
        assert!(text.starts_with("Severity: WARNING\n"));
        assert!(text.ends_with("Cause:\nbusy\n"));
    }

    #[test]
    fn test_from_error_keeps_message() {
        let err = crate::error::io_error("disk full");
        let record = StatusRecord::from_error("data:workspace", &err);
        assert_eq!(record.message(), "IO error: disk full");
        assert!(record.cause().is_some_and(|c| c.contains("IoError")));
    }

    #[test]
    fn test_log_preserves_order() {
        let mut log = StatusLog::new();
        log.push(StatusRecord::warning("a", "first"));
        log.push(StatusRecord::error("b", "second"));

        let sources: Vec<_> = log.records().iter().map(StatusRecord::source).collect();
        assert_eq!(sources, vec!["a", "b"]);
        assert!(log.has_errors());
        assert_eq!(log.len(), 2);
    }
}
