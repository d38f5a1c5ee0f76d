//! Log record type handed to the forwarder

use serde::{Deserialize, Serialize};

use super::severity::Severity;

/// A single log record emitted by the host application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Severity of the record
    pub severity: Severity,
    /// The log message text
    pub message: String,
    /// Optional error detail, typically a stack trace
    #[serde(default, alias = "stack", skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl LogRecord {
    /// Create a new record without error detail
    pub fn new(severity: impl Into<Severity>, message: impl Into<String>) -> Self {
        LogRecord {
            severity: severity.into(),
            message: message.into(),
            error_detail: None,
        }
    }

    /// Attach error detail (builder pattern)
    pub fn with_error_detail(mut self, detail: impl Into<String>) -> Self {
        self.error_detail = Some(detail.into());
        self
    }

    pub fn error(message: impl Into<String>) -> Self {
        LogRecord::new(Severity::Error, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        LogRecord::new(Severity::Warn, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        LogRecord::new(Severity::Info, message)
    }
}
