//! Error handling for channel-logger
//!
//! Every delivery failure (transport, non-success status, malformed body)
//! is represented by a single [`Error`]. Dispatchers return it internally and
//! the fan-out adapter turns it into a diagnostic log line.

use std::fmt;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid argument or configuration provided
    InvalidArgument,
    /// Transport failure or non-success response
    NetworkError,
    /// Response body could not be understood
    MalformedResponse,
    /// The platform rejected the request for exceeding its rate limit
    RateLimited,
    /// Invalid state for operation
    InvalidState,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "Invalid argument",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::MalformedResponse => "Malformed response",
            ErrorCode::RateLimited => "Rate limit exceeded",
            ErrorCode::InvalidState => "Invalid state",
        }
    }
}

/// Internal error type
#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    /// Platform-specific error string (e.g. Slack's `"channel_not_found"`)
    pub(crate) platform_error: Option<String>,
    /// HTTP status code if this error came from an HTTP response
    pub(crate) http_status: Option<u16>,
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Error {
            code,
            message: message.into(),
            platform_error: None,
            http_status: None,
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::new(ErrorCode::InvalidArgument, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Error::new(ErrorCode::NetworkError, msg)
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::new(ErrorCode::MalformedResponse, msg)
    }

    /// Add the platform's own error identifier (builder pattern)
    pub fn with_platform_error(mut self, id: impl Into<String>) -> Self {
        self.platform_error = Some(id.into());
        self
    }

    /// Add HTTP status code (builder pattern)
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Get the platform error identifier if available
    pub fn platform_error(&self) -> Option<&str> {
        self.platform_error.as_deref()
    }

    /// Get the HTTP status code if available
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)?;
        if let Some(id) = &self.platform_error {
            write!(f, " ({id})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}
