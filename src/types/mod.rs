//! Core types for channel-logger
//!
//! Platform-agnostic types shared by every dispatcher.

pub mod record;
pub mod severity;

// Re-export for convenience
pub use record::LogRecord;
pub use severity::Severity;
