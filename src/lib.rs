//! Forward structured log records to chat platforms
//!
//! A [`ChannelLogger`] fans each [`LogRecord`] out to every configured
//! destination: Microsoft Teams and Discord incoming webhooks, and Slack
//! channels (threaded under one parent message per day). Delivery is
//! fire-and-forget; failures are reported through `tracing` and never reach
//! the caller.

// Core modules
pub mod clock;
pub mod config;
pub mod error;
pub mod layer;
pub mod logger;
pub mod platforms;
pub mod runtime;
pub mod types;

// Re-exports for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{LoggerConfig, PlatformKind, PlatformTarget};
pub use error::{Error, ErrorCode, Result};
pub use layer::ChannelLayer;
pub use logger::{ChannelLogger, ChannelLoggerBuilder, Deliveries};
pub use platforms::Dispatcher;
pub use types::{LogRecord, Severity};

// Library version information
pub const VERSION_STRING: &str = concat!(env!("CARGO_PKG_VERSION"), " (channel-logger)");
