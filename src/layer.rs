//! `tracing` integration
//!
//! [`ChannelLayer`] forwards the host application's own `tracing` events to a
//! [`ChannelLogger`]. Install it next to the usual fmt layer:
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//!
//! let logger = ChannelLogger::new(LoggerConfig::from_json(&config_json)?)?;
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ChannelLayer::new(logger).with_min_level(Level::WARN))
//!     .init();
//! ```

use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::logger::ChannelLogger;
use crate::types::{LogRecord, Severity};

/// Crates whose events (and their submodules' events) are never forwarded:
/// this crate and the HTTP stack it delivers through, which would otherwise
/// feed back into delivery.
const IGNORED_TARGETS: &[&str] = &["channel_logger", "reqwest", "hyper", "hyper_util", "h2", "rustls"];

/// A `tracing_subscriber` layer that forwards events to chat platforms
pub struct ChannelLayer {
    logger: ChannelLogger,
    min_level: Level,
    ignored_targets: Vec<String>,
}

impl ChannelLayer {
    /// Forward `INFO` and more severe events to `logger`
    pub fn new(logger: ChannelLogger) -> Self {
        Self {
            logger,
            min_level: Level::INFO,
            ignored_targets: IGNORED_TARGETS.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Only forward events at `level` or more severe
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Never forward events from module path `target` or its submodules
    pub fn ignore_target(mut self, target: impl Into<String>) -> Self {
        self.ignored_targets.push(target.into());
        self
    }

    fn wants(&self, level: &Level, target: &str) -> bool {
        // More verbose levels compare greater.
        if *level > self.min_level {
            return false;
        }
        !self
            .ignored_targets
            .iter()
            .any(|ignored| is_within(target, ignored))
    }
}

/// Whether `target` is the module path `root` or one of its submodules
fn is_within(target: &str, root: &str) -> bool {
    match target.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}

impl<S: Subscriber> Layer<S> for ChannelLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !self.wants(metadata.level(), metadata.target()) {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        self.logger.deliver(visitor.into_record(*metadata.level()));
    }
}

/// Collects an event's fields into record parts
#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: String,
    error_detail: Option<String>,
}

impl RecordVisitor {
    fn into_record(self, level: Level) -> LogRecord {
        let mut message = self.message;
        if !self.fields.is_empty() {
            if !message.is_empty() {
                message.push(' ');
            }
            message.push_str(&self.fields);
        }

        LogRecord {
            severity: Severity::from(level),
            message,
            error_detail: self.error_detail,
        }
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "error" | "stack" => self.error_detail = Some(value.to_string()),
            name => self.push_field(name, format_args!("{value}")),
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_str(field, &value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "error" | "stack" => self.error_detail = Some(format!("{value:?}")),
            name => self.push_field(name, format_args!("{value:?}")),
        }
    }
}
