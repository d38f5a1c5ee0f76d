//! Dispatcher trait all platform adapters implement

use async_trait::async_trait;
use tracing::error;

use crate::config::PlatformKind;
use crate::error::Result;
use crate::types::LogRecord;

/// Renders a [`LogRecord`] for one chat platform and delivers it
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Which platform this dispatcher posts to
    fn platform(&self) -> PlatformKind;

    /// Render and send one record, reporting any failure
    async fn dispatch(&self, record: &LogRecord) -> Result<()>;

    /// Send one record, logging and swallowing any failure
    ///
    /// A broken destination never reaches the caller; the only trace of it is
    /// one `error` event carrying the platform and the failure.
    async fn deliver(&self, record: &LogRecord) {
        if let Err(e) = self.dispatch(record).await {
            error!(
                platform = self.platform().as_str(),
                error = %e,
                http_status = e.http_status(),
                "Error sending log to {}",
                self.platform().as_str()
            );
        }
    }
}
