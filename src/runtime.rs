//! Async runtime access for background deliveries
//!
//! Deliveries run as tasks on a Tokio runtime owned by the host. The logger
//! captures a handle to it at construction so records can be forwarded from
//! synchronous code (e.g. inside a `tracing` layer) as well.

use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::{Error, ErrorCode, Result};

/// Handle to the runtime the caller is running on
///
/// # Returns
/// An `InvalidState` error when called outside a Tokio runtime
pub fn current_handle() -> Result<Handle> {
    Handle::try_current().map_err(|e| {
        Error::new(
            ErrorCode::InvalidState,
            format!("No Tokio runtime available: {e}"),
        )
    })
}

/// Spawn a background task on the given runtime
pub fn spawn_on<F>(handle: &Handle, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    handle.spawn(future)
}
