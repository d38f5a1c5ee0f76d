//! Platform-specific dispatchers for the supported chat services
//!
//! Each platform module renders a log record in that service's wire format
//! and implements [`Dispatcher`] to deliver it.

mod client;
mod platform_trait;

pub mod discord;
pub mod slack;
pub mod teams;

pub use client::HttpClient;
pub use discord::{DiscordDispatcher, Pacer};
pub use platform_trait::Dispatcher;
pub use slack::{DayBucketResolver, SlackDispatcher};
pub use teams::TeamsDispatcher;
