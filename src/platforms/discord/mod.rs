//! Discord webhook adapter
//!
//! Records are posted as plain `content` messages. All Discord targets of a
//! logger share one [`Pacer`], so the whole process never posts to Discord
//! more often than once per interval.

mod pacer;

pub use pacer::Pacer;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clock::{iso_timestamp, Clock};
use crate::config::{PlatformKind, PlatformTarget};
use crate::error::Result;
use crate::types::LogRecord;

use super::client::HttpClient;
use super::platform_trait::Dispatcher;

/// Webhook execute payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordMessage {
    pub content: String,
}

impl DiscordMessage {
    /// Render a record, stamped with `timestamp`
    pub fn render(record: &LogRecord, timestamp: &str) -> Self {
        let mut content = format!("`{}` at {}\n{}", record.severity, timestamp, record.message);
        if let Some(detail) = &record.error_detail {
            content.push_str(&format!("\n\n ``` {detail}``` "));
        }
        DiscordMessage { content }
    }
}

/// Posts records to one Discord webhook, paced by a shared [`Pacer`]
pub struct DiscordDispatcher {
    client: HttpClient,
    target: PlatformTarget,
    pacer: Arc<Pacer>,
    clock: Arc<dyn Clock>,
}

impl DiscordDispatcher {
    pub fn new(
        client: HttpClient,
        target: PlatformTarget,
        pacer: Arc<Pacer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            target,
            pacer,
            clock,
        }
    }
}

#[async_trait]
impl Dispatcher for DiscordDispatcher {
    fn platform(&self) -> PlatformKind {
        PlatformKind::Discord
    }

    async fn dispatch(&self, record: &LogRecord) -> Result<()> {
        // A slot is consumed even if the send below fails.
        self.pacer.wait_turn().await;

        let webhook_url = self.target.require_webhook_url()?;
        let message = DiscordMessage::render(record, &iso_timestamp(self.clock.now_utc()));

        let response = self.client.post_json(webhook_url, None, &message).await?;
        self.client.expect_success(response).await
    }
}
