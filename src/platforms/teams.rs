//! Microsoft Teams incoming-webhook adapter
//!
//! Each record becomes one legacy "MessageCard": a header line with the
//! severity tag and timestamp, a theme color picked from the severity, and a
//! single section carrying the message body.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clock::{iso_timestamp, Clock};
use crate::config::{PlatformKind, PlatformTarget};
use crate::error::Result;
use crate::types::LogRecord;

use super::client::HttpClient;
use super::platform_trait::Dispatcher;

/// Card payload posted to a Teams webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsCard {
    pub text: String,
    pub theme_color: String,
    pub sections: Vec<TeamsSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsSection {
    pub activity_subtitle: String,
}

impl TeamsCard {
    /// Render a record as a card, stamped with `timestamp`
    pub fn render(record: &LogRecord, timestamp: &str) -> Self {
        let mut body = record.message.clone();
        if let Some(detail) = &record.error_detail {
            body.push_str("\n\n > ");
            body.push_str(detail);
        }

        TeamsCard {
            text: format!("```{}``` at {}", record.severity, timestamp),
            theme_color: record.severity.theme_color().to_string(),
            sections: vec![TeamsSection {
                activity_subtitle: body,
            }],
        }
    }
}

/// Posts records to one Teams webhook
pub struct TeamsDispatcher {
    client: HttpClient,
    target: PlatformTarget,
    clock: Arc<dyn Clock>,
}

impl TeamsDispatcher {
    pub fn new(client: HttpClient, target: PlatformTarget, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            target,
            clock,
        }
    }
}

#[async_trait]
impl Dispatcher for TeamsDispatcher {
    fn platform(&self) -> PlatformKind {
        PlatformKind::Teams
    }

    async fn dispatch(&self, record: &LogRecord) -> Result<()> {
        let webhook_url = self.target.require_webhook_url()?;
        let card = TeamsCard::render(record, &iso_timestamp(self.clock.now_utc()));

        let response = self.client.post_json(webhook_url, None, &card).await?;
        self.client.expect_success(response).await
    }
}
