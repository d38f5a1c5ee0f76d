//! Per-day parent messages for Slack threads
//!
//! All log lines of one calendar day are posted as replies under a single
//! parent message reading "Logs for Date: `YYYY-MM-DD`". The resolver finds
//! that parent (the newest message in the channel, if it matches) or creates
//! it, and caches it per workspace channel until the date changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;
use tracing::debug;

use crate::error::Result;

use super::api::SlackApi;

/// The parent message for one channel and one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    /// Local date, `YYYY-MM-DD`
    pub date_key: String,
    /// `ts` of the parent message
    pub parent_message_id: String,
}

/// Text of the parent message for a date
pub fn parent_text(date_key: &str) -> String {
    format!("Logs for Date: `{date_key}`")
}

type Slot = Arc<AsyncMutex<Option<DayBucket>>>;

/// API base and channel id; channel ids are only unique within one Slack API
type SlotKey = (String, String);

/// Cache of the live [`DayBucket`] for each channel
///
/// Entries are keyed by API base and channel id, so targets pointing the
/// same channel id at different Slack APIs keep separate threads.
/// Each channel has its own async lock, held for the whole
/// lookup → adopt-or-post → store sequence, so concurrent first deliveries
/// of a day post one parent between them.
#[derive(Debug, Default)]
pub struct DayBucketResolver {
    slots: Mutex<HashMap<SlotKey, Slot>>,
}

impl DayBucketResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, api_base: &str, channel: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .entry((api_base.trim_end_matches('/').to_string(), channel.to_string()))
            .or_default()
            .clone()
    }

    /// The cached bucket for a channel behind `api_base`, if any
    pub async fn current(&self, api_base: &str, channel: &str) -> Option<DayBucket> {
        self.slot(api_base, channel).lock().await.clone()
    }

    /// Return the parent message id for `date_key`, finding or creating it
    ///
    /// A cached bucket from an earlier date is replaced. On failure the
    /// cache keeps whatever it held before, so the next call retries.
    pub async fn resolve(&self, api: &SlackApi<'_>, channel: &str, date_key: &str) -> Result<String> {
        let slot = self.slot(api.api_base(), channel);
        let mut cached = slot.lock().await;

        if let Some(bucket) = cached.as_ref() {
            if bucket.date_key == date_key {
                return Ok(bucket.parent_message_id.clone());
            }
        }

        let expected = parent_text(date_key);
        let latest = api.latest_message(channel).await?;

        let parent_message_id = match latest {
            Some(message) if message.text.as_deref() == Some(expected.as_str()) => {
                debug!(channel, date_key, ts = %message.ts, "Adopting existing Slack day message");
                message.ts
            }
            _ => {
                let ts = api.post_message(channel, &expected, None).await?;
                debug!(channel, date_key, ts = %ts, "Posted new Slack day message");
                ts
            }
        };

        *cached = Some(DayBucket {
            date_key: date_key.to_string(),
            parent_message_id: parent_message_id.clone(),
        });

        Ok(parent_message_id)
    }
}
