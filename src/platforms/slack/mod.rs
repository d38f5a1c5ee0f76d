//! Slack Web API adapter
//!
//! Unlike the webhook platforms, Slack deliveries are threaded: every log line
//! is a reply under that day's parent message, see [`DayBucketResolver`].

mod api;
mod day_bucket;
mod types;

pub use api::SlackApi;
pub use day_bucket::{parent_text, DayBucket, DayBucketResolver};
pub use types::{HistoryResponse, PostMessageRequest, PostMessageResponse, SlackMessage};

use async_trait::async_trait;
use std::sync::Arc;

use crate::clock::{date_key, Clock};
use crate::config::{PlatformKind, PlatformTarget};
use crate::error::Result;
use crate::types::LogRecord;

use super::client::HttpClient;
use super::platform_trait::Dispatcher;

/// Render the reply text for a record
pub fn render_reply(record: &LogRecord) -> String {
    match &record.error_detail {
        Some(detail) => format!("{}\n ```{}```", record.message, detail),
        None => record.message.clone(),
    }
}

/// Posts records as replies in one Slack channel's daily thread
pub struct SlackDispatcher {
    client: HttpClient,
    target: PlatformTarget,
    api_base: String,
    resolver: Arc<DayBucketResolver>,
    clock: Arc<dyn Clock>,
}

impl SlackDispatcher {
    pub fn new(
        client: HttpClient,
        target: PlatformTarget,
        api_base: impl Into<String>,
        resolver: Arc<DayBucketResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            target,
            api_base: api_base.into(),
            resolver,
            clock,
        }
    }
}

#[async_trait]
impl Dispatcher for SlackDispatcher {
    fn platform(&self) -> PlatformKind {
        PlatformKind::Slack
    }

    async fn dispatch(&self, record: &LogRecord) -> Result<()> {
        let (token, channel) = self.target.require_slack_credentials()?;
        let api = SlackApi::new(&self.client, &self.api_base, token);

        let today = date_key(self.clock.today());
        let parent = self.resolver.resolve(&api, channel, &today).await?;

        api.post_message(channel, &render_reply(record), Some(parent.as_str()))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{NaiveDate, TimeZone, Utc};
    use mockito::{Matcher, Server, ServerGuard};
    use std::time::Duration;
    use tracing_test::traced_test;

    fn clock() -> FixedClock {
        FixedClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
    }

    fn dispatcher(server: &ServerGuard, clock: FixedClock) -> SlackDispatcher {
        SlackDispatcher::new(
            HttpClient::new(Duration::from_secs(5)).unwrap(),
            PlatformTarget::slack("xoxb-1", "C1"),
            server.url(),
            Arc::new(DayBucketResolver::new()),
            Arc::new(clock),
        )
    }

    #[test]
    fn test_render_reply() {
        assert_eq!(render_reply(&LogRecord::info("ready")), "ready");

        let record = LogRecord::error("disk full").with_error_detail("at foo.c:12");
        assert_eq!(render_reply(&record), "disk full\n ```at foo.c:12```");
    }

    #[tokio::test]
    async fn test_two_deliveries_share_one_parent() {
        let mut server = Server::new_async().await;
        let history = server
            .mock("GET", "/conversations.history")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"ok": true, "messages": [{"ts": "9.0", "text": "someone else"}]}"#)
            .expect(1)
            .create_async()
            .await;
        let parent = server
            .mock("POST", "/chat.postMessage")
            .match_header("authorization", "Bearer xoxb-1")
            .match_body(Matcher::Json(serde_json::json!({
                "channel": "C1",
                "text": "Logs for Date: `2024-03-01`"
            })))
            .with_status(200)
            .with_body(r#"{"ok": true, "ts": "10.0"}"#)
            .expect(1)
            .create_async()
            .await;
        let replies = server
            .mock("POST", "/chat.postMessage")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "channel": "C1",
                "thread_ts": "10.0"
            })))
            .with_status(200)
            .with_body(r#"{"ok": true, "ts": "11.0"}"#)
            .expect(2)
            .create_async()
            .await;

        let dispatcher = dispatcher(&server, clock());
        dispatcher.dispatch(&LogRecord::info("first")).await.unwrap();
        dispatcher.dispatch(&LogRecord::warn("second")).await.unwrap();

        history.assert_async().await;
        parent.assert_async().await;
        replies.assert_async().await;
    }

    #[tokio::test]
    async fn test_adopted_parent_receives_reply() {
        let mut server = Server::new_async().await;
        let _history = server
            .mock("GET", "/conversations.history")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"ok": true, "messages": [{"ts": "5.0", "text": "Logs for Date: `2024-03-01`"}]}"#)
            .expect(1)
            .create_async()
            .await;
        let reply = server
            .mock("POST", "/chat.postMessage")
            .match_body(Matcher::Json(serde_json::json!({
                "channel": "C1",
                "text": "disk full\n ```at foo.c:12```",
                "thread_ts": "5.0"
            })))
            .with_status(200)
            .with_body(r#"{"ok": true, "ts": "6.0"}"#)
            .expect(1)
            .create_async()
            .await;

        let dispatcher = dispatcher(&server, clock());
        let record = LogRecord::error("disk full").with_error_detail("at foo.c:12");
        dispatcher.dispatch(&record).await.unwrap();

        reply.assert_async().await;
    }

    #[tokio::test]
    async fn test_new_day_gets_new_parent() {
        let mut server = Server::new_async().await;
        let _history = server
            .mock("GET", "/conversations.history")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"ok": true, "messages": []}"#)
            .expect(2)
            .create_async()
            .await;
        let _day_one = server
            .mock("POST", "/chat.postMessage")
            .match_body(Matcher::PartialJson(serde_json::json!({"text": "Logs for Date: `2024-03-01`"})))
            .with_status(200)
            .with_body(r#"{"ok": true, "ts": "1.0"}"#)
            .create_async()
            .await;
        let _day_two = server
            .mock("POST", "/chat.postMessage")
            .match_body(Matcher::PartialJson(serde_json::json!({"text": "Logs for Date: `2024-03-02`"})))
            .with_status(200)
            .with_body(r#"{"ok": true, "ts": "2.0"}"#)
            .create_async()
            .await;
        let late_reply = server
            .mock("POST", "/chat.postMessage")
            .match_body(Matcher::PartialJson(serde_json::json!({"text": "after midnight", "thread_ts": "2.0"})))
            .with_status(200)
            .with_body(r#"{"ok": true, "ts": "2.1"}"#)
            .expect(1)
            .create_async()
            .await;
        let _early_reply = server
            .mock("POST", "/chat.postMessage")
            .match_body(Matcher::PartialJson(serde_json::json!({"text": "before midnight", "thread_ts": "1.0"})))
            .with_status(200)
            .with_body(r#"{"ok": true, "ts": "1.1"}"#)
            .create_async()
            .await;

        let clock = clock();
        let dispatcher = dispatcher(&server, clock.clone());

        dispatcher.dispatch(&LogRecord::info("before midnight")).await.unwrap();
        clock.set_today(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        dispatcher.dispatch(&LogRecord::info("after midnight")).await.unwrap();

        late_reply.assert_async().await;
    }

    #[tokio::test]
    #[traced_test]
    async fn test_history_failure_is_swallowed_and_retried() {
        let mut server = Server::new_async().await;
        let history = server
            .mock("GET", "/conversations.history")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"ok": false, "error": "invalid_auth"}"#)
            .expect(2)
            .create_async()
            .await;
        let posts = server
            .mock("POST", "/chat.postMessage")
            .expect(0)
            .create_async()
            .await;

        let dispatcher = dispatcher(&server, clock());
        dispatcher.deliver(&LogRecord::info("one")).await;
        dispatcher.deliver(&LogRecord::info("two")).await;

        assert!(logs_contain("Error sending log to slack"));
        assert!(logs_contain("invalid_auth"));
        history.assert_async().await;
        posts.assert_async().await;
    }
}
