use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// `chat.postMessage` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMessageRequest {
    pub channel: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}

impl PostMessageRequest {
    /// Create a top-level message request
    pub fn new(channel: String, text: String) -> Self {
        Self {
            channel,
            text,
            thread_ts: None,
        }
    }

    /// Post as a reply in the thread rooted at `thread_ts`
    pub fn in_thread(mut self, thread_ts: String) -> Self {
        self.thread_ts = Some(thread_ts);
        self
    }
}

/// A message as returned by `conversations.history`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlackMessage {
    pub ts: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// `conversations.history` response
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub messages: Vec<SlackMessage>,
}

/// `chat.postMessage` response
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

/// Slack answers most failures with HTTP 200 and `"ok": false`
pub(crate) fn check_ok(method: &str, ok: Option<bool>, error: Option<String>) -> Result<()> {
    if ok == Some(false) {
        let id = error.unwrap_or_else(|| "unknown_error".to_string());
        return Err(Error::network(format!("{method} was rejected")).with_platform_error(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_request_shape() {
        let request = PostMessageRequest::new("C1".to_string(), "hello".to_string())
            .in_thread("1700000000.000100".to_string());
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"channel": "C1", "text": "hello", "thread_ts": "1700000000.000100"})
        );
    }

    #[test]
    fn test_top_level_request_omits_thread() {
        let request = PostMessageRequest::new("C1".to_string(), "hello".to_string());
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("thread_ts").is_none());
    }

    #[test]
    fn test_history_tolerates_missing_fields() {
        let history: HistoryResponse =
            serde_json::from_str(r#"{"messages": [{"ts": "1.2"}]}"#).unwrap();
        assert_eq!(history.ok, None);
        assert_eq!(history.messages[0].text, None);
    }

    #[test]
    fn test_check_ok() {
        assert!(check_ok("chat.postMessage", Some(true), None).is_ok());
        assert!(check_ok("chat.postMessage", None, None).is_ok());

        let err = check_ok("chat.postMessage", Some(false), Some("not_in_channel".to_string()))
            .unwrap_err();
        assert_eq!(err.platform_error(), Some("not_in_channel"));
    }
}
