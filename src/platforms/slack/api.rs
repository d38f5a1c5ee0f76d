use crate::error::{Error, Result};

use crate::platforms::client::HttpClient;
use super::types::{check_ok, HistoryResponse, PostMessageRequest, PostMessageResponse, SlackMessage};

/// Slack Web API calls made with one bot token
pub struct SlackApi<'a> {
    client: &'a HttpClient,
    api_base: &'a str,
    token: &'a str,
}

impl<'a> SlackApi<'a> {
    pub fn new(client: &'a HttpClient, api_base: &'a str, token: &'a str) -> Self {
        Self {
            client,
            api_base,
            token,
        }
    }

    /// API base URL without a trailing slash
    pub fn api_base(&self) -> &'a str {
        self.api_base.trim_end_matches('/')
    }

    /// Build the full URL for a Web API method
    ///
    /// # Arguments
    /// * `method` - The API method name (e.g., "chat.postMessage")
    pub fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base())
    }

    /// Fetch the newest message in a channel
    ///
    /// # API Endpoint
    /// `GET conversations.history?channel=..&inclusive=true&limit=1`
    pub async fn latest_message(&self, channel: &str) -> Result<Option<SlackMessage>> {
        let url = self.method_url("conversations.history");
        let query = [("channel", channel), ("inclusive", "true"), ("limit", "1")];

        let response = self.client.get_query(&url, Some(self.token), &query).await?;
        let history: HistoryResponse = self.client.handle_response(response).await?;
        check_ok("conversations.history", history.ok, history.error)?;

        Ok(history.messages.into_iter().next())
    }

    /// Post a message, optionally as a thread reply
    ///
    /// # Returns
    /// The `ts` of the new message, which doubles as its id
    ///
    /// # API Endpoint
    /// `POST chat.postMessage`
    pub async fn post_message(
        &self,
        channel: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> Result<String> {
        let mut request = PostMessageRequest::new(channel.to_string(), text.to_string());
        if let Some(ts) = thread_ts {
            request = request.in_thread(ts.to_string());
        }

        let url = self.method_url("chat.postMessage");
        let response = self.client.post_json(&url, Some(self.token), &request).await?;
        let posted: PostMessageResponse = self.client.handle_response(response).await?;
        check_ok("chat.postMessage", posted.ok, posted.error)?;

        posted
            .ts
            .ok_or_else(|| Error::malformed("chat.postMessage response has no ts"))
    }
}
