//! Forwarder configuration
//!
//! A [`LoggerConfig`] lists the chat destinations a record fans out to plus
//! the few delivery knobs. It can be built in code or deserialized from JSON
//! with camelCase field names (`platformName`, `webhookUrl`, `token`,
//! `channelId`).

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Default minimum spacing between two Discord webhook posts
pub const DEFAULT_DISCORD_INTERVAL_MS: u64 = 1000;
/// Default Slack Web API base URL
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";
/// Default per-request HTTP timeout
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Chat platform a target delivers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformKind {
    #[serde(rename = "ms-teams", alias = "teams")]
    Teams,
    #[serde(rename = "discord")]
    Discord,
    #[serde(rename = "slack")]
    Slack,
    /// Any platform name this library does not know; skipped on delivery
    #[serde(other)]
    Unknown,
}

impl PlatformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Teams => "ms-teams",
            PlatformKind::Discord => "discord",
            PlatformKind::Slack => "slack",
            PlatformKind::Unknown => "unknown",
        }
    }
}

/// One configured destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformTarget {
    #[serde(rename = "platformName", alias = "platform")]
    pub platform: PlatformKind,
    /// Incoming webhook URL (Teams, Discord)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Bot token sent as bearer auth (Slack)
    #[serde(default, alias = "authToken", skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Channel to post into (Slack)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

impl PlatformTarget {
    pub fn teams(webhook_url: impl Into<String>) -> Self {
        PlatformTarget {
            platform: PlatformKind::Teams,
            webhook_url: Some(webhook_url.into()),
            token: None,
            channel_id: None,
        }
    }

    pub fn discord(webhook_url: impl Into<String>) -> Self {
        PlatformTarget {
            platform: PlatformKind::Discord,
            webhook_url: Some(webhook_url.into()),
            token: None,
            channel_id: None,
        }
    }

    pub fn slack(token: impl Into<String>, channel_id: impl Into<String>) -> Self {
        PlatformTarget {
            platform: PlatformKind::Slack,
            webhook_url: None,
            token: Some(token.into()),
            channel_id: Some(channel_id.into()),
        }
    }

    /// Webhook URL, or an error naming the platform that needs one
    pub(crate) fn require_webhook_url(&self) -> Result<&str> {
        self.webhook_url.as_deref().ok_or_else(|| {
            Error::invalid_argument(format!(
                "{} target has no webhook URL",
                self.platform.as_str()
            ))
        })
    }

    /// Slack token and channel, or an error naming what is missing
    pub(crate) fn require_slack_credentials(&self) -> Result<(&str, &str)> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| Error::invalid_argument("slack target has no token"))?;
        let channel = self
            .channel_id
            .as_deref()
            .ok_or_else(|| Error::invalid_argument("slack target has no channel id"))?;
        Ok((token, channel))
    }
}

/// Configuration for a [`crate::ChannelLogger`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Destinations every record fans out to
    #[serde(default)]
    pub platforms: Vec<PlatformTarget>,
    /// Minimum spacing between Discord posts, in milliseconds
    #[serde(default = "default_discord_interval_ms")]
    pub discord_interval_ms: u64,
    /// Slack Web API base URL
    #[serde(default = "default_slack_api_base")]
    pub slack_api_base: String,
    /// HTTP request timeout, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_discord_interval_ms() -> u64 {
    DEFAULT_DISCORD_INTERVAL_MS
}

fn default_slack_api_base() -> String {
    DEFAULT_SLACK_API_BASE.to_string()
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Whole milliseconds in `duration`, rounded up and saturating at `u64::MAX`
fn ceil_millis(duration: Duration) -> u64 {
    let millis = duration.as_nanos().div_ceil(1_000_000);
    u64::try_from(millis).unwrap_or(u64::MAX)
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            platforms: Vec::new(),
            discord_interval_ms: DEFAULT_DISCORD_INTERVAL_MS,
            slack_api_base: default_slack_api_base(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl LoggerConfig {
    /// Create an empty configuration with default delivery settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::invalid_argument(format!("Invalid logger configuration: {e}")))
    }

    /// Add a destination
    pub fn with_target(mut self, target: PlatformTarget) -> Self {
        self.platforms.push(target);
        self
    }

    /// Set the minimum spacing between Discord posts
    pub fn with_discord_interval(mut self, interval: Duration) -> Self {
        self.discord_interval_ms = ceil_millis(interval);
        self
    }

    /// Point Slack calls at a different API base (e.g. a proxy or a test server)
    pub fn with_slack_api_base(mut self, base: impl Into<String>) -> Self {
        self.slack_api_base = base.into();
        self
    }

    /// Set the HTTP request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = ceil_millis(timeout);
        self
    }

    pub fn discord_interval(&self) -> Duration {
        Duration::from_millis(self.discord_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Check that every URL in the configuration parses
    ///
    /// Missing per-target credentials are not rejected here; they surface as
    /// delivery failures for that target only.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.slack_api_base).map_err(|e| {
            Error::invalid_argument(format!("Invalid Slack API base URL: {e}"))
        })?;

        for target in &self.platforms {
            if let Some(webhook_url) = &target.webhook_url {
                Url::parse(webhook_url).map_err(|e| {
                    Error::invalid_argument(format!(
                        "Invalid {} webhook URL: {e}",
                        target.platform.as_str()
                    ))
                })?;
            }
        }

        if self.request_timeout_ms == 0 {
            return Err(Error::invalid_argument("Request timeout must be non-zero"));
        }

        Ok(())
    }
}
