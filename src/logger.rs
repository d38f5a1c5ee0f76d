//! Fan-out of log records to every configured chat destination
//!
//! [`ChannelLogger`] owns all delivery state (HTTP client, Discord pacer,
//! Slack day buckets). Cloning it is cheap and clones share that state, so
//! one instance per process gives process-wide pacing and threading.

use futures::future::join_all;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::clock::{Clock, SystemClock};
use crate::config::{LoggerConfig, PlatformKind, PlatformTarget};
use crate::error::Result;
use crate::platforms::{
    DayBucketResolver, DiscordDispatcher, Dispatcher, HttpClient, Pacer, SlackDispatcher,
    TeamsDispatcher,
};
use crate::runtime::{current_handle, spawn_on};
use crate::types::LogRecord;

/// Forwards log records to Teams, Discord and Slack
#[derive(Clone)]
pub struct ChannelLogger {
    inner: Arc<Inner>,
}

struct Inner {
    config: LoggerConfig,
    client: HttpClient,
    pacer: Arc<Pacer>,
    resolver: Arc<DayBucketResolver>,
    clock: Arc<dyn Clock>,
    runtime: Handle,
    dispatchers: Vec<Arc<dyn Dispatcher>>,
}

/// Builder for [`ChannelLogger`]
pub struct ChannelLoggerBuilder {
    config: LoggerConfig,
    clock: Arc<dyn Clock>,
    runtime: Option<Handle>,
}

impl ChannelLoggerBuilder {
    /// Use a different time source (tests, replays)
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Spawn deliveries on this runtime instead of the current one
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn build(self) -> Result<ChannelLogger> {
        self.config.validate()?;

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => current_handle()?,
        };

        let client = HttpClient::new(self.config.request_timeout())?;
        let pacer = Arc::new(Pacer::new(self.config.discord_interval()));
        let resolver = Arc::new(DayBucketResolver::new());

        let mut inner = Inner {
            config: self.config,
            client,
            pacer,
            resolver,
            clock: self.clock,
            runtime,
            dispatchers: Vec::new(),
        };

        let dispatchers = inner
            .config
            .platforms
            .iter()
            .filter_map(|target| inner.dispatcher_for(target))
            .collect();
        inner.dispatchers = dispatchers;

        Ok(ChannelLogger {
            inner: Arc::new(inner),
        })
    }
}

impl Inner {
    fn dispatcher_for(&self, target: &PlatformTarget) -> Option<Arc<dyn Dispatcher>> {
        let dispatcher: Arc<dyn Dispatcher> = match target.platform {
            PlatformKind::Teams => Arc::new(TeamsDispatcher::new(
                self.client.clone(),
                target.clone(),
                self.clock.clone(),
            )),
            PlatformKind::Discord => Arc::new(DiscordDispatcher::new(
                self.client.clone(),
                target.clone(),
                self.pacer.clone(),
                self.clock.clone(),
            )),
            PlatformKind::Slack => Arc::new(SlackDispatcher::new(
                self.client.clone(),
                target.clone(),
                self.config.slack_api_base.clone(),
                self.resolver.clone(),
                self.clock.clone(),
            )),
            PlatformKind::Unknown => {
                debug!("Skipping target with unknown platform");
                return None;
            }
        };
        Some(dispatcher)
    }
}

impl ChannelLogger {
    /// Create a logger on the current Tokio runtime with the system clock
    pub fn new(config: LoggerConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: LoggerConfig) -> ChannelLoggerBuilder {
        ChannelLoggerBuilder {
            config,
            clock: Arc::new(SystemClock),
            runtime: None,
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.inner.config
    }

    /// Number of targets records are delivered to
    pub fn target_count(&self) -> usize {
        self.inner.dispatchers.len()
    }

    /// Forward a record to every configured target
    ///
    /// Returns as soon as one delivery task per target has been spawned; it
    /// never waits for the network and never reports delivery failures.
    pub fn deliver(&self, record: LogRecord) -> Deliveries {
        let record = Arc::new(record);
        let handles = self
            .inner
            .dispatchers
            .iter()
            .map(|dispatcher| self.spawn_delivery(dispatcher.clone(), record.clone()))
            .collect();
        Deliveries { handles }
    }

    /// Forward a record to an explicit list of targets
    ///
    /// Targets share this logger's pacer and day buckets. Unknown platforms
    /// are skipped.
    pub fn deliver_to(&self, record: LogRecord, targets: &[PlatformTarget]) -> Deliveries {
        let record = Arc::new(record);
        let handles = targets
            .iter()
            .filter_map(|target| self.inner.dispatcher_for(target))
            .map(|dispatcher| self.spawn_delivery(dispatcher, record.clone()))
            .collect();
        Deliveries { handles }
    }

    fn spawn_delivery(&self, dispatcher: Arc<dyn Dispatcher>, record: Arc<LogRecord>) -> JoinHandle<()> {
        spawn_on(&self.inner.runtime, async move {
            dispatcher.deliver(&record).await;
        })
    }
}

/// Delivery tasks started for one record
///
/// Dropping this does not cancel anything; deliveries run to completion in
/// the background either way.
#[derive(Debug)]
pub struct Deliveries {
    handles: Vec<JoinHandle<()>>,
}

impl Deliveries {
    /// Number of delivery tasks started
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Wait until every delivery has finished, successfully or not
    pub async fn settled(self) {
        for result in join_all(self.handles).await {
            if let Err(e) = result {
                error!(error = %e, "Delivery task did not complete");
            }
        }
    }
}
