//! Wall-clock access for message timestamps and Slack day buckets

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};
use std::sync::{Arc, Mutex};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current UTC time, used for message timestamps
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current calendar date in the local timezone, used for day buckets
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a settable instant, for tests and replay tools
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
    today: Arc<Mutex<NaiveDate>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, today: NaiveDate) -> Self {
        FixedClock {
            now: Arc::new(Mutex::new(now)),
            today: Arc::new(Mutex::new(today)),
        }
    }

    /// Move the local date, e.g. to simulate midnight passing
    pub fn set_today(&self, today: NaiveDate) {
        if let Ok(mut t) = self.today.lock() {
            *t = today;
        }
    }

    pub fn set_now(&self, now: DateTime<Utc>) {
        if let Ok(mut n) = self.now.lock() {
            *n = now;
        }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now.lock().map(|n| *n).unwrap_or_else(|_| Utc::now())
    }

    fn today(&self) -> NaiveDate {
        self.today
            .lock()
            .map(|t| *t)
            .unwrap_or_else(|_| Local::now().date_naive())
    }
}

/// ISO-8601 UTC timestamp with millisecond precision, e.g. `2024-03-01T09:15:00.000Z`
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Zero-padded `YYYY-MM-DD` key for a calendar date
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
