//! Send-slot pacing for Discord webhooks
//!
//! Discord webhooks reject bursts, so every send first reserves a slot on a
//! shared cursor. Slots are handed out one interval apart in the order the
//! reservations are made, which serializes concurrent senders into a queue
//! without holding any lock across the wait.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Shared "next allowed send time" cursor
///
/// Each reservation moves the cursor one interval past the previous slot,
/// clamped to the present: `slot = max(last_slot + interval, now)`. Idle
/// time never builds up a backlog of past slots.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last_slot: Mutex<Instant>,
}

impl Pacer {
    /// Create a pacer whose first slot is one interval from now
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_slot: Mutex::new(Instant::now()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reserve the next send slot and return when it opens
    ///
    /// The slot is one interval after the previously reserved slot. If that
    /// is already in the past (the pacer sat idle), the slot opens now, so
    /// idle time never turns into a burst allowance.
    pub fn reserve(&self) -> Instant {
        let now = Instant::now();
        // The guarded value is a plain Instant, so a poisoned lock is still usable.
        let mut last = self.last_slot.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = (*last + self.interval).max(now);
        *last = slot;
        slot
    }

    /// Reserve a slot and sleep until it opens
    pub async fn wait_turn(&self) {
        let slot = self.reserve();
        if slot > Instant::now() {
            sleep_until(slot).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_slots_are_one_interval_apart() {
        let pacer = Pacer::new(Duration::from_millis(1000));
        let start = Instant::now();

        let first = pacer.reserve();
        let second = pacer.reserve();
        let third = pacer.reserve();

        assert_eq!(first - start, Duration::from_millis(1000));
        assert_eq!(second - first, Duration::from_millis(1000));
        assert_eq!(third - second, Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_senders_are_serialized() {
        let pacer = Arc::new(Pacer::new(Duration::from_millis(1000)));
        let start = Instant::now();

        let mut handles = vec![];
        for _ in 0..5 {
            let pacer = pacer.clone();
            handles.push(tokio::spawn(async move {
                pacer.wait_turn().await;
                Instant::now()
            }));
        }

        let mut sent_at = vec![];
        for handle in handles {
            sent_at.push(handle.await.unwrap());
        }
        sent_at.sort();

        for pair in sent_at.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(1000));
        }
        assert!(*sent_at.last().unwrap() - start >= Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_pacer_does_not_allow_burst() {
        let pacer = Pacer::new(Duration::from_millis(1000));
        tokio::time::advance(Duration::from_secs(10)).await;

        let now = Instant::now();
        let first = pacer.reserve();
        let second = pacer.reserve();

        assert_eq!(first, now);
        assert_eq!(second - first, Duration::from_millis(1000));
    }
}
