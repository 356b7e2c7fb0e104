//! Bounded status polling with an injectable pause between attempts.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// How often and how many times a status condition is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            // whole milliseconds, rounded up so a sub-millisecond interval still pauses
            interval_ms: interval.as_micros().div_ceil(1000) as u64,
            max_attempts,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        // ~10 s at 100 ms, the time a full activation stroke may take
        Self {
            interval_ms: 100,
            max_attempts: 100,
        }
    }
}

/// Wait strategy between two polls.
#[async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately, for simulated devices.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPause;

#[async_trait]
impl Pause for NoPause {
    async fn pause(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_interval_round_trips_millis() {
        let policy = PollPolicy::new(Duration::from_millis(250), 4);
        assert_eq!(policy.interval(), Duration::from_millis(250));
        assert_eq!(policy.max_attempts, 4);
    }

    #[test]
    fn sub_millisecond_interval_rounds_up() {
        let policy = PollPolicy::new(Duration::from_micros(900), 3);
        assert_eq!(policy.interval(), Duration::from_millis(1));
        let policy = PollPolicy::new(Duration::from_micros(1_001), 3);
        assert_eq!(policy.interval(), Duration::from_millis(2));
        assert_eq!(PollPolicy::new(Duration::ZERO, 3).interval(), Duration::ZERO);
    }

    #[tokio::test]
    async fn no_pause_does_not_sleep() {
        let start = std::time::Instant::now();
        NoPause.pause(Duration::from_secs(30)).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
