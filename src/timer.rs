use log::debug;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

pub const DEFAULT_TIME_LIMIT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLimit(u64);

impl TimeLimit {
    /// `0` is the "unset" sentinel and maps to the default.
    pub fn from_configured(seconds: u64) -> Self {
        if seconds == 0 {
            Self(DEFAULT_TIME_LIMIT_SECS)
        } else {
            Self(seconds)
        }
    }

    pub fn seconds(&self) -> u64 {
        self.0
    }
}

impl Default for TimeLimit {
    fn default() -> Self {
        Self(DEFAULT_TIME_LIMIT_SECS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Tick { remaining: u64 },
    Expired,
}

/// Per-question countdown, polled from the same task as the input prompt.
///
/// Once expired or cancelled the interval is dropped and `next_event`
/// never resolves again.
#[derive(Debug)]
pub struct Countdown {
    interval: Option<Interval>,
    remaining: u64,
    expired: bool,
}

impl Countdown {
    pub fn start(limit: TimeLimit) -> Self {
        let period = Duration::from_secs(1);
        let mut interval = interval_at(Instant::now() + period, period);
        // A stalled loop must not burst several ticks at once.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!("Countdown started: {}s", limit.seconds());
        Self {
            interval: Some(interval),
            remaining: limit.seconds(),
            expired: false,
        }
    }

    pub async fn next_event(&mut self) -> CountdownEvent {
        let Some(interval) = self.interval.as_mut() else {
            return std::future::pending().await;
        };

        interval.tick().await;
        self.remaining = self.remaining.saturating_sub(1);

        if self.remaining == 0 {
            self.expired = true;
            self.interval = None;
            debug!("Countdown expired");
            CountdownEvent::Expired
        } else {
            CountdownEvent::Tick {
                remaining: self.remaining,
            }
        }
    }

    /// Stops further ticks. No-op once expired or already cancelled.
    pub fn cancel(&mut self) {
        if self.interval.take().is_some() {
            debug!("Countdown cancelled with {}s left", self.remaining);
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn is_cancelled(&self) -> bool {
        self.interval.is_none() && !self.expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, timeout};

    #[test]
    fn test_time_limit_zero_uses_default() {
        assert_eq!(TimeLimit::from_configured(0).seconds(), 10);
        assert_eq!(TimeLimit::from_configured(3).seconds(), 3);
        assert_eq!(TimeLimit::default(), TimeLimit::from_configured(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_then_expires() {
        let started = Instant::now();
        let mut countdown = Countdown::start(TimeLimit::from_configured(3));

        assert_eq!(
            countdown.next_event().await,
            CountdownEvent::Tick { remaining: 2 }
        );
        assert_eq!(
            countdown.next_event().await,
            CountdownEvent::Tick { remaining: 1 }
        );
        assert_eq!(countdown.next_event().await, CountdownEvent::Expired);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert!(countdown.is_expired());
        assert!(!countdown.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_second_limit_expires_without_ticks() {
        let mut countdown = Countdown::start(TimeLimit::from_configured(1));
        assert_eq!(countdown.next_event().await, CountdownEvent::Expired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_events() {
        let mut countdown = Countdown::start(TimeLimit::from_configured(2));
        sleep(Duration::from_millis(500)).await;
        countdown.cancel();
        countdown.cancel();

        let result = timeout(Duration::from_secs(10), countdown.next_event()).await;
        assert!(result.is_err(), "cancelled countdown must stay silent");
        assert!(countdown.is_cancelled());
        assert!(!countdown.is_expired());
        assert_eq!(countdown.remaining(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_expiry_is_noop() {
        let mut countdown = Countdown::start(TimeLimit::from_configured(1));
        assert_eq!(countdown.next_event().await, CountdownEvent::Expired);
        countdown.cancel();
        assert!(countdown.is_expired());
        assert!(!countdown.is_cancelled());
    }
}
