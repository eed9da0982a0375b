//! Queueing rate limiter for eBay API calls.
//!
//! eBay limits applications to a fixed number of calls per day (5000 by
//! default; approved applications get more). The limiter here never rejects a
//! call: callers wait in FIFO order until the window has room.
//!
//! # Algorithm
//!
//! The limiter keeps the admission time of every call inside the current
//! window. A new call is admitted immediately while fewer than
//! `max_requests` calls were admitted during the last `per`; otherwise it
//! sleeps until the oldest admission ages out of the window.
//!
//! Waiters queue on a fair [`tokio::sync::Mutex`], so they are admitted in
//! the order they arrived.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

const ONE_DAY: Duration = Duration::from_secs(60 * 60 * 24);

/// Ceiling of `max_requests` calls per `per` window.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use ebay_trading::transport::RateLimitConfig;
///
/// let config = RateLimitConfig::default();
/// assert_eq!(config.max_requests, 5000);
/// assert_eq!(config.per, Duration::from_secs(86_400));
///
/// let approved = RateLimitConfig::per_day(1_500_000);
/// assert_eq!(approved.max_requests, 1_500_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum number of calls admitted per window.
    pub max_requests: u32,
    /// Window length.
    pub per: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::per_day(5000)
    }
}

impl RateLimitConfig {
    /// Creates a config admitting `max_requests` calls per `per`.
    #[must_use]
    pub const fn new(max_requests: u32, per: Duration) -> Self {
        Self { max_requests, per }
    }

    /// Creates a config admitting `max_requests` calls per day.
    #[must_use]
    pub const fn per_day(max_requests: u32) -> Self {
        Self::new(max_requests, ONE_DAY)
    }
}

/// A FIFO queueing limiter shared by every request sent through a transport.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter with an empty window.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            admitted: Mutex::new(VecDeque::new()),
        }
    }

    /// Returns the limiter configuration.
    #[must_use]
    pub const fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Waits until a call may be sent, then records it.
    ///
    /// This never fails; it only delays.
    pub async fn acquire(&self) {
        let capacity = self.config.max_requests.max(1) as usize;
        let mut admitted = self.admitted.lock().await;

        loop {
            let now = Instant::now();
            while admitted
                .front()
                .is_some_and(|oldest| now.duration_since(*oldest) >= self.config.per)
            {
                admitted.pop_front();
            }

            if admitted.len() < capacity {
                admitted.push_back(now);
                return;
            }

            if let Some(&oldest) = admitted.front() {
                let ready_at = oldest + self.config.per;
                debug!(
                    "Rate limit of {} calls per {:?} reached, waiting {:?}",
                    self.config.max_requests,
                    self.config.per,
                    ready_at.saturating_duration_since(now)
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }
    }

    /// Returns how many calls were admitted within the current window.
    pub async fn in_window(&self) -> usize {
        let admitted = self.admitted.lock().await;
        let now = Instant::now();
        admitted
            .iter()
            .filter(|at| now.duration_since(**at) < self.config.per)
            .count()
    }
}
