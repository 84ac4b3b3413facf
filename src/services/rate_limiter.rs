use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::sleep;

/// Per-client counter for the current window.
#[derive(Debug, Clone)]
struct Window {
    reset_at: DateTime<Utc>,
    count: u32,
}

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed { remaining: u32 },
    Limited { retry_after_secs: u64 },
}

/// Fixed-window request limiter keyed by client address.
///
/// The window store is shared by clones, so one limiter built at startup can
/// be handed to the middleware and to the background sweeper.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<String, Window>>,
    times: u32,
    period: Duration,
}

impl RateLimiter {
    pub fn new(times: u32, period_secs: u64) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            times: times.max(1),
            period: Duration::seconds(period_secs.max(1) as i64),
        }
    }

    pub fn check(&self, key: &str) -> Admission {
        self.check_at(key, Utc::now())
    }

    pub fn check_at(&self, key: &str, now: DateTime<Utc>) -> Admission {
        let mut window = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| Window {
                reset_at: now + self.period,
                count: 0,
            });

        if now >= window.reset_at {
            window.reset_at = now + self.period;
            window.count = 0;
        }

        if window.count < self.times {
            window.count += 1;
            Admission::Allowed {
                remaining: self.times - window.count,
            }
        } else {
            let wait = (window.reset_at - now).num_milliseconds().max(0) as u64;
            Admission::Limited {
                retry_after_secs: wait.div_ceil(1000).max(1),
            }
        }
    }

    /// Drops windows that have already expired.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, window| window.reset_at > now);
        before - self.windows.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Periodically purges expired windows until shutdown is signalled.
    pub async fn run_sweeper(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("🧹 Rate limiter sweeper started");
        let interval = self
            .period
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(60));

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    tracing::info!("🛑 Rate limiter sweeper shutting down");
                    break;
                }
                _ = sleep(interval) => {
                    let purged = self.purge_expired(Utc::now());
                    if purged > 0 {
                        tracing::debug!("Purged {} expired rate limit windows", purged);
                    }
                }
            }
        }
    }
}
