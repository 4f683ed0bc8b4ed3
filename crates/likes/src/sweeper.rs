use std::ops::Add;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::ledger::LikeLedger;
use crate::metrics::LikeMetrics;
use crate::rate_limiter::RateLimiter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub actors_evicted: usize,
    pub entries_removed: usize,
}

impl Add for SweepStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            actors_evicted: self.actors_evicted + rhs.actors_evicted,
            entries_removed: self.entries_removed + rhs.entries_removed,
        }
    }
}

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Periodically prunes the rate limiter and the ledger of expired entries.
pub struct Sweeper {
    pub interval: Duration,
    pub limiter: RateLimiter,
    pub ledger: LikeLedger,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<LikeMetrics>,
}

pub struct SweeperHandle {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Cancels the loop and waits for it to exit.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "sweeper task join failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Sweeper {
    /// Rate limiter first, then ledger.
    pub fn run_once(&self) -> SweepStats {
        let now = self.clock.now_ms();
        let stats = self.limiter.sweep(now) + self.ledger.sweep(now);
        self.metrics.record_sweep(stats);
        stats
    }

    pub fn spawn(self, shutdown: CancellationToken) -> SweeperHandle {
        let token = shutdown.clone();
        let handle = tokio::spawn(async move {
            if self.interval < MIN_INTERVAL {
                tracing::warn!(interval = ?self.interval, "sweep interval too small, clamping");
            }
            let period = self.interval.max(MIN_INTERVAL);
            tracing::info!(interval_ms = period.as_millis() as u64, "sweeper started");
            let mut ticker = tokio::time::interval(period);
            // first tick completes immediately
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let stats = self.run_once();
                        if stats != SweepStats::default() {
                            tracing::info!(
                                actors_evicted = stats.actors_evicted,
                                entries_removed = stats.entries_removed,
                                "sweep pruned expired entries"
                            );
                        }
                    }
                    _ = token.cancelled() => break,
                }
            }
            tracing::info!("sweeper stopped");
        });
        SweeperHandle { shutdown, handle }
    }
}
