use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::ids::ActorId;
use crate::sweeper::SweepStats;

/// Sliding-window admission control per actor.
///
/// Each actor owns a queue of admitted timestamps in non-decreasing order.
/// A timestamp counts while it is strictly newer than `now - window`.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<RateLimiterInner>,
}

struct RateLimiterInner {
    windows: DashMap<ActorId, VecDeque<i64>>,
    window_ms: i64,
    max_actions: usize,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_actions: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(RateLimiterInner {
                windows: DashMap::new(),
                window_ms: window.as_millis() as i64,
                max_actions,
                clock,
            }),
        }
    }

    pub fn max_actions(&self) -> usize {
        self.inner.max_actions
    }

    pub fn can_act(&self, actor: &ActorId) -> bool {
        self.recent_count(actor) < self.inner.max_actions
    }

    /// Appends `now` without re-checking the cap. Pair with [`can_act`](Self::can_act).
    pub fn record_act(&self, actor: &ActorId) {
        let now = self.inner.clock.now_ms();
        let mut window = self.inner.windows.entry(actor.clone()).or_default();
        push_monotonic(&mut window, now);
    }

    /// Check and record in one critical section on the actor's entry.
    pub fn try_acquire(&self, actor: &ActorId) -> bool {
        let now = self.inner.clock.now_ms();
        if self.inner.max_actions == 0 {
            return false;
        }
        let cutoff = now - self.inner.window_ms;
        let mut window = self.inner.windows.entry(actor.clone()).or_default();
        if count_after(&window, cutoff) >= self.inner.max_actions {
            return false;
        }
        push_monotonic(&mut window, now);
        true
    }

    pub fn recent_count(&self, actor: &ActorId) -> usize {
        let cutoff = self.inner.clock.now_ms() - self.inner.window_ms;
        self.inner
            .windows
            .get(actor)
            .map(|w| count_after(&w, cutoff))
            .unwrap_or(0)
    }

    /// Time until the actor is admitted again, or `None` if it is admitted now.
    pub fn retry_after(&self, actor: &ActorId) -> Option<Duration> {
        let now = self.inner.clock.now_ms();
        let cutoff = now - self.inner.window_ms;
        let window = self.inner.windows.get(actor)?;
        let first_recent = window.partition_point(|&ts| ts <= cutoff);
        let recent = window.len() - first_recent;
        // a zero cap never frees up
        if self.inner.max_actions == 0 || recent < self.inner.max_actions {
            return None;
        }
        // The cap frees up once enough of the oldest recent entries expire.
        let blocking = window[first_recent + (recent - self.inner.max_actions)];
        let wait_ms = (blocking + self.inner.window_ms - now).max(0);
        Some(Duration::from_millis(wait_ms as u64))
    }

    pub fn tracked_actors(&self) -> usize {
        self.inner.windows.len()
    }

    pub fn sweep(&self, now_ms: i64) -> SweepStats {
        let cutoff = now_ms - self.inner.window_ms;
        let mut stats = SweepStats::default();
        self.inner.windows.retain(|_, window| {
            while window.front().is_some_and(|&ts| ts <= cutoff) {
                window.pop_front();
                stats.entries_removed += 1;
            }
            if window.is_empty() {
                stats.actors_evicted += 1;
                false
            } else {
                true
            }
        });
        stats
    }
}

fn count_after(window: &VecDeque<i64>, cutoff: i64) -> usize {
    window.len() - window.partition_point(|&ts| ts <= cutoff)
}

fn push_monotonic(window: &mut VecDeque<i64>, now: i64) {
    let ts = window.back().map_or(now, |&last| last.max(now));
    window.push_back(ts);
}
