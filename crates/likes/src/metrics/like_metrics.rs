use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::sweeper::SweepStats;

#[derive(Debug, Default)]
pub struct LikeMetrics {
    likes_admitted: AtomicU64,
    likes_rate_limited: AtomicU64,
    likes_duplicate: AtomicU64,
    unlikes: AtomicU64,
    unlikes_nothing: AtomicU64,
    unlikes_race_lost: AtomicU64,
    store_failures: AtomicU64,
    sweeps: AtomicU64,
    swept_entries: AtomicU64,
    swept_actors: AtomicU64,
    store_latency_sum_us: AtomicU64,
    store_latency_count: AtomicU64,
}

impl LikeMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_likes_admitted(&self) {
        self.likes_admitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_likes_rate_limited(&self) {
        self.likes_rate_limited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_likes_duplicate(&self) {
        self.likes_duplicate.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_unlikes(&self) {
        self.unlikes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_unlikes_nothing(&self) {
        self.unlikes_nothing.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_unlikes_race_lost(&self) {
        self.unlikes_race_lost.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_store_failures(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sweep(&self, stats: SweepStats) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.swept_entries
            .fetch_add(stats.entries_removed as u64, Ordering::Relaxed);
        self.swept_actors
            .fetch_add(stats.actors_evicted as u64, Ordering::Relaxed);
    }

    pub fn record_store_latency(&self, start: Instant) {
        let us = start.elapsed().as_micros() as u64;
        self.store_latency_sum_us.fetch_add(us, Ordering::Relaxed);
        self.store_latency_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn likes_admitted_val(&self) -> u64 {
        self.likes_admitted.load(Ordering::Relaxed)
    }

    pub fn likes_rate_limited_val(&self) -> u64 {
        self.likes_rate_limited.load(Ordering::Relaxed)
    }

    pub fn likes_duplicate_val(&self) -> u64 {
        self.likes_duplicate.load(Ordering::Relaxed)
    }

    pub fn unlikes_val(&self) -> u64 {
        self.unlikes.load(Ordering::Relaxed)
    }

    pub fn unlikes_nothing_val(&self) -> u64 {
        self.unlikes_nothing.load(Ordering::Relaxed)
    }

    pub fn unlikes_race_lost_val(&self) -> u64 {
        self.unlikes_race_lost.load(Ordering::Relaxed)
    }

    pub fn store_failures_val(&self) -> u64 {
        self.store_failures.load(Ordering::Relaxed)
    }

    pub fn sweeps_val(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    pub fn swept_entries_val(&self) -> u64 {
        self.swept_entries.load(Ordering::Relaxed)
    }

    pub fn swept_actors_val(&self) -> u64 {
        self.swept_actors.load(Ordering::Relaxed)
    }

    pub fn store_latency_vals(&self) -> (u64, u64) {
        (
            self.store_latency_sum_us.load(Ordering::Relaxed),
            self.store_latency_count.load(Ordering::Relaxed),
        )
    }
}
