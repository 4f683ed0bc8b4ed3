use serde::Deserialize;
use std::time::Duration;

/// How a like is admitted against the rate cap.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionMode {
    /// Check and record under one entry lock. The cap is exact.
    #[default]
    Atomic,
    /// `can_act` then `record_act` as two critical sections. Concurrent
    /// requests from one actor may over-admit by up to (in-flight - 1).
    CheckThenRecord,
}

/// What `like` does when the actor already has an active like on the target.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateLikePolicy {
    /// Append another active record; each one is counted and reversible.
    #[default]
    Allow,
    /// Fail with `AlreadyLiked` without consuming rate budget.
    Reject,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LikesConfig {
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,
    #[serde(default = "default_rate_cap")]
    pub rate_cap: usize,
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
    #[serde(default)]
    pub admission: AdmissionMode,
    #[serde(default)]
    pub duplicate_likes: DuplicateLikePolicy,
}

impl LikesConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for LikesConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_window_seconds(),
            rate_cap: default_rate_cap(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
            store_timeout_ms: default_store_timeout_ms(),
            admission: AdmissionMode::default(),
            duplicate_likes: DuplicateLikePolicy::default(),
        }
    }
}

fn default_window_seconds() -> u64 {
    180
}

fn default_rate_cap() -> usize {
    3
}

fn default_sweep_interval_seconds() -> u64 {
    60
}

fn default_store_timeout_ms() -> u64 {
    3_000
}
