use serde::Serialize;
use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{validate, AdmissionMode, ConfigError, DuplicateLikePolicy, LikesConfig};
use crate::counter_store::CounterStore;
use crate::error::{LikeError, StoreError};
use crate::ids::{ActorId, LikeId, TargetId};
use crate::ledger::LikeLedger;
use crate::metrics::LikeMetrics;
use crate::rate_limiter::RateLimiter;
use crate::sweeper::{SweepStats, Sweeper};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorLikeStats {
    pub recent_likes: usize,
    pub remaining: usize,
    pub retry_after: Option<Duration>,
}

/// Entry point for like and unlike requests.
///
/// Local state (rate window, ledger) is committed before the durable counter
/// is touched. A store failure is reported to the caller and the local change
/// stays in place.
#[derive(Clone)]
pub struct LikeCoordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    limiter: RateLimiter,
    ledger: LikeLedger,
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
    metrics: Arc<LikeMetrics>,
    config: LikesConfig,
}

impl LikeCoordinator {
    pub fn new(config: LikesConfig, store: Arc<dyn CounterStore>) -> Result<Self, ConfigError> {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    /// Fails if `config` does not pass [`validate`].
    pub fn with_clock(
        config: LikesConfig,
        store: Arc<dyn CounterStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        validate(&config)?;
        let limiter = RateLimiter::new(config.window(), config.rate_cap, clock.clone());
        let ledger = LikeLedger::new(config.window());
        Ok(Self {
            inner: Arc::new(CoordinatorInner {
                limiter,
                ledger,
                store,
                clock,
                metrics: LikeMetrics::new(),
                config,
            }),
        })
    }

    pub async fn like(&self, target: &TargetId, actor: &ActorId) -> Result<LikeId, LikeError> {
        let inner = &self.inner;
        let reject_duplicates = inner.config.duplicate_likes == DuplicateLikePolicy::Reject;

        if reject_duplicates && inner.ledger.has_active_like(target, actor) {
            inner.metrics.inc_likes_duplicate();
            return Err(LikeError::AlreadyLiked);
        }

        if !self.admit(actor) {
            inner.metrics.inc_likes_rate_limited();
            let retry_after = inner.limiter.retry_after(actor);
            debug!(%actor, %target, ?retry_after, "like rejected by rate limit");
            return Err(LikeError::RateLimitExceeded { retry_after });
        }

        let now = inner.clock.now_ms();
        let id = if reject_duplicates {
            // a concurrent like from the same actor may have landed since the
            // first check; the admission slot stays consumed
            match inner.ledger.try_add_like(target, actor, now) {
                Some(id) => id,
                None => {
                    inner.metrics.inc_likes_duplicate();
                    return Err(LikeError::AlreadyLiked);
                }
            }
        } else {
            inner.ledger.add_like(target, actor, now)
        };
        inner.metrics.inc_likes_admitted();
        debug!(%actor, %target, like_id = %id, "like recorded");

        self.sync_store("increment", target, inner.store.increment(target))
            .await?;
        Ok(id)
    }

    pub async fn unlike(&self, target: &TargetId, actor: &ActorId) -> Result<(), LikeError> {
        let inner = &self.inner;
        let now = inner.clock.now_ms();

        let Some(id) = inner.ledger.find_reversible(target, actor, now) else {
            inner.metrics.inc_unlikes_nothing();
            return Err(LikeError::NothingToUnlike);
        };

        if !inner.ledger.deactivate(id) {
            inner.metrics.inc_unlikes_race_lost();
            debug!(%actor, %target, like_id = %id, "unlike lost race");
            return Err(LikeError::UnlikeRaceLost);
        }
        inner.metrics.inc_unlikes();
        debug!(%actor, %target, like_id = %id, "like reversed");

        self.sync_store("decrement", target, inner.store.decrement(target))
            .await?;
        Ok(())
    }

    /// Active likes still inside the window. The durable total lives in the
    /// counter store.
    pub fn count(&self, target: &TargetId) -> usize {
        self.inner.ledger.count_active(target)
    }

    pub fn has_active_like(&self, target: &TargetId, actor: &ActorId) -> bool {
        self.inner.ledger.has_active_like(target, actor)
    }

    pub fn liked_actors(&self, target: &TargetId) -> BTreeSet<ActorId> {
        self.inner.ledger.liked_actors(target)
    }

    pub fn actor_stats(&self, actor: &ActorId) -> ActorLikeStats {
        let limiter = &self.inner.limiter;
        let recent_likes = limiter.recent_count(actor);
        ActorLikeStats {
            recent_likes,
            remaining: limiter.max_actions().saturating_sub(recent_likes),
            retry_after: limiter.retry_after(actor),
        }
    }

    pub fn sweep(&self) -> SweepStats {
        self.sweeper().run_once()
    }

    /// A sweeper over this coordinator's state, ready to be spawned.
    pub fn sweeper(&self) -> Sweeper {
        Sweeper {
            interval: self.inner.config.sweep_interval(),
            limiter: self.inner.limiter.clone(),
            ledger: self.inner.ledger.clone(),
            clock: self.inner.clock.clone(),
            metrics: self.inner.metrics.clone(),
        }
    }

    pub fn metrics(&self) -> &Arc<LikeMetrics> {
        &self.inner.metrics
    }

    pub fn config(&self) -> &LikesConfig {
        &self.inner.config
    }

    pub fn ledger(&self) -> &LikeLedger {
        &self.inner.ledger
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.inner.limiter
    }

    fn admit(&self, actor: &ActorId) -> bool {
        let limiter = &self.inner.limiter;
        match self.inner.config.admission {
            AdmissionMode::Atomic => limiter.try_acquire(actor),
            AdmissionMode::CheckThenRecord => {
                if !limiter.can_act(actor) {
                    return false;
                }
                limiter.record_act(actor);
                true
            }
        }
    }

    async fn sync_store(
        &self,
        op: &'static str,
        target: &TargetId,
        call: impl Future<Output = Result<(), StoreError>>,
    ) -> Result<(), LikeError> {
        let timeout = self.inner.config.store_timeout();
        let start = Instant::now();
        let result = match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(timeout)),
        };
        self.inner.metrics.record_store_latency(start);

        result.map_err(|e| {
            self.inner.metrics.inc_store_failures();
            warn!(%target, op, error = %e, "counter store out of sync with ledger");
            LikeError::Store(e)
        })
    }
}
