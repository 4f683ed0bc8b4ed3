use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use super::like_record::LikeRecord;
use crate::ids::{ActorId, LikeId, TargetId};
use crate::sweeper::SweepStats;

/// In-memory record of who liked what, and whether it can still be undone.
///
/// Records are kept per actor in insertion order. `by_id` maps a record id
/// back to its actor so [`deactivate`](Self::deactivate) touches one entry.
/// Lock order is `by_actor` then `by_id`; nothing holds a `by_id` guard while
/// locking `by_actor`.
#[derive(Clone)]
pub struct LikeLedger {
    inner: Arc<LedgerInner>,
}

struct LedgerInner {
    by_actor: DashMap<ActorId, Vec<LikeRecord>>,
    by_id: DashMap<LikeId, ActorId>,
    window_ms: i64,
}

impl LikeLedger {
    pub fn new(window: Duration) -> Self {
        Self {
            inner: Arc::new(LedgerInner {
                by_actor: DashMap::new(),
                by_id: DashMap::new(),
                window_ms: window.as_millis() as i64,
            }),
        }
    }

    pub fn add_like(&self, target: &TargetId, actor: &ActorId, timestamp_ms: i64) -> LikeId {
        let mut records = self.inner.by_actor.entry(actor.clone()).or_default();
        self.append(&mut records, target, actor, timestamp_ms)
    }

    /// Like [`add_like`](Self::add_like), but only if the actor has no active
    /// record for `target`. The check and the append share one entry lock.
    pub fn try_add_like(
        &self,
        target: &TargetId,
        actor: &ActorId,
        timestamp_ms: i64,
    ) -> Option<LikeId> {
        let mut records = self.inner.by_actor.entry(actor.clone()).or_default();
        if records.iter().any(|r| r.is_active_on(target)) {
            return None;
        }
        Some(self.append(&mut records, target, actor, timestamp_ms))
    }

    fn append(
        &self,
        records: &mut Vec<LikeRecord>,
        target: &TargetId,
        actor: &ActorId,
        timestamp_ms: i64,
    ) -> LikeId {
        let record = LikeRecord::new(target.clone(), actor.clone(), timestamp_ms);
        let id = record.id;
        records.push(record);
        self.inner.by_id.insert(id, actor.clone());
        id
    }

    /// Newest active record by `actor` on `target` still inside the window.
    pub fn find_reversible(
        &self,
        target: &TargetId,
        actor: &ActorId,
        now_ms: i64,
    ) -> Option<LikeId> {
        let cutoff = now_ms - self.inner.window_ms;
        let records = self.inner.by_actor.get(actor)?;
        records
            .iter()
            .rev()
            .find(|r| r.is_active_on(target) && r.timestamp_ms > cutoff)
            .map(|r| r.id)
    }

    /// Flips the record to inactive. Returns `false` if it is unknown or
    /// already inactive.
    pub fn deactivate(&self, id: LikeId) -> bool {
        let Some(actor) = self.inner.by_id.get(&id).map(|a| a.value().clone()) else {
            return false;
        };
        let Some(mut records) = self.inner.by_actor.get_mut(&actor) else {
            return false;
        };
        match records.iter_mut().find(|r| r.id == id && r.active) {
            Some(record) => {
                record.active = false;
                true
            }
            None => false,
        }
    }

    pub fn count_active(&self, target: &TargetId) -> usize {
        self.inner
            .by_actor
            .iter()
            .map(|entry| entry.value().iter().filter(|r| r.is_active_on(target)).count())
            .sum()
    }

    pub fn liked_actors(&self, target: &TargetId) -> BTreeSet<ActorId> {
        self.inner
            .by_actor
            .iter()
            .filter(|entry| entry.value().iter().any(|r| r.is_active_on(target)))
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn has_active_like(&self, target: &TargetId, actor: &ActorId) -> bool {
        self.inner
            .by_actor
            .get(actor)
            .is_some_and(|records| records.iter().any(|r| r.is_active_on(target)))
    }

    pub fn get(&self, id: LikeId) -> Option<LikeRecord> {
        let actor = self.inner.by_id.get(&id).map(|a| a.value().clone())?;
        let records = self.inner.by_actor.get(&actor)?;
        records.iter().find(|r| r.id == id).cloned()
    }

    pub fn tracked_actors(&self) -> usize {
        self.inner.by_actor.len()
    }

    pub fn record_count(&self) -> usize {
        self.inner.by_id.len()
    }

    /// Discards every record at or beyond the window, active or not.
    pub fn sweep(&self, now_ms: i64) -> SweepStats {
        let cutoff = now_ms - self.inner.window_ms;
        let by_id = &self.inner.by_id;
        let mut stats = SweepStats::default();
        self.inner.by_actor.retain(|_, records| {
            records.retain(|r| {
                let keep = r.timestamp_ms > cutoff;
                if !keep {
                    // takes by_id under the by_actor guard, per the lock order above
                    by_id.remove(&r.id);
                    stats.entries_removed += 1;
                }
                keep
            });
            if records.is_empty() {
                stats.actors_evicted += 1;
                false
            } else {
                true
            }
        });
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(180);
    const T0: i64 = 1_700_000_000_000;
    const SEC: i64 = 1_000;

    fn ids() -> (TargetId, ActorId) {
        (TargetId::from("post-1"), ActorId::from("user-1"))
    }

    #[test]
    fn add_like_always_creates_new_record() {
        let ledger = LikeLedger::new(WINDOW);
        let (t, a) = ids();
        let first = ledger.add_like(&t, &a, T0);
        let second = ledger.add_like(&t, &a, T0);
        assert_ne!(first, second);
        assert_eq!(ledger.count_active(&t), 2);
        assert_eq!(ledger.record_count(), 2);
    }

    #[test]
    fn try_add_like_refuses_while_active() {
        let ledger = LikeLedger::new(WINDOW);
        let (t, a) = ids();
        let id = ledger.try_add_like(&t, &a, T0).unwrap();
        assert!(ledger.try_add_like(&t, &a, T0 + SEC).is_none());
        assert!(ledger.try_add_like(&TargetId::from("post-2"), &a, T0).is_some());

        assert!(ledger.deactivate(id));
        assert!(ledger.try_add_like(&t, &a, T0 + 2 * SEC).is_some());
    }

    #[test]
    fn find_reversible_prefers_newest() {
        let ledger = LikeLedger::new(WINDOW);
        let (t, a) = ids();
        let _older = ledger.add_like(&t, &a, T0);
        let newer = ledger.add_like(&t, &a, T0 + SEC);
        assert_eq!(ledger.find_reversible(&t, &a, T0 + 2 * SEC), Some(newer));
    }

    #[test]
    fn find_reversible_skips_other_targets_and_inactive() {
        let ledger = LikeLedger::new(WINDOW);
        let (t, a) = ids();
        let mine = ledger.add_like(&t, &a, T0);
        ledger.add_like(&TargetId::from("post-2"), &a, T0 + SEC);
        assert_eq!(ledger.find_reversible(&t, &a, T0 + 2 * SEC), Some(mine));

        ledger.deactivate(mine);
        assert_eq!(ledger.find_reversible(&t, &a, T0 + 2 * SEC), None);
    }

    #[test]
    fn find_reversible_respects_window() {
        let ledger = LikeLedger::new(WINDOW);
        let (t, a) = ids();
        let id = ledger.add_like(&t, &a, T0);
        assert_eq!(ledger.find_reversible(&t, &a, T0 + 180 * SEC - 1), Some(id));
        assert_eq!(ledger.find_reversible(&t, &a, T0 + 180 * SEC), None);
        // still present and active until swept
        assert!(ledger.has_active_like(&t, &a));
        assert!(ledger.get(id).unwrap().active);
    }

    #[test]
    fn deactivate_is_one_way() {
        let ledger = LikeLedger::new(WINDOW);
        let (t, a) = ids();
        let id = ledger.add_like(&t, &a, T0);
        assert!(ledger.deactivate(id));
        assert!(!ledger.deactivate(id));
        assert!(!ledger.get(id).unwrap().active);
        assert!(!ledger.has_active_like(&t, &a));
    }

    #[test]
    fn deactivate_unknown_returns_false() {
        let ledger = LikeLedger::new(WINDOW);
        assert!(!ledger.deactivate(LikeId::generate()));
    }

    #[test]
    fn liked_actors_deduplicates() {
        let ledger = LikeLedger::new(WINDOW);
        let t = TargetId::from("post-1");
        ledger.add_like(&t, &ActorId::from("u1"), T0);
        ledger.add_like(&t, &ActorId::from("u1"), T0 + SEC);
        ledger.add_like(&t, &ActorId::from("u2"), T0);
        let gone = ledger.add_like(&t, &ActorId::from("u3"), T0);
        ledger.deactivate(gone);

        let actors: Vec<_> = ledger.liked_actors(&t).into_iter().collect();
        assert_eq!(actors, vec![ActorId::from("u1"), ActorId::from("u2")]);
    }

    #[test]
    fn count_matches_has_active_like() {
        let ledger = LikeLedger::new(WINDOW);
        let t = TargetId::from("post-1");
        let actors: Vec<ActorId> = (0..5).map(|i| ActorId::new(format!("u{i}"))).collect();
        for (i, a) in actors.iter().enumerate() {
            let id = ledger.add_like(&t, a, T0 + i as i64);
            if i % 2 == 0 {
                ledger.deactivate(id);
            }
        }
        let liked = actors.iter().filter(|a| ledger.has_active_like(&t, a)).count();
        assert_eq!(ledger.count_active(&t), liked);
        assert_eq!(liked, 2);
    }

    #[test]
    fn sweep_drops_old_records_and_empty_actors() {
        let ledger = LikeLedger::new(WINDOW);
        let t = TargetId::from("post-1");
        let old = ledger.add_like(&t, &ActorId::from("u1"), T0);
        ledger.add_like(&t, &ActorId::from("u2"), T0);
        let recent = ledger.add_like(&t, &ActorId::from("u2"), T0 + 100 * SEC);

        let stats = ledger.sweep(T0 + 180 * SEC);
        assert_eq!(stats.entries_removed, 2);
        assert_eq!(stats.actors_evicted, 1);
        assert_eq!(ledger.tracked_actors(), 1);
        assert_eq!(ledger.record_count(), 1);
        assert!(ledger.get(old).is_none());
        assert!(!ledger.deactivate(old));
        assert!(ledger.get(recent).is_some());
        assert_eq!(ledger.count_active(&t), 1);
    }

    #[test]
    fn sweep_is_idempotent() {
        let ledger = LikeLedger::new(WINDOW);
        let (t, a) = ids();
        ledger.add_like(&t, &a, T0);
        ledger.add_like(&t, &a, T0 + 150 * SEC);
        let now = T0 + 200 * SEC;

        let first = ledger.sweep(now);
        let snapshot = (ledger.tracked_actors(), ledger.record_count(), ledger.count_active(&t));
        let second = ledger.sweep(now);
        assert_eq!(first.entries_removed, 1);
        assert_eq!(second, SweepStats::default());
        assert_eq!(
            snapshot,
            (ledger.tracked_actors(), ledger.record_count(), ledger.count_active(&t))
        );
    }
}
