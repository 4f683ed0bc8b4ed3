use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::store::CounterStore;
use crate::error::StoreError;
use crate::ids::TargetId;

#[derive(Clone, Default)]
pub struct InMemoryCounterStore {
    counts: Arc<DashMap<TargetId, u64>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, target: &TargetId) -> u64 {
        self.counts.get(target).map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, target: &TargetId) -> Result<(), StoreError> {
        *self.counts.entry(target.clone()).or_insert(0) += 1;
        Ok(())
    }

    async fn decrement(&self, target: &TargetId) -> Result<(), StoreError> {
        if let Some(mut count) = self.counts.get_mut(target) {
            *count = count.saturating_sub(1);
        }
        Ok(())
    }
}
