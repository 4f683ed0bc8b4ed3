use async_trait::async_trait;

use crate::error::StoreError;
use crate::ids::TargetId;

/// Durable per-target like counter, the system of record for totals.
///
/// Implementations clamp at zero; a decrement on a zero counter succeeds and
/// leaves it at zero.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn increment(&self, target: &TargetId) -> Result<(), StoreError>;

    async fn decrement(&self, target: &TargetId) -> Result<(), StoreError>;
}
