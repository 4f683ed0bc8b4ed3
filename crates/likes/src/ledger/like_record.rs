use serde::Serialize;

use crate::ids::{ActorId, LikeId, TargetId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeRecord {
    pub id: LikeId,
    pub actor: ActorId,
    pub target: TargetId,
    pub timestamp_ms: i64,
    pub active: bool,
}

impl LikeRecord {
    pub fn new(target: TargetId, actor: ActorId, timestamp_ms: i64) -> Self {
        Self {
            id: LikeId::generate(),
            actor,
            target,
            timestamp_ms,
            active: true,
        }
    }

    pub(crate) fn is_active_on(&self, target: &TargetId) -> bool {
        self.active && &self.target == target
    }
}
