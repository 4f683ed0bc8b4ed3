use std::time::Duration;
use thiserror::Error;

/// Failure reported by the durable counter store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("counter store unavailable: {0}")]
    Unavailable(String),

    #[error("counter store did not answer within {0:?}")]
    Timeout(Duration),
}

/// Per-request outcome of a like or unlike that did not succeed.
///
/// None of these are fatal. `Store` means local state has already changed and
/// was not rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LikeError {
    #[error("rate limit exceeded")]
    RateLimitExceeded { retry_after: Option<Duration> },

    #[error("target already liked")]
    AlreadyLiked,

    #[error("nothing to unlike within the reversal window")]
    NothingToUnlike,

    #[error("like was reversed concurrently")]
    UnlikeRaceLost,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LikeError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::UnlikeRaceLost | Self::Store(_))
    }
}
