//! In-process like/unlike core for the fanpage backend.
//!
//! A [`LikeCoordinator`] admits likes through a per-actor sliding-window
//! [`RateLimiter`], records them in a volatile [`LikeLedger`] that allows a
//! like to be reversed within the same window, and mirrors every change into
//! an external [`CounterStore`]. A [`Sweeper`] task bounds memory by pruning
//! both structures of entries older than the window.
//!
//! The ledger is not persisted. After a restart it starts empty and earlier
//! likes are only visible through the durable counter.

pub mod clock;
pub mod config;
pub mod coordinator;
pub mod counter_store;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod metrics;
pub mod rate_limiter;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AdmissionMode, DuplicateLikePolicy, LikesConfig};
pub use coordinator::{ActorLikeStats, LikeCoordinator};
pub use counter_store::{CounterStore, InMemoryCounterStore};
pub use error::{LikeError, StoreError};
pub use ids::{ActorId, LikeId, TargetId};
pub use ledger::{LikeLedger, LikeRecord};
pub use metrics::LikeMetrics;
pub use rate_limiter::RateLimiter;
pub use sweeper::{SweepStats, Sweeper, SweeperHandle};
