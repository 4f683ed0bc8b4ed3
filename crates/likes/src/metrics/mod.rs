pub mod exposition;
pub mod like_metrics;

pub use like_metrics::LikeMetrics;
