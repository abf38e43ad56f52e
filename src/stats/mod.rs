//! Statistics about pipeline usage.
//!
//! Only counts are kept; no sensor data or feature values are retained.

pub mod log;

// Re-export commonly used types
pub use log::{
    create_shared_stats, create_shared_stats_with_persistence, PredictionStats,
    SharedPredictionStats, StatsSnapshot,
};
