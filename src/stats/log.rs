//! Prediction statistics.
//!
//! Counts requests, predictions per label and failures per kind. Counters are
//! atomic so a single log can be shared across concurrent pipeline calls.

use crate::core::pipeline::ErrorKind;
use crate::model::Label;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Running counters for the current process.
#[derive(Debug)]
pub struct PredictionStats {
    /// Number of pipeline calls received
    requests: AtomicU64,
    /// Successful predictions, indexed by label id
    predictions: [AtomicU64; 5],
    /// Failures caused by caller input
    client_errors: AtomicU64,
    /// Failures inside a processing stage
    processing_errors: AtomicU64,
    /// Expected features that had to be filled with the default value
    defaulted_features: AtomicU64,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Path for persisting stats
    persist_path: Option<PathBuf>,
}

impl PredictionStats {
    pub fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            predictions: Default::default(),
            client_errors: AtomicU64::new(0),
            processing_errors: AtomicU64::new(0),
            defaulted_features: AtomicU64::new(0),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a stats log that resumes from, and saves to, a file.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut stats = Self::new();
        stats.persist_path = Some(path);

        if let Err(e) = stats.load() {
            tracing::warn!("Could not load previous prediction stats: {e}");
        }

        stats
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_prediction(&self, label: Label) {
        self.predictions[usize::from(label.id())].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, kind: ErrorKind) {
        let counter = match kind {
            ErrorKind::ClientInput => &self.client_errors,
            ErrorKind::Processing => &self.processing_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_defaulted_features(&self, count: u64) {
        self.defaulted_features.fetch_add(count, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> StatsSnapshot {
        let predictions = Label::ALL
            .iter()
            .map(|&label| {
                (
                    label,
                    self.predictions[usize::from(label.id())].load(Ordering::Relaxed),
                )
            })
            .collect();

        StatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            predictions,
            client_errors: self.client_errors.load(Ordering::Relaxed),
            processing_errors: self.processing_errors.load(Ordering::Relaxed),
            defaulted_features: self.defaulted_features.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        let per_label = stats
            .predictions
            .iter()
            .map(|(label, count)| format!("   - {label}: {count}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Prediction Statistics:\n\
             - Requests received: {}\n\
             - Predictions: {}\n\
             {}\n\
             - Client input errors: {}\n\
             - Processing errors: {}\n\
             - Default-filled features: {}\n\
             - Session duration: {} seconds",
            stats.requests,
            stats.total_predictions(),
            per_label,
            stats.client_errors,
            stats.processing_errors,
            stats.defaulted_features,
            stats.session_duration_secs
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedStats {
                requests: stats.requests,
                predictions: stats.predictions,
                client_errors: stats.client_errors,
                processing_errors: stats.processing_errors,
                defaulted_features: stats.defaulted_features,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.requests.store(persisted.requests, Ordering::Relaxed);
                for (label, count) in persisted.predictions {
                    self.predictions[usize::from(label.id())].store(count, Ordering::Relaxed);
                }
                self.client_errors
                    .store(persisted.client_errors, Ordering::Relaxed);
                self.processing_errors
                    .store(persisted.processing_errors, Ordering::Relaxed);
                self.defaulted_features
                    .store(persisted.defaulted_features, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.requests.store(0, Ordering::Relaxed);
        for counter in &self.predictions {
            counter.store(0, Ordering::Relaxed);
        }
        self.client_errors.store(0, Ordering::Relaxed);
        self.processing_errors.store(0, Ordering::Relaxed);
        self.defaulted_features.store(0, Ordering::Relaxed);
    }
}

impl Default for PredictionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of prediction statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub requests: u64,
    pub predictions: BTreeMap<Label, u64>,
    pub client_errors: u64,
    pub processing_errors: u64,
    pub defaulted_features: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

impl StatsSnapshot {
    pub fn total_predictions(&self) -> u64 {
        self.predictions.values().sum()
    }
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    requests: u64,
    predictions: BTreeMap<Label, u64>,
    client_errors: u64,
    processing_errors: u64,
    defaulted_features: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared prediction stats.
pub type SharedPredictionStats = Arc<PredictionStats>;

pub fn create_shared_stats() -> SharedPredictionStats {
    Arc::new(PredictionStats::new())
}

pub fn create_shared_stats_with_persistence(path: PathBuf) -> SharedPredictionStats {
    Arc::new(PredictionStats::with_persistence(path))
}
