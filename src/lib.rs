//! Activity Classifier - human activity recognition from inertial sensor windows.
//!
//! This library turns a raw multivariate time series (accelerometer,
//! magnetometer and gyroscope, 3 axes each) into one of five activity labels
//! using a pre-trained classifier.
//!
//! # Guarantees
//!
//! - **Fixed window**: Only the last 50 samples of a series are classified
//! - **Fixed layout**: The classifier always sees 36 features in training order
//! - **Closed labels**: A prediction is always one of the 5 canonical labels
//! - **No shared mutation**: Artifacts are immutable once loaded, so calls may
//!   run concurrently without locking
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Activity Classifier                          │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐   ┌────────────┐  │
//! │  │ Normalizer │──▶│ Windowing  │──▶│  Features  │──▶│ Assembler  │  │
//! │  │ (min-max)  │   │ (last 50)  │   │(mean/std/..)│  │ (36, fixed)│  │
//! │  └────────────┘   └────────────┘   └────────────┘   └────────────┘  │
//! │                                                            │        │
//! │                                                            ▼        │
//! │                                                     ┌────────────┐  │
//! │                                                     │ Classifier │  │
//! │                                                     │  → Label   │  │
//! │                                                     └────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use activity_classifier::{ArtifactPaths, Artifacts};
//! use std::path::PathBuf;
//!
//! let artifacts = Artifacts::load(&ArtifactPaths {
//!     scaler: PathBuf::from("scaler.json"),
//!     model: PathBuf::from("model.json"),
//! })
//! .expect("Failed to load artifacts");
//!
//! let rows = vec![vec![0.0; 9]; 60];
//! let label = artifacts.pipeline().run(&rows).expect("Prediction failed");
//! println!("{} ({})", label, label.id());
//! ```

pub mod config;
pub mod core;
pub mod model;
pub mod stats;

#[cfg(feature = "server")]
pub mod server;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, ServerSettings};
pub use core::{
    Channel, ErrorKind, Evaluation, FeatureVector, NormalizationParameters, Pipeline,
    PipelineError, SensorKind, SensorStreams, FEATURE_NAMES, WINDOW_SIZE,
};
pub use model::{
    ArtifactError, ArtifactPaths, Artifacts, Classifier, ClassifierError, Label, RandomForest,
    RawLabel,
};
pub use stats::{PredictionStats, SharedPredictionStats, StatsSnapshot};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
