//! Core feature-extraction pipeline.
//!
//! This module contains:
//! - Channel naming and the canonical feature order
//! - Min-max normalization of raw series
//! - Windowing of normalized series and sensor stream merging
//! - Per-channel statistics and feature vector assembly
//! - The orchestrating [`Pipeline`]

pub mod assembler;
pub mod channels;
pub mod features;
pub mod normalizer;
pub mod pipeline;
pub mod windowing;

// Re-export commonly used types
pub use assembler::{assemble, assemble_canonical, FeatureVector, DEFAULT_FEATURE_VALUE};
pub use channels::{
    feature_name, Channel, Sample, Statistic, CHANNEL_COUNT, FEATURE_COUNT, FEATURE_NAMES,
};
pub use features::{extract, ChannelStats, FeatureExtractionError, RawFeatures};
pub use normalizer::{normalize, NormalizationError, NormalizationParameters, ScalerArtifact, ScalerError};
pub use pipeline::{ErrorKind, Evaluation, Pipeline, PipelineError};
pub use windowing::{InsufficientDataError, SensorKind, SensorStreams, Window, WINDOW_SIZE};
