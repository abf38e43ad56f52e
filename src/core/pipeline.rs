//! Raw window to activity label.
//!
//! The pipeline runs its stages strictly in order: normalize the full series,
//! take the trailing window, extract statistics, assemble the canonical
//! vector, and predict. The first failing stage ends the call and its error is
//! returned unchanged. Nothing is retried, since every stage is deterministic
//! for a given input and the artifacts never change.

use crate::core::assembler::{assemble, FeatureVector};
use crate::core::channels::FEATURE_NAMES;
use crate::core::features::{extract, FeatureExtractionError};
use crate::core::normalizer::{normalize, NormalizationError, NormalizationParameters};
use crate::core::windowing::{InsufficientDataError, Window, WINDOW_SIZE};
use crate::model::{predict, Classifier, ClassifierError, Label, UnmappableLabelError};
use serde::Serialize;
use thiserror::Error;

/// Any failure of a pipeline call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    InsufficientData(#[from] InsufficientDataError),
    #[error("error normalizing data: {0}")]
    Normalization(#[from] NormalizationError),
    #[error(transparent)]
    FeatureExtraction(#[from] FeatureExtractionError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    UnmappableLabel(#[from] UnmappableLabelError),
}

/// Who is responsible for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The caller sent unusable input
    ClientInput,
    /// A processing stage failed on otherwise valid input
    Processing,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::InsufficientData(_) => ErrorKind::ClientInput,
            _ => ErrorKind::Processing,
        }
    }

    /// Stable identifier for transports.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::InsufficientData(_) => "INSUFFICIENT_DATA",
            PipelineError::Normalization(_) => "NORMALIZATION_FAILED",
            PipelineError::FeatureExtraction(_) => "FEATURE_EXTRACTION_FAILED",
            PipelineError::Classifier(_) => "CLASSIFIER_FAILED",
            PipelineError::UnmappableLabel(_) => "UNMAPPABLE_LABEL",
        }
    }
}

/// Result of a successful call, with the intermediate feature vector.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub label: Label,
    pub features: FeatureVector,
    pub rows_received: usize,
}

/// The pipeline, borrowing the immutable artifacts it runs with.
#[derive(Clone, Copy)]
pub struct Pipeline<'a> {
    params: &'a NormalizationParameters,
    model: &'a dyn Classifier,
}

impl<'a> Pipeline<'a> {
    pub fn new(params: &'a NormalizationParameters, model: &'a dyn Classifier) -> Self {
        Self { params, model }
    }

    /// Classify the last [`WINDOW_SIZE`] rows of a raw series.
    pub fn run<R: AsRef<[f64]>>(&self, raw_window: &[R]) -> Result<Label, PipelineError> {
        self.evaluate(raw_window).map(|evaluation| evaluation.label)
    }

    /// Like [`run`](Self::run), also returning the assembled features.
    pub fn evaluate<R: AsRef<[f64]>>(&self, raw_window: &[R]) -> Result<Evaluation, PipelineError> {
        let rows_received = raw_window.len();
        if rows_received < WINDOW_SIZE {
            return Err(InsufficientDataError::new(rows_received).into());
        }
        tracing::debug!(rows = rows_received, "Received data");

        let normalized = normalize(raw_window, self.params)?;
        let window = Window::from_tail(&normalized)?;

        let raw_features = extract(&window)?;
        tracing::debug!(features = ?raw_features, "Extracted features");

        let features = assemble(&raw_features, &FEATURE_NAMES);
        let label = predict(&features, self.model)?;
        tracing::info!(label = %label, id = label.id(), "Prediction");

        Ok(Evaluation {
            label,
            features,
            rows_received,
        })
    }
}

impl std::fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("params", self.params)
            .finish_non_exhaustive()
    }
}
