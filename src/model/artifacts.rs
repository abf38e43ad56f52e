//! Loading of the normalization parameters and classifier at startup.
//!
//! Both artifacts are loaded exactly once and never mutated afterwards. A
//! failure to load either one leaves the process without a usable pipeline.

use crate::core::normalizer::{NormalizationParameters, ScalerError};
use crate::core::pipeline::Pipeline;
use crate::model::forest::{ModelError, RandomForest};
use crate::model::Classifier;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Locations of the persisted artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub scaler: PathBuf,
    pub model: PathBuf,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to load scaler from {path:?}: {source}")]
    Scaler {
        path: PathBuf,
        #[source]
        source: ScalerError,
    },
    #[error("failed to load model from {path:?}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

/// The immutable artifact pair shared by every pipeline invocation.
pub struct Artifacts {
    params: NormalizationParameters,
    model: Box<dyn Classifier>,
}

impl Artifacts {
    pub fn new(params: NormalizationParameters, model: Box<dyn Classifier>) -> Self {
        Self { params, model }
    }

    /// Load the scaler and random-forest model from disk.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        let params =
            NormalizationParameters::load(&paths.scaler).map_err(|source| ArtifactError::Scaler {
                path: paths.scaler.clone(),
                source,
            })?;
        tracing::info!(path = ?paths.scaler, "Loaded normalization parameters");

        let model = RandomForest::load(&paths.model).map_err(|source| ArtifactError::Model {
            path: paths.model.clone(),
            source,
        })?;
        tracing::info!(
            path = ?paths.model,
            trees = model.tree_count(),
            classes = model.classes().len(),
            "Loaded classifier"
        );

        Ok(Self::new(params, Box::new(model)))
    }

    pub fn params(&self) -> &NormalizationParameters {
        &self.params
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }

    /// A pipeline borrowing these artifacts.
    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(&self.params, self.model.as_ref())
    }
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
