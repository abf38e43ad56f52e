//! Pre-trained classifier artifacts and the label adapter.
//!
//! This module contains:
//! - The [`Classifier`] seam the pipeline predicts through
//! - The canonical [`Label`] space and raw-output mapping
//! - A JSON-exported random forest implementation
//! - Loading of the immutable artifact pair at startup

pub mod artifacts;
pub mod forest;
pub mod label;

use crate::core::assembler::FeatureVector;
use crate::core::pipeline::PipelineError;
use thiserror::Error;

pub use artifacts::{ArtifactError, ArtifactPaths, Artifacts};
pub use forest::{DecisionTree, ForestArtifact, ModelError, Node, RandomForest};
pub use label::{Label, RawLabel, UnmappableLabelError};

/// A model that cannot be evaluated on the vector it was given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    #[error("classifier expects {expected} features, got {found}")]
    InputWidth { expected: usize, found: usize },
}

/// A trained, immutable decision model producing one raw output per vector.
pub trait Classifier: Send + Sync {
    /// Predict the raw class for a feature vector in canonical order.
    fn predict_raw(&self, features: &[f64]) -> Result<RawLabel, ClassifierError>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict_raw(&self, features: &[f64]) -> Result<RawLabel, ClassifierError> {
        (**self).predict_raw(features)
    }
}

/// Run the model on a feature vector and map its output to a [`Label`].
///
/// Outputs outside the label vocabulary are errors, never a default label.
pub fn predict<C: Classifier + ?Sized>(
    vector: &FeatureVector,
    model: &C,
) -> Result<Label, PipelineError> {
    let raw = model.predict_raw(vector.values())?;
    tracing::debug!(%raw, "Classifier output");
    Ok(Label::try_from(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::assemble_canonical;
    use crate::core::features::RawFeatures;

    struct Fixed(RawLabel);

    impl Classifier for Fixed {
        fn predict_raw(&self, _features: &[f64]) -> Result<RawLabel, ClassifierError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_string_and_integer_outputs_agree() {
        let vector = assemble_canonical(&RawFeatures::new());

        let by_name = predict(&vector, &Fixed(RawLabel::from("running"))).unwrap();
        let by_id = predict(&vector, &Fixed(RawLabel::Id(3))).unwrap();
        assert_eq!(by_name, Label::Running);
        assert_eq!(by_id, Label::Running);
    }

    #[test]
    fn test_unmappable_output() {
        let vector = assemble_canonical(&RawFeatures::new());
        let err = predict(&vector, &Fixed(RawLabel::from("cycling"))).unwrap_err();
        assert_eq!(
            err,
            PipelineError::UnmappableLabel(UnmappableLabelError {
                raw: RawLabel::from("cycling")
            })
        );
    }

    #[test]
    fn test_boxed_classifier() {
        let model: Box<dyn Classifier> = Box::new(Fixed(RawLabel::Id(0)));
        let vector = assemble_canonical(&RawFeatures::new());
        assert_eq!(predict(&vector, &model).unwrap(), Label::Downstairs);
    }

    #[test]
    fn test_classifier_failure_is_processing_error() {
        struct Narrow;

        impl Classifier for Narrow {
            fn predict_raw(&self, features: &[f64]) -> Result<RawLabel, ClassifierError> {
                Err(ClassifierError::InputWidth {
                    expected: 4,
                    found: features.len(),
                })
            }
        }

        let vector = assemble_canonical(&RawFeatures::new());
        let err = predict(&vector, &Narrow).unwrap_err();
        assert_eq!(err.code(), "CLASSIFIER_FAILED");
        assert!(matches!(
            err,
            PipelineError::Classifier(ClassifierError::InputWidth { expected: 4, found: 36 })
        ));
    }
}
