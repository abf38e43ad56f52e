//! Random-forest classifier loaded from a JSON export.
//!
//! Each tree is a flat node array rooted at index 0. Split nodes send a
//! sample left when `x[feature] <= threshold`. Leaf weights are normalized per
//! tree and averaged across the forest; the class with the highest mean
//! probability wins, with ties going to the earlier class.

use crate::core::channels::FEATURE_COUNT;
use crate::model::label::RawLabel;
use crate::model::{Classifier, ClassifierError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a model artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model expects {found} features, pipeline produces {expected}")]
    FeatureCount { expected: usize, found: usize },
    #[error("model has no classes")]
    NoClasses,
    #[error("model has no trees")]
    NoTrees,
    #[error("tree {tree} node {node}: {reason}")]
    InvalidNode {
        tree: usize,
        node: usize,
        reason: String,
    },
}

/// One node of a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    /// Class probabilities for one sample. Only valid on a validated tree
    /// with a full-width feature slice.
    fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Node::Leaf { value } => {
                    let total: f64 = value.iter().sum();
                    return value.iter().map(|v| v / total).collect();
                }
            }
        }
    }

    fn validate(&self, tree: usize, n_features: usize, n_classes: usize) -> Result<(), ModelError> {
        let invalid = |node, reason: String| ModelError::InvalidNode { tree, node, reason };

        if self.nodes.is_empty() {
            return Err(invalid(0, "tree is empty".to_string()));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(invalid(i, format!("feature index {feature} out of range")));
                    }
                    if threshold.is_nan() {
                        return Err(invalid(i, "threshold is NaN".to_string()));
                    }
                    // Children must point forward, which also rules out cycles.
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(invalid(i, format!("child index {child} is invalid")));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(invalid(
                            i,
                            format!("leaf has {} weights for {} classes", value.len(), n_classes),
                        ));
                    }
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return Err(invalid(i, "leaf weights must be finite and non-negative".to_string()));
                    }
                    if value.iter().sum::<f64>() <= 0.0 {
                        return Err(invalid(i, "leaf weights sum to zero".to_string()));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Model artifact as stored on disk, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub n_features: usize,
    pub classes: Vec<RawLabel>,
    pub trees: Vec<DecisionTree>,
}

/// An ensemble of decision trees voting by averaged probability.
///
/// Every constructor, deserialization included, validates the forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ForestArtifact")]
pub struct RandomForest {
    n_features: usize,
    classes: Vec<RawLabel>,
    trees: Vec<DecisionTree>,
}

impl TryFrom<ForestArtifact> for RandomForest {
    type Error = ModelError;

    fn try_from(artifact: ForestArtifact) -> Result<Self, Self::Error> {
        Self::new(artifact.n_features, artifact.classes, artifact.trees)
    }
}

impl RandomForest {
    /// Validate a forest for use with the feature pipeline.
    pub fn new(
        n_features: usize,
        classes: Vec<RawLabel>,
        trees: Vec<DecisionTree>,
    ) -> Result<Self, ModelError> {
        let forest = Self {
            n_features,
            classes,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    /// Load and validate a model artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: ForestArtifact = serde_json::from_str(json)?;
        Self::try_from(artifact)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.n_features != FEATURE_COUNT {
            return Err(ModelError::FeatureCount {
                expected: FEATURE_COUNT,
                found: self.n_features,
            });
        }
        if self.classes.is_empty() {
            return Err(ModelError::NoClasses);
        }
        if self.trees.is_empty() {
            return Err(ModelError::NoTrees);
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.n_features, self.classes.len())?;
        }
        Ok(())
    }

    pub fn classes(&self) -> &[RawLabel] {
        &self.classes
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Mean class probabilities across all trees.
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ClassifierError> {
        if features.len() != self.n_features {
            return Err(ClassifierError::InputWidth {
                expected: self.n_features,
                found: features.len(),
            });
        }

        let mut sums = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (sum, p) in sums.iter_mut().zip(tree.predict_proba(features)) {
                *sum += p;
            }
        }
        let n = self.trees.len() as f64;
        Ok(sums.iter().map(|s| s / n).collect())
    }
}

impl Classifier for RandomForest {
    fn predict_raw(&self, features: &[f64]) -> Result<RawLabel, ClassifierError> {
        let proba = self.predict_proba(features)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(self.classes[best].clone())
    }
}
