//! Feature vector assembly in classifier order.
//!
//! This is the only stage that imposes an order on features. Expected names
//! missing from the raw features are filled with `0.0` rather than failing;
//! names that are not expected are dropped.

use crate::core::channels::FEATURE_NAMES;
use crate::core::features::RawFeatures;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Value used for expected features that were not extracted.
pub const DEFAULT_FEATURE_VALUE: f64 = 0.0;

/// Ordered feature names and values, ready for the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
    defaulted: Vec<String>,
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Numeric values in order, as fed to the classifier.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Names that were absent from the raw features and filled with the default.
    pub fn defaulted(&self) -> &[String] {
        &self.defaulted
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Lay out raw features in `expected_order`, filling gaps with the default.
pub fn assemble<S: AsRef<str>>(raw_features: &RawFeatures, expected_order: &[S]) -> FeatureVector {
    let mut names = Vec::with_capacity(expected_order.len());
    let mut values = Vec::with_capacity(expected_order.len());
    let mut defaulted = Vec::new();

    for name in expected_order {
        let name = name.as_ref();
        let value = match raw_features.get(name) {
            Some(&value) => value,
            None => {
                defaulted.push(name.to_string());
                DEFAULT_FEATURE_VALUE
            }
        };
        names.push(name.to_string());
        values.push(value);
    }

    if !defaulted.is_empty() {
        tracing::warn!(
            missing = ?defaulted,
            "Expected features missing, filled with {}",
            DEFAULT_FEATURE_VALUE
        );
    }

    let ignored = (raw_features.len() + defaulted.len()).saturating_sub(names.len());
    if ignored > 0 {
        tracing::debug!(ignored, "Dropped features outside the expected order");
    }

    FeatureVector {
        names,
        values,
        defaulted,
    }
}

/// Assemble in the canonical training order.
pub fn assemble_canonical(raw_features: &RawFeatures) -> FeatureVector {
    assemble(raw_features, &FEATURE_NAMES)
}
