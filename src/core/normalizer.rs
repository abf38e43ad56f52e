//! Min-max normalization with persisted per-channel parameters.
//!
//! Parameters are fit during training and loaded once at startup. Each channel
//! is rescaled as `value * scale + offset`, which for the default `[0, 1]`
//! range is `(value - min) / (max - min)`.

use crate::core::channels::{Channel, Sample, CHANNEL_COUNT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while applying the transform to a series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizationError {
    #[error("row {row} has {found} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("normalization parameters cover {found} channels, expected {expected}")]
    ParameterShape { expected: usize, found: usize },
    #[error("row {row} has or scales to a non-finite value for {channel}")]
    NonFinite { row: usize, channel: Channel },
}

/// Errors raised while loading the persisted scaler.
#[derive(Debug, Error)]
pub enum ScalerError {
    #[error("failed to read scaler artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scaler artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scaler has {found} {field} entries, expected {expected}")]
    Shape {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("scaler bounds for {channel} are invalid (min {min}, max {max})")]
    Bounds { channel: Channel, min: f64, max: f64 },
    #[error("feature range [{0}, {1}] is not increasing")]
    FeatureRange(f64, f64),
}

/// On-disk form of a fitted min-max scaler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Per-channel scale and offset, immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationParameters {
    scale: Vec<f64>,
    offset: Vec<f64>,
}

impl NormalizationParameters {
    /// Build parameters from per-channel bounds with the `[0, 1]` output range.
    pub fn from_bounds(data_min: &[f64], data_max: &[f64]) -> Result<Self, ScalerError> {
        Self::from_artifact(&ScalerArtifact {
            data_min: data_min.to_vec(),
            data_max: data_max.to_vec(),
            feature_range: default_feature_range(),
        })
    }

    pub fn from_artifact(artifact: &ScalerArtifact) -> Result<Self, ScalerError> {
        check_len("data_min", artifact.data_min.len())?;
        check_len("data_max", artifact.data_max.len())?;

        let (lo, hi) = artifact.feature_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(ScalerError::FeatureRange(lo, hi));
        }

        let mut scale = Vec::with_capacity(CHANNEL_COUNT);
        let mut offset = Vec::with_capacity(CHANNEL_COUNT);
        for channel in Channel::ALL {
            let min = artifact.data_min[channel.index()];
            let max = artifact.data_max[channel.index()];
            if !(min.is_finite() && max.is_finite()) || min > max {
                return Err(ScalerError::Bounds { channel, min, max });
            }

            // Constant training columns keep a unit range.
            let range = if max > min { max - min } else { 1.0 };
            let s = (hi - lo) / range;
            scale.push(s);
            offset.push(lo - min * s);
        }

        Ok(Self { scale, offset })
    }

    /// Load a scaler artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ScalerError> {
        let content = std::fs::read_to_string(path)?;
        let artifact: ScalerArtifact = serde_json::from_str(&content)?;
        Self::from_artifact(&artifact)
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn offset(&self) -> &[f64] {
        &self.offset
    }
}

fn check_len(field: &'static str, found: usize) -> Result<(), ScalerError> {
    if found == CHANNEL_COUNT {
        Ok(())
    } else {
        Err(ScalerError::Shape {
            field,
            expected: CHANNEL_COUNT,
            found,
        })
    }
}

/// Rescale every row of a raw series.
///
/// Every row must carry exactly one finite value per channel, in channel
/// order. The input is left untouched.
pub fn normalize<R: AsRef<[f64]>>(
    rows: &[R],
    params: &NormalizationParameters,
) -> Result<Vec<Sample>, NormalizationError> {
    if params.scale.len() != CHANNEL_COUNT || params.offset.len() != CHANNEL_COUNT {
        return Err(NormalizationError::ParameterShape {
            expected: CHANNEL_COUNT,
            found: params.scale.len().min(params.offset.len()),
        });
    }

    rows.iter()
        .enumerate()
        .map(|(row, values)| {
            let values = values.as_ref();
            if values.len() != CHANNEL_COUNT {
                return Err(NormalizationError::RowWidth {
                    row,
                    expected: CHANNEL_COUNT,
                    found: values.len(),
                });
            }

            let mut sample = [0.0; CHANNEL_COUNT];
            for channel in Channel::ALL {
                let i = channel.index();
                let value = values[i];
                if !value.is_finite() {
                    return Err(NormalizationError::NonFinite { row, channel });
                }
                let scaled = value * params.scale[i] + params.offset[i];
                if !scaled.is_finite() {
                    return Err(NormalizationError::NonFinite { row, channel });
                }
                sample[i] = scaled;
            }
            Ok(sample)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_params() -> NormalizationParameters {
        NormalizationParameters::from_bounds(&[0.0; 9], &[1.0; 9]).unwrap()
    }

    #[test]
    fn test_min_max_transform() {
        let mins = [0.0, -10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let maxs = [2.0, 10.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 4.0];
        let params = NormalizationParameters::from_bounds(&mins, &maxs).unwrap();

        let rows = vec![vec![1.0, 0.0, 0.25, 0.0, 1.0, 0.5, 0.5, 0.5, 1.0]];
        let out = normalize(&rows, &params).unwrap();

        assert!((out[0][0] - 0.5).abs() < 1e-12);
        assert!((out[0][1] - 0.5).abs() < 1e-12);
        assert!((out[0][2] - 0.25).abs() < 1e-12);
        assert!((out[0][8] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_input_is_untouched() {
        let rows = vec![vec![0.3; 9], vec![0.7; 9]];
        let before = rows.clone();
        let out = normalize(&rows, &unit_params()).unwrap();
        assert_eq!(rows, before);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_row_width_mismatch() {
        let rows = vec![vec![0.0; 9], vec![0.0; 8]];
        let err = normalize(&rows, &unit_params()).unwrap_err();
        assert_eq!(
            err,
            NormalizationError::RowWidth {
                row: 1,
                expected: 9,
                found: 8
            }
        );
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let mut row = vec![0.0; 9];
        row[Channel::MagZ.index()] = f64::NAN;
        let err = normalize(&[row], &unit_params()).unwrap_err();
        assert_eq!(
            err,
            NormalizationError::NonFinite {
                row: 0,
                channel: Channel::MagZ
            }
        );
    }

    #[test]
    fn test_scaled_overflow_rejected() {
        let mut maxs = [1.0; 9];
        maxs[Channel::AccY.index()] = 1e-300;
        let params = NormalizationParameters::from_bounds(&[0.0; 9], &maxs).unwrap();

        let rows = vec![vec![0.5; 9], vec![1e10; 9]];
        let err = normalize(&rows, &params).unwrap_err();
        assert_eq!(
            err,
            NormalizationError::NonFinite {
                row: 1,
                channel: Channel::AccY
            }
        );
    }

    #[test]
    fn test_constant_training_column() {
        let params = NormalizationParameters::from_bounds(&[3.0; 9], &[3.0; 9]).unwrap();
        let out = normalize(&[vec![3.0; 9]], &params).unwrap();
        assert!(out[0].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_feature_range() {
        let artifact = ScalerArtifact {
            data_min: vec![0.0; 9],
            data_max: vec![1.0; 9],
            feature_range: (-1.0, 1.0),
        };
        let params = NormalizationParameters::from_artifact(&artifact).unwrap();
        let out = normalize(&[vec![0.5; 9]], &params).unwrap();
        assert!(out[0].iter().all(|&v| v.abs() < 1e-12));
    }

    #[test]
    fn test_artifact_validation() {
        let short = NormalizationParameters::from_bounds(&[0.0; 8], &[1.0; 9]);
        assert!(matches!(
            short,
            Err(ScalerError::Shape { field: "data_min", .. })
        ));

        let mut mins = [0.0; 9];
        mins[Channel::GyroY.index()] = 2.0;
        let inverted = NormalizationParameters::from_bounds(&mins, &[1.0; 9]);
        assert!(matches!(
            inverted,
            Err(ScalerError::Bounds {
                channel: Channel::GyroY,
                ..
            })
        ));
    }

    #[test]
    fn test_artifact_json_default_range() {
        let json = r#"{"data_min": [0,0,0,0,0,0,0,0,0], "data_max": [2,2,2,2,2,2,2,2,2]}"#;
        let artifact: ScalerArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.feature_range, (0.0, 1.0));

        let params = NormalizationParameters::from_artifact(&artifact).unwrap();
        assert!(params.scale().iter().all(|&s| (s - 0.5).abs() < 1e-12));
        assert!(params.offset().iter().all(|&o| o == 0.0));
    }
}
