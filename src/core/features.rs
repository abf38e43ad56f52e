//! Feature computation from sample windows.
//!
//! Each channel of a window is reduced to four summary statistics. The result
//! is keyed by feature name and carries no ordering; see
//! [`assembler`](crate::core::assembler) for the classifier layout.

use crate::core::channels::{feature_name, Channel, Statistic};
use crate::core::windowing::Window;
use statrs::statistics::Statistics;
use std::collections::HashMap;
use thiserror::Error;

/// Named, unordered window statistics.
pub type RawFeatures = HashMap<String, f64>;

/// A statistic could not be computed for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("error extracting {statistic} feature for channel {channel}")]
pub struct FeatureExtractionError {
    pub channel: Channel,
    pub statistic: Statistic,
}

/// Summary statistics of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl ChannelStats {
    pub fn get(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::Mean => self.mean,
            Statistic::Std => self.std,
            Statistic::Min => self.min,
            Statistic::Max => self.max,
        }
    }
}

/// Compute mean, std, min and max for every channel of a window.
pub fn extract(window: &Window) -> Result<RawFeatures, FeatureExtractionError> {
    let mut features = RawFeatures::with_capacity(Channel::ALL.len() * Statistic::ALL.len());

    for channel in Channel::ALL {
        let values: Vec<f64> = window.column(channel).collect();
        let stats = channel_stats(channel, &values)?;

        for statistic in Statistic::ALL {
            features.insert(feature_name(channel, statistic), stats.get(statistic));
        }
    }

    Ok(features)
}

/// Compute the statistics of a single channel's values.
///
/// A constant column has a standard deviation of exactly zero.
pub fn channel_stats(channel: Channel, values: &[f64]) -> Result<ChannelStats, FeatureExtractionError> {
    let fail = |statistic| FeatureExtractionError { channel, statistic };

    let first = *values.first().ok_or_else(|| fail(Statistic::Mean))?;
    let constant = values.iter().all(|&v| v == first);

    let mean = values.iter().mean();
    let std = if constant { 0.0 } else { values.iter().std_dev() };
    let min = Statistics::min(values.iter());
    let max = Statistics::max(values.iter());

    for (statistic, value) in [
        (Statistic::Mean, mean),
        (Statistic::Std, std),
        (Statistic::Min, min),
        (Statistic::Max, max),
    ] {
        if !value.is_finite() {
            return Err(fail(statistic));
        }
    }

    Ok(ChannelStats {
        mean,
        std,
        min,
        max,
    })
}
