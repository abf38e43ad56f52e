//! Sensor channels, samples, and the canonical feature naming.
//!
//! The channel order and the feature order below are fixed by the trained
//! classifier and must never be reordered or renamed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of sensor channels (3 sensors x 3 axes).
pub const CHANNEL_COUNT: usize = 9;

/// Number of statistics computed per channel.
pub const STATISTIC_COUNT: usize = 4;

/// Number of entries in a feature vector.
pub const FEATURE_COUNT: usize = CHANNEL_COUNT * STATISTIC_COUNT;

/// One time step: a value per channel, indexed by [`Channel::index`].
pub type Sample = [f64; CHANNEL_COUNT];

/// A named sensor axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "acc_X")]
    AccX,
    #[serde(rename = "acc_Y")]
    AccY,
    #[serde(rename = "acc_Z")]
    AccZ,
    #[serde(rename = "mag_X")]
    MagX,
    #[serde(rename = "mag_Y")]
    MagY,
    #[serde(rename = "mag_Z")]
    MagZ,
    #[serde(rename = "gyro_X")]
    GyroX,
    #[serde(rename = "gyro_Y")]
    GyroY,
    #[serde(rename = "gyro_Z")]
    GyroZ,
}

impl Channel {
    /// All channels in column order.
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::AccX,
        Channel::AccY,
        Channel::AccZ,
        Channel::MagX,
        Channel::MagY,
        Channel::MagZ,
        Channel::GyroX,
        Channel::GyroY,
        Channel::GyroZ,
    ];

    /// Column index of this channel within a [`Sample`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::AccX => "acc_X",
            Channel::AccY => "acc_Y",
            Channel::AccZ => "acc_Z",
            Channel::MagX => "mag_X",
            Channel::MagY => "mag_Y",
            Channel::MagZ => "mag_Z",
            Channel::GyroX => "gyro_X",
            Channel::GyroY => "gyro_Y",
            Channel::GyroZ => "gyro_Z",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Summary statistic computed over one channel of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Mean,
    Std,
    Min,
    Max,
}

impl Statistic {
    /// All statistics in feature order.
    pub const ALL: [Statistic; STATISTIC_COUNT] = [
        Statistic::Mean,
        Statistic::Std,
        Statistic::Min,
        Statistic::Max,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Std => "std",
            Statistic::Min => "min",
            Statistic::Max => "max",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Build the feature name for a channel/statistic pair, e.g. `gyro_Z_max`.
pub fn feature_name(channel: Channel, statistic: Statistic) -> String {
    format!("{channel}_{statistic}")
}

/// Feature order the classifier was trained on.
#[rustfmt::skip]
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "acc_X_mean", "acc_X_std", "acc_X_min", "acc_X_max",
    "acc_Y_mean", "acc_Y_std", "acc_Y_min", "acc_Y_max",
    "acc_Z_mean", "acc_Z_std", "acc_Z_min", "acc_Z_max",
    "mag_X_mean", "mag_X_std", "mag_X_min", "mag_X_max",
    "mag_Y_mean", "mag_Y_std", "mag_Y_min", "mag_Y_max",
    "mag_Z_mean", "mag_Z_std", "mag_Z_min", "mag_Z_max",
    "gyro_X_mean", "gyro_X_std", "gyro_X_min", "gyro_X_max",
    "gyro_Y_mean", "gyro_Y_std", "gyro_Y_min", "gyro_Y_max",
    "gyro_Z_mean", "gyro_Z_std", "gyro_Z_min", "gyro_Z_max",
];
