//! Window management for feature extraction.
//!
//! A [`Window`] is the fixed-size tail of a normalized series. [`SensorStreams`]
//! collects per-sensor readings until every sensor has enough samples to fill
//! one window.

use crate::core::channels::{Channel, Sample, CHANNEL_COUNT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of samples in a window.
pub const WINDOW_SIZE: usize = 50;

/// The series was too short to fill a window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("the input time series must have at least {required} rows, got {received}")]
pub struct InsufficientDataError {
    pub received: usize,
    pub required: usize,
}

impl InsufficientDataError {
    pub fn new(received: usize) -> Self {
        Self {
            received,
            required: WINDOW_SIZE,
        }
    }
}

/// The most recent [`WINDOW_SIZE`] samples of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    rows: Vec<Sample>,
}

impl Window {
    /// Take the last [`WINDOW_SIZE`] samples of a series.
    pub fn from_tail(series: &[Sample]) -> Result<Self, InsufficientDataError> {
        if series.len() < WINDOW_SIZE {
            return Err(InsufficientDataError::new(series.len()));
        }

        Ok(Self {
            rows: series[series.len() - WINDOW_SIZE..].to_vec(),
        })
    }

    pub fn rows(&self) -> &[Sample] {
        &self.rows
    }

    /// Values of one channel, in time order.
    pub fn column(&self, channel: Channel) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[channel.index()])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The three tri-axial sensors feeding the channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Accelerometer,
    Magnetometer,
    Gyroscope,
}

impl SensorKind {
    /// First channel this sensor occupies; its axes follow in X, Y, Z order.
    pub fn first_channel(self) -> Channel {
        match self {
            SensorKind::Accelerometer => Channel::AccX,
            SensorKind::Magnetometer => Channel::MagX,
            SensorKind::Gyroscope => Channel::GyroX,
        }
    }
}

/// Buffers independent sensor streams and merges them into channel rows.
///
/// Each stream stops accepting readings once it holds a full window, so a
/// fast sensor cannot run ahead of a slow one.
#[derive(Debug, Clone)]
pub struct SensorStreams {
    capacity: usize,
    accelerometer: Vec<[f64; 3]>,
    magnetometer: Vec<[f64; 3]>,
    gyroscope: Vec<[f64; 3]>,
}

impl SensorStreams {
    /// Create buffers that fill at [`WINDOW_SIZE`] readings.
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            accelerometer: Vec::with_capacity(capacity),
            magnetometer: Vec::with_capacity(capacity),
            gyroscope: Vec::with_capacity(capacity),
        }
    }

    /// Add a reading. Returns `false` if that stream is already full.
    pub fn push(&mut self, kind: SensorKind, reading: [f64; 3]) -> bool {
        let capacity = self.capacity;
        let stream = self.stream_mut(kind);
        if stream.len() >= capacity {
            return false;
        }
        stream.push(reading);
        true
    }

    /// Number of buffered readings for a sensor.
    pub fn len(&self, kind: SensorKind) -> usize {
        match kind {
            SensorKind::Accelerometer => self.accelerometer.len(),
            SensorKind::Magnetometer => self.magnetometer.len(),
            SensorKind::Gyroscope => self.gyroscope.len(),
        }
    }

    /// Whether every stream holds a full window.
    pub fn is_ready(&self) -> bool {
        [
            SensorKind::Accelerometer,
            SensorKind::Magnetometer,
            SensorKind::Gyroscope,
        ]
        .iter()
        .all(|&kind| self.len(kind) >= self.capacity)
    }

    /// Merge the streams into channel-ordered rows and reset the buffers.
    ///
    /// Returns `None` until [`is_ready`](Self::is_ready).
    pub fn take_series(&mut self) -> Option<Vec<Vec<f64>>> {
        if !self.is_ready() {
            return None;
        }

        let rows = (0..self.capacity)
            .map(|i| {
                let mut row = vec![0.0; CHANNEL_COUNT];
                for (kind, stream) in [
                    (SensorKind::Accelerometer, &self.accelerometer),
                    (SensorKind::Magnetometer, &self.magnetometer),
                    (SensorKind::Gyroscope, &self.gyroscope),
                ] {
                    let base = kind.first_channel().index();
                    row[base..base + 3].copy_from_slice(&stream[i]);
                }
                row
            })
            .collect();

        self.clear();
        Some(rows)
    }

    /// Drop all buffered readings.
    pub fn clear(&mut self) {
        self.accelerometer.clear();
        self.magnetometer.clear();
        self.gyroscope.clear();
    }

    fn stream_mut(&mut self, kind: SensorKind) -> &mut Vec<[f64; 3]> {
        match kind {
            SensorKind::Accelerometer => &mut self.accelerometer,
            SensorKind::Magnetometer => &mut self.magnetometer,
            SensorKind::Gyroscope => &mut self.gyroscope,
        }
    }
}

impl Default for SensorStreams {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(len: usize) -> Vec<Sample> {
        (0..len).map(|i| [i as f64; CHANNEL_COUNT]).collect()
    }

    #[test]
    fn test_window_takes_tail() {
        let window = Window::from_tail(&series(60)).unwrap();

        assert_eq!(window.len(), WINDOW_SIZE);
        assert_eq!(window.rows()[0][0], 10.0);
        assert_eq!(window.rows()[WINDOW_SIZE - 1][0], 59.0);
    }

    #[test]
    fn test_window_exact_size() {
        let window = Window::from_tail(&series(WINDOW_SIZE)).unwrap();
        assert_eq!(window.rows()[0][0], 0.0);
    }

    #[test]
    fn test_window_too_short() {
        let err = Window::from_tail(&series(49)).unwrap_err();
        assert_eq!(err.received, 49);
        assert_eq!(err.required, WINDOW_SIZE);
    }

    #[test]
    fn test_window_column() {
        let mut rows = series(WINDOW_SIZE);
        rows[3][Channel::MagY.index()] = -1.0;
        let window = Window::from_tail(&rows).unwrap();

        let column: Vec<f64> = window.column(Channel::MagY).collect();
        assert_eq!(column.len(), WINDOW_SIZE);
        assert_eq!(column[3], -1.0);
    }

    #[test]
    fn test_streams_wait_for_every_sensor() {
        let mut streams = SensorStreams::with_capacity(2);

        streams.push(SensorKind::Accelerometer, [1.0, 2.0, 3.0]);
        streams.push(SensorKind::Accelerometer, [1.0, 2.0, 3.0]);
        streams.push(SensorKind::Gyroscope, [7.0, 8.0, 9.0]);
        streams.push(SensorKind::Gyroscope, [7.0, 8.0, 9.0]);
        assert!(!streams.is_ready());
        assert!(streams.take_series().is_none());

        streams.push(SensorKind::Magnetometer, [4.0, 5.0, 6.0]);
        streams.push(SensorKind::Magnetometer, [4.0, 5.0, 6.0]);
        assert!(streams.is_ready());
    }

    #[test]
    fn test_streams_drop_overflow() {
        let mut streams = SensorStreams::with_capacity(1);
        assert!(streams.push(SensorKind::Gyroscope, [0.0; 3]));
        assert!(!streams.push(SensorKind::Gyroscope, [1.0; 3]));
        assert_eq!(streams.len(SensorKind::Gyroscope), 1);
    }

    #[test]
    fn test_streams_merge_in_channel_order() {
        let mut streams = SensorStreams::with_capacity(1);
        streams.push(SensorKind::Gyroscope, [7.0, 8.0, 9.0]);
        streams.push(SensorKind::Accelerometer, [1.0, 2.0, 3.0]);
        streams.push(SensorKind::Magnetometer, [4.0, 5.0, 6.0]);

        let rows = streams.take_series().unwrap();
        assert_eq!(rows, vec![vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]]);

        // Buffers reset after a merge
        assert_eq!(streams.len(SensorKind::Accelerometer), 0);
        assert!(!streams.is_ready());
    }
}
