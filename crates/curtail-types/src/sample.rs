// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============= Samples =============

/// A single D-PV measurement for one circuit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaySample {
    pub timestamp: NaiveDateTime,
    /// Real power (W)
    pub power: f64,
    /// Reactive power (VAr)
    pub reactive_power: f64,
    /// Voltage (V)
    pub voltage: f64,
    /// Apparent power (VA)
    pub apparent_power: f64,
    pub power_factor: f64,
    /// Energy accumulated over the sample duration (Wh)
    pub energy: f64,
    /// Sample duration (s)
    pub duration: f64,
}

impl DaySample {
    /// Sample carrying only real power, other channels zeroed
    pub fn new(timestamp: NaiveDateTime, power: f64) -> Self {
        Self {
            timestamp,
            power,
            reactive_power: 0.0,
            voltage: 0.0,
            apparent_power: 0.0,
            power_factor: 0.0,
            energy: 0.0,
            duration: 0.0,
        }
    }
}

// ============= Series =============

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("timestamp at index {index} is not after its predecessor")]
    OutOfOrder { index: usize },

    #[error("sample dated {found} does not belong to {expected}")]
    MixedDates { expected: NaiveDate, found: NaiveDate },

    #[error("non-finite power at index {index}")]
    NonFinitePower { index: usize },
}

/// Samples for one circuit on one calendar date.
///
/// Timestamps are strictly increasing and share a single date. An empty series
/// is valid and represents a day without data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DaySeries {
    samples: Vec<DaySample>,
}

impl DaySeries {
    pub fn new(samples: Vec<DaySample>) -> Result<Self, SeriesError> {
        if let Some(first) = samples.first() {
            let expected = first.timestamp.date();
            for (index, sample) in samples.iter().enumerate() {
                if !sample.power.is_finite() {
                    return Err(SeriesError::NonFinitePower { index });
                }
                let found = sample.timestamp.date();
                if found != expected {
                    return Err(SeriesError::MixedDates { expected, found });
                }
                if index > 0 && sample.timestamp <= samples[index - 1].timestamp {
                    return Err(SeriesError::OutOfOrder { index });
                }
            }
        }
        Ok(Self { samples })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[DaySample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DaySample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Calendar date shared by every sample, `None` for an empty series
    pub fn date(&self) -> Option<NaiveDate> {
        self.samples.first().map(|s| s.timestamp.date())
    }

    /// Subset of samples matching `keep`, order preserved.
    ///
    /// Dropping samples cannot break ordering or the single-date rule, so the
    /// result needs no re-validation.
    pub fn filtered(&self, mut keep: impl FnMut(&DaySample) -> bool) -> Self {
        Self {
            samples: self.samples.iter().filter(|s| keep(s)).copied().collect(),
        }
    }

    pub fn into_samples(self) -> Vec<DaySample> {
        self.samples
    }
}

impl<'a> IntoIterator for &'a DaySeries {
    type Item = &'a DaySample;
    type IntoIter = std::slice::Iter<'a, DaySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// First and last sample above the daylight threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaylightWindow {
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
}

impl DaylightWindow {
    /// True for timestamps strictly between sunrise and sunset
    pub fn contains_strictly(&self, timestamp: NaiveDateTime) -> bool {
        timestamp > self.sunrise && timestamp < self.sunset
    }
}
