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

//! Pre-processing applied before the baseline runs.

use chrono::{NaiveDateTime, Timelike};
use curtail_types::{DaySample, DaySeries, SeriesError};
use std::collections::BTreeMap;
use tracing::debug;

/// Series longer than this are assumed to be sub-minute (e.g. 5 s) data
pub const RESAMPLE_THRESHOLD: usize = 2000;

/// A usable day has more than this many samples
const MIN_SAMPLES: usize = 2;

/// Hours (inclusive) in which at least one sample must fall
const DAYTIME_HOURS: std::ops::RangeInclusive<u32> = 7..=17;

/// Check the series looks like a real day of data
pub fn has_usable_size(series: &DaySeries) -> bool {
    series.len() > MIN_SAMPLES
        && series
            .iter()
            .any(|s| DAYTIME_HOURS.contains(&s.timestamp.hour()))
}

#[derive(Debug, Default)]
struct MinuteBucket {
    count: usize,
    power: f64,
    reactive_power: f64,
    voltage: f64,
    apparent_power: f64,
    power_factor: f64,
    energy: f64,
    duration: f64,
}

impl MinuteBucket {
    fn add(&mut self, s: &DaySample) {
        self.count += 1;
        self.power += s.power;
        self.reactive_power += s.reactive_power;
        self.voltage += s.voltage;
        self.apparent_power += s.apparent_power;
        self.power_factor += s.power_factor;
        self.energy += s.energy;
        self.duration += s.duration;
    }

    /// Means for instantaneous channels, sums for accumulated ones
    fn into_sample(self, timestamp: NaiveDateTime) -> DaySample {
        let n = self.count as f64;
        DaySample {
            timestamp,
            power: self.power / n,
            reactive_power: self.reactive_power / n,
            voltage: self.voltage / n,
            apparent_power: self.apparent_power / n,
            power_factor: self.power_factor / n,
            energy: self.energy,
            duration: self.duration,
        }
    }
}

fn floor_to_minute(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(timestamp)
}

/// Aggregate high-frequency data into one sample per minute.
///
/// Series at or below [`RESAMPLE_THRESHOLD`] samples are returned unchanged.
/// Minutes without samples are omitted rather than filled.
pub fn resample_to_minutes(series: &DaySeries) -> Result<DaySeries, SeriesError> {
    if series.len() <= RESAMPLE_THRESHOLD {
        return Ok(series.clone());
    }

    let mut buckets: BTreeMap<NaiveDateTime, MinuteBucket> = BTreeMap::new();
    for sample in series {
        buckets
            .entry(floor_to_minute(sample.timestamp))
            .or_default()
            .add(sample);
    }

    debug!(
        "Resampled {} samples into {} one-minute buckets",
        series.len(),
        buckets.len()
    );

    DaySeries::new(
        buckets
            .into_iter()
            .map(|(minute, bucket)| bucket.into_sample(minute))
            .collect(),
    )
}
