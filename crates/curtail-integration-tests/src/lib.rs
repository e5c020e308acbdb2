// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Synthetic circuit-days for end-to-end baseline tests.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use curtail_core::{DaySample, DaySeries, SeriesError};
use rand::{Rng, SeedableRng, rngs::StdRng};

pub fn at(date: (i32, u32, u32), hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}

/// Symmetric parabola from 0 W at minute 0 to `peak_w` at the midpoint and
/// back to 0 W at `minutes`
pub fn clear_sky_power(minute: f64, minutes: i64, peak_w: f64) -> f64 {
    let half = minutes as f64 / 2.0;
    let x = (minute - half) / half;
    (peak_w * (1.0 - x * x)).max(0.0)
}

/// One-minute samples, built up and then validated into a [`DaySeries`]
#[derive(Debug, Clone)]
pub struct SyntheticDay {
    start: NaiveDateTime,
    samples: Vec<DaySample>,
}

impl SyntheticDay {
    /// `minutes + 1` samples following [`clear_sky_power`]
    pub fn clear_sky(start: NaiveDateTime, minutes: i64, peak_w: f64) -> Self {
        let samples = (0..=minutes)
            .map(|m| {
                DaySample::new(
                    start + Duration::minutes(m),
                    clear_sky_power(m as f64, minutes, peak_w),
                )
            })
            .collect();
        Self { start, samples }
    }

    /// Same curve sampled every `step_seconds`, as raw 5 s exports are
    pub fn clear_sky_every(
        start: NaiveDateTime,
        minutes: i64,
        peak_w: f64,
        step_seconds: i64,
    ) -> Self {
        let samples = (0..=minutes * 60 / step_seconds)
            .map(|i| {
                let seconds = i * step_seconds;
                DaySample::new(
                    start + Duration::seconds(seconds),
                    clear_sky_power(seconds as f64 / 60.0, minutes, peak_w),
                )
            })
            .collect();
        Self { start, samples }
    }

    pub fn flat(start: NaiveDateTime, minutes: i64, power_w: f64) -> Self {
        let samples = (0..minutes)
            .map(|m| DaySample::new(start + Duration::minutes(m), power_w))
            .collect();
        Self { start, samples }
    }

    fn minute_of(&self, sample: &DaySample) -> i64 {
        (sample.timestamp - self.start).num_minutes()
    }

    /// Replace power in `[from_minute, to_minute)` as an inverter trip would
    pub fn with_dropout(mut self, from_minute: i64, to_minute: i64, level_w: f64) -> Self {
        let range = from_minute..to_minute;
        let start = self.start;
        for sample in &mut self.samples {
            if range.contains(&(sample.timestamp - start).num_minutes()) {
                sample.power = level_w;
            }
        }
        self
    }

    /// Cap power at the inverter limit
    pub fn clipped(mut self, limit_w: f64) -> Self {
        for sample in &mut self.samples {
            sample.power = sample.power.min(limit_w);
        }
        self
    }

    /// Uniform noise in `[-amplitude_w, amplitude_w]`, reproducible per seed
    pub fn with_noise(mut self, amplitude_w: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        for sample in &mut self.samples {
            let noise = rng.gen_range(-amplitude_w..=amplitude_w);
            sample.power = (sample.power + noise).max(0.0);
        }
        self
    }

    pub fn power_at_minute(&self, minute: i64) -> Option<f64> {
        self.samples
            .iter()
            .find(|s| self.minute_of(s) == minute)
            .map(|s| s.power)
    }

    pub fn build(self) -> Result<DaySeries, SeriesError> {
        DaySeries::new(self.samples)
    }
}
