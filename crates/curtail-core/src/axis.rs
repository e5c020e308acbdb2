// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Numeric time axis shared by the gradient filter and the polyfit.
//!
//! Timestamps map to fractional days since the Unix epoch. Slope angles in the
//! gradient filter are therefore measured in W per day, which is what the
//! 70/80/90 degree thresholds were tuned against.

use chrono::NaiveDateTime;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

pub fn fractional_days(timestamp: NaiveDateTime) -> f64 {
    timestamp.and_utc().timestamp_millis() as f64 / MILLIS_PER_DAY
}

/// Elapsed days from `from` to `to`
pub fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}
