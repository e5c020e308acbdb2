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

use curtail_types::{DaySeries, DaylightWindow};
use tracing::debug;

/// Trim a day to the samples strictly between estimated sunrise and sunset.
///
/// Sunrise and sunset are the first and last samples with power above
/// `threshold_w`. Both boundary samples are excluded. The estimate can be off
/// on cloudy mornings or evenings, which is harmless because only the interior
/// power values feed the fit.
///
/// A day with nothing above the threshold returns `(None, empty)`.
pub fn filter_daylight(series: &DaySeries, threshold_w: f64) -> (Option<DaylightWindow>, DaySeries) {
    let mut above = series.iter().filter(|s| s.power > threshold_w);

    let Some(first) = above.next() else {
        debug!(
            "No sample above {} W in {} samples, treating day as dark",
            threshold_w,
            series.len()
        );
        return (None, DaySeries::empty());
    };
    let last = above.last().unwrap_or(first);

    let window = DaylightWindow {
        sunrise: first.timestamp,
        sunset: last.timestamp,
    };
    let trimmed = series.filtered(|s| window.contains_strictly(s.timestamp));

    debug!(
        "Daylight window {} - {}: kept {} of {} samples",
        window.sunrise,
        window.sunset,
        trimmed.len(),
        series.len()
    );

    (Some(window), trimmed)
}
