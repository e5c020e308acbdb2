// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

use curtail_types::{BaselineConfig, QualityAssessment};
use tracing::debug;

/// Score a baseline by how many samples sit close to it.
///
/// `pairs` yields `(actual, expected)` power for every daylight sample. The
/// verdict uses an absolute count, so short days fail even with a perfect fit.
pub fn assess_quality(
    pairs: impl IntoIterator<Item = (f64, f64)>,
    config: &BaselineConfig,
) -> QualityAssessment {
    let near_fit_points = pairs
        .into_iter()
        .filter(|(actual, expected)| (expected - actual).abs() < config.near_fit_tolerance_w)
        .count();

    let is_good = near_fit_points > config.min_near_fit_points;
    debug!(
        "{} samples within {} W of baseline (need more than {})",
        near_fit_points, config.near_fit_tolerance_w, config.min_near_fit_points
    );

    QualityAssessment {
        is_good,
        near_fit_points,
    }
}
