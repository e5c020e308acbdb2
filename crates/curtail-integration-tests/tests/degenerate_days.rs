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

use curtail_core::{
    BaselineError, DaySeries, estimate_baseline, expected_energy_kwh, has_usable_size,
};
use curtail_integration_tests::{SyntheticDay, at};

#[test]
fn test_dark_day() {
    let day = SyntheticDay::flat(at((2022, 6, 21), 8, 0), 300, 4.0)
        .build()
        .unwrap();
    let outcome = estimate_baseline(&day, 5000.0).unwrap();

    assert!(outcome.window.is_none());
    assert!(outcome.series.is_empty());
    assert!(outcome.is_degenerate());
    assert!(!outcome.quality.is_good);
    assert_eq!(expected_energy_kwh(&outcome), None);
}

#[test]
fn test_flat_day_has_no_slopes() {
    let day = SyntheticDay::flat(at((2022, 6, 21), 8, 0), 300, 500.0)
        .with_dropout(0, 1, 0.0)
        .with_dropout(299, 300, 0.0)
        .build()
        .unwrap();
    let outcome = estimate_baseline(&day, 5000.0).unwrap();

    assert!(outcome.window.is_some());
    assert!(!outcome.series.is_empty());
    assert!(outcome.filtered_points.is_empty());
    assert!(outcome.model.is_none());
    assert!(!outcome.quality.is_good);
    assert!(outcome.series.iter().all(|p| p.power_expected.is_none()));
}

#[test]
fn test_single_bright_sample() {
    let day = SyntheticDay::flat(at((2022, 6, 21), 8, 0), 120, 0.0)
        .with_dropout(60, 61, 800.0)
        .build()
        .unwrap();
    let outcome = estimate_baseline(&day, 5000.0).unwrap();

    let window = outcome.window.unwrap();
    assert_eq!(window.sunrise, window.sunset);
    assert!(outcome.series.is_empty());
    assert!(outcome.is_degenerate());
}

#[test]
fn test_short_day_fails_absolute_count() {
    // A perfect fit still cannot have more than 50 near samples in 40 minutes
    let day = SyntheticDay::clear_sky(at((2022, 6, 21), 11, 0), 40, 3000.0)
        .build()
        .unwrap();
    let outcome = estimate_baseline(&day, 5000.0).unwrap();

    assert!(outcome.model.is_some());
    assert!(outcome.quality.near_fit_points <= 50);
    assert!(!outcome.quality.is_good);
}

#[test]
fn test_empty_day() {
    let day = DaySeries::empty();
    assert!(!has_usable_size(&day));
    let outcome = estimate_baseline(&day, 5000.0).unwrap();
    assert!(outcome.is_degenerate());
}

#[test]
fn test_invalid_capacity_is_an_error() {
    let day = SyntheticDay::clear_sky(at((2022, 6, 21), 6, 0), 200, 5000.0)
        .build()
        .unwrap();
    assert_eq!(
        estimate_baseline(&day, -1.0),
        Err(BaselineError::InvalidCapacity(-1.0))
    );
}
