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

use chrono::Duration;
use curtail_core::{
    CurtailmentEnergies, EstimationMethod, energy_generated_kwh, estimate_baseline,
    estimate_expected_energy, expected_energy_kwh,
};
use curtail_integration_tests::{SyntheticDay, at, clear_sky_power};

const DAY_MINUTES: i64 = 720;
const PEAK_W: f64 = 5000.0;

#[test]
fn test_tripping_dropout_does_not_drag_baseline_down() {
    let start = at((2022, 3, 2), 6, 0);
    // 10:00 - 10:30 at standby power
    let tripped =
        SyntheticDay::clear_sky(start, DAY_MINUTES, PEAK_W).with_dropout(240, 270, 15.0);
    assert_eq!(tripped.power_at_minute(250), Some(15.0));

    let day = tripped.build().unwrap();
    let outcome = estimate_baseline(&day, PEAK_W).unwrap();
    let model = outcome.model.unwrap();

    // No point from the dip reaches the regression
    assert!(outcome.filtered_points.iter().all(|p| p.power > 300.0));

    for minute in 240..270 {
        let expected = model.expected_power_at(start + Duration::minutes(minute));
        let trend = clear_sky_power(minute as f64, DAY_MINUTES, PEAK_W);
        assert!(
            (expected - trend).abs() < 5.0,
            "minute {minute}: expected {expected:.1} W, clear-sky {trend:.1} W"
        );
    }
    assert!(outcome.quality.is_good);
}

#[test]
fn test_dropout_energy_feeds_expected_generation() {
    let start = at((2022, 3, 2), 6, 0);
    let day = SyntheticDay::clear_sky(start, DAY_MINUTES, PEAK_W)
        .with_dropout(300, 330, 0.0)
        .build()
        .unwrap();
    let outcome = estimate_baseline(&day, PEAK_W).unwrap();

    let generated = energy_generated_kwh(&day);
    let expected = expected_energy_kwh(&outcome).unwrap();
    // Half an hour near 4.6 kW is missing
    let lost = expected - generated;
    assert!(lost > 2.0 && lost < 3.0, "lost {lost:.2} kWh");

    let curtailment = CurtailmentEnergies {
        tripping_kwh: lost,
        vvar_kwh: Some(0.0),
        vwatt_kwh: Some(0.0),
    };
    let estimate = estimate_expected_energy(generated, &curtailment, Some(true));
    assert_eq!(estimate.method(), Some(EstimationMethod::Polyfit));
    assert!((estimate.kwh().unwrap() - expected).abs() < 1e-9);
}

#[test]
fn test_clipped_peak_keeps_a_single_maximum() {
    let day = SyntheticDay::clear_sky(at((2022, 3, 2), 9, 0), 200, PEAK_W)
        .clipped(4000.0)
        .build()
        .unwrap();
    let outcome = estimate_baseline(&day, PEAK_W).unwrap();

    let bumped = outcome
        .filtered_points
        .iter()
        .filter(|p| p.power > 4000.5)
        .count();
    let at_limit = outcome
        .filtered_points
        .iter()
        .filter(|p| p.power == 4000.0)
        .count();
    assert_eq!(bumped, 1);
    assert!(at_limit <= 1);

    // The curve through the unclipped edges rises above the inverter limit
    let highest = outcome
        .series
        .iter()
        .filter_map(|p| p.power_expected)
        .fold(0.0, f64::max);
    assert!(highest > 4000.0);
}
