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

//! Daily energy totals and the expected-energy combinator.

use crate::baseline::BaselineOutcome;
use chrono::{NaiveDateTime, Timelike};
use curtail_types::{
    CurtailmentEnergies, DaySeries, EnergyEstimate, EstimationMethod, UnavailableReason,
};
use std::collections::BTreeMap;

/// Mean power of each clock hour, summed, in kWh.
///
/// Hours without samples contribute nothing.
fn hourly_energy_kwh(points: impl IntoIterator<Item = (NaiveDateTime, f64)>) -> f64 {
    let mut hours: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for (timestamp, power) in points {
        let entry = hours.entry(timestamp.hour()).or_insert((0.0, 0));
        entry.0 += power;
        entry.1 += 1;
    }

    hours
        .values()
        .map(|(sum, count)| sum / *count as f64)
        .sum::<f64>()
        / 1000.0
}

/// Energy actually generated on the day (kWh)
pub fn energy_generated_kwh(series: &DaySeries) -> f64 {
    hourly_energy_kwh(series.iter().map(|s| (s.timestamp, s.power)))
}

/// Energy under the baseline curve over the daylight window (kWh).
///
/// `None` when no baseline could be fitted.
pub fn expected_energy_kwh(outcome: &BaselineOutcome) -> Option<f64> {
    if outcome.is_degenerate() {
        return None;
    }
    Some(hourly_energy_kwh(outcome.series.iter().filter_map(|p| {
        p.power_expected.map(|e| (p.sample.timestamp, e))
    })))
}

/// Combine generated energy with detected curtailment into expected generation.
///
/// Clear-sky days trust the polyfit baseline and need every detector result.
/// Cloudy days only have an estimate when tripping was interpolated linearly;
/// missing V-VAr/V-Watt results then count as zero.
pub fn estimate_expected_energy(
    generated_kwh: f64,
    curtailment: &CurtailmentEnergies,
    clear_sky: Option<bool>,
) -> EnergyEstimate {
    let unavailable = |reason| EnergyEstimate::Unavailable { reason };

    if !generated_kwh.is_finite() || !curtailment.tripping_kwh.is_finite() {
        return unavailable(UnavailableReason::InsufficientData);
    }
    let finite = |v: Option<f64>| v.filter(|v| v.is_finite());

    match clear_sky {
        None => unavailable(UnavailableReason::NoClearSkyClassification),
        Some(true) => match (finite(curtailment.vvar_kwh), finite(curtailment.vwatt_kwh)) {
            (Some(vvar), Some(vwatt)) => EnergyEstimate::Available {
                kwh: generated_kwh + curtailment.tripping_kwh + vvar + vwatt,
                method: EstimationMethod::Polyfit,
            },
            _ => unavailable(UnavailableReason::InsufficientData),
        },
        Some(false) if curtailment.tripping_kwh > 0.0 => EnergyEstimate::Available {
            kwh: generated_kwh
                + curtailment.tripping_kwh
                + finite(curtailment.vvar_kwh).unwrap_or(0.0)
                + finite(curtailment.vwatt_kwh).unwrap_or(0.0),
            method: EstimationMethod::Linear,
        },
        Some(false) => unavailable(UnavailableReason::NoTrippingDetected),
    }
}
