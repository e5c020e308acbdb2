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

use chrono::NaiveDateTime;
use curtail_types::DaySeries;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A (timestamp, power) pair selected as regression input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilteredPoint {
    pub timestamp: NaiveDateTime,
    pub power: f64,
}

/// Samples strictly above `floor_w`, where the signal dominates sensor noise
pub fn high_power_points(series: &DaySeries, floor_w: f64) -> Vec<FilteredPoint> {
    series
        .iter()
        .filter(|s| s.power > floor_w)
        .map(|s| FilteredPoint {
            timestamp: s.timestamp,
            power: s.power,
        })
        .collect()
}

/// Extract the rising and falling edges of the daily power curve.
///
/// Before the peak a point is kept only if it is a new running maximum; after
/// the peak the same rule is applied walking backwards from the end of the
/// day. Any dip or plateau caused by curtailment is dropped because it can
/// never set a new high on either side.
///
/// Fewer than two input points yield an empty envelope.
pub fn extract_envelope(mut points: Vec<FilteredPoint>) -> Vec<FilteredPoint> {
    if points.len() < 2 {
        return Vec::new();
    }

    let peak = break_peak_tie(&mut points);

    let mut envelope = running_highs(points[..peak].iter());
    envelope.push(points[peak]);

    let mut falling = running_highs(points[peak + 1..].iter().rev());
    falling.reverse();
    envelope.append(&mut falling);

    debug!(
        "Envelope kept {} of {} points, peak {:.0} W at {}",
        envelope.len(),
        points.len(),
        points[peak].power,
        points[peak].timestamp
    );

    envelope
}

/// Index of the single daily maximum.
///
/// When several samples share the maximum, the first one is bumped by 1 W so
/// that exactly one peak remains. This is a compatibility hack: reference
/// curtailment totals were produced with it, so it stays.
fn break_peak_tie(points: &mut [FilteredPoint]) -> usize {
    let max = points
        .iter()
        .map(|p| p.power)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut tied = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.power == max)
        .map(|(i, _)| i);

    let first = tied.next().unwrap_or(0);
    if tied.next().is_some() {
        debug!(
            "Daily maximum {:.0} W is tied, bumping sample at {}",
            max, points[first].timestamp
        );
        points[first].power += 1.0;
    }

    first
}

fn running_highs<'a>(points: impl Iterator<Item = &'a FilteredPoint>) -> Vec<FilteredPoint> {
    let mut highest = f64::NEG_INFINITY;
    points
        .filter(|p| {
            if p.power > highest {
                highest = p.power;
                true
            } else {
                false
            }
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use curtail_types::DaySample;

    fn at(minute: usize) -> NaiveDateTime {
        let minute = u32::try_from(minute).unwrap();
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(8 + minute / 60, minute % 60, 0)
            .unwrap()
    }

    fn points(powers: &[f64]) -> Vec<FilteredPoint> {
        powers
            .iter()
            .enumerate()
            .map(|(i, p)| FilteredPoint {
                timestamp: at(i),
                power: *p,
            })
            .collect()
    }

    fn powers(points: &[FilteredPoint]) -> Vec<f64> {
        points.iter().map(|p| p.power).collect()
    }

    #[test]
    fn test_high_power_points_excludes_floor() {
        let series = DaySeries::new(
            [200.0, 300.0, 301.0, 900.0, 300.0]
                .iter()
                .enumerate()
                .map(|(i, p)| DaySample::new(at(i), *p))
                .collect(),
        )
        .unwrap();
        assert_eq!(powers(&high_power_points(&series, 300.0)), vec![301.0, 900.0]);
    }

    #[test]
    fn test_empty_and_single_point() {
        assert!(extract_envelope(Vec::new()).is_empty());
        assert!(extract_envelope(points(&[800.0])).is_empty());
    }

    #[test]
    fn test_drops_dips_on_both_sides() {
        let input = points(&[
            400.0, 600.0, 550.0, 800.0, 800.0, 1200.0, 900.0, 1000.0, 700.0, 500.0,
        ]);
        let envelope = extract_envelope(input);
        assert_eq!(
            powers(&envelope),
            vec![400.0, 600.0, 800.0, 1200.0, 1000.0, 700.0, 500.0]
        );
    }

    #[test]
    fn test_envelope_is_monotonic_around_peak() {
        let input = points(&[
            350.0, 500.0, 480.0, 700.0, 320.0, 900.0, 1500.0, 1400.0, 1450.0, 900.0, 950.0, 400.0,
        ]);
        let envelope = extract_envelope(input);
        let peak = envelope
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.power.total_cmp(&b.1.power))
            .map(|(i, _)| i)
            .unwrap();

        assert!(envelope[..=peak].windows(2).all(|w| w[0].power <= w[1].power));
        assert!(envelope[peak..].windows(2).all(|w| w[0].power >= w[1].power));
        assert!(envelope.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_tied_maximum_keeps_single_peak() {
        let input = points(&[500.0, 1000.0, 800.0, 1000.0, 600.0]);
        let envelope = extract_envelope(input);

        // First tied sample becomes the peak, the other one belongs to the falling edge
        assert_eq!(powers(&envelope), vec![500.0, 1001.0, 1000.0, 600.0]);
        assert_eq!(envelope.iter().filter(|p| p.power == 1001.0).count(), 1);
        assert_eq!(envelope[1].timestamp, at(1));
        assert!(envelope.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_peak_at_first_sample() {
        let envelope = extract_envelope(points(&[2000.0, 1500.0, 1600.0, 1000.0]));
        assert_eq!(powers(&envelope), vec![2000.0, 1600.0, 1000.0]);
    }

    #[test]
    fn test_flat_day_reduces_to_edges() {
        let envelope = extract_envelope(points(&[500.0; 6]));
        // Bumped first sample is the peak, the backward walk keeps only the last sample
        assert_eq!(powers(&envelope), vec![501.0, 500.0]);
    }
}
