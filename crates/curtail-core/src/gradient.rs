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

//! Slope-angle filter for the power envelope.
//!
//! A clear-sky curve climbs steeply after sunrise, flattens around solar noon
//! and falls steeply towards sunset. Each transition between neighbouring
//! envelope points is classified by its slope angle:
//!
//! - **Strict band** `[80°, 90°)`: accepted, and extends the current run
//! - **Relaxed band** `>= 70°`: accepted only while a run longer than the
//!   continuance limit is in progress, without extending it
//! - anything else: rejected, and the run is reset
//!
//! An accepted transition marks both of its endpoints as compliant. A point
//! survives when its compliance pattern shows it belongs to an accepted run.

use crate::axis;
use crate::envelope::FilteredPoint;
use curtail_types::BaselineConfig;
use tracing::debug;

// ============= Slope Classification =============

/// Angle thresholds for the gradient filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeBands {
    /// Inclusive lower bound of the strict band (degrees)
    pub strict_min_deg: f64,
    /// Exclusive upper bound of the strict band (degrees)
    pub strict_max_deg: f64,
    /// Inclusive lower bound applied during a long run (degrees)
    pub relaxed_min_deg: f64,
    /// A run must exceed this many strict acceptances to relax
    pub continuance_limit: usize,
}

impl SlopeBands {
    pub fn from_config(config: &BaselineConfig) -> Self {
        Self {
            strict_min_deg: config.strict_angle_min_deg,
            strict_max_deg: config.strict_angle_max_deg,
            relaxed_min_deg: config.relaxed_angle_min_deg,
            continuance_limit: config.continuance_limit,
        }
    }

    fn is_strict(&self, angle_deg: f64) -> bool {
        angle_deg >= self.strict_min_deg && angle_deg < self.strict_max_deg
    }

    /// Advance the hysteresis by one transition.
    ///
    /// Returns the next state and whether the transition is accepted.
    pub fn step(&self, state: GradientState, angle_deg: f64) -> (GradientState, bool) {
        if self.is_strict(angle_deg) {
            let run = match state {
                GradientState::Idle => 1,
                GradientState::StrictRun(run) => run + 1,
                GradientState::RelaxedRun => return (GradientState::RelaxedRun, true),
            };
            let next = if run > self.continuance_limit {
                GradientState::RelaxedRun
            } else {
                GradientState::StrictRun(run)
            };
            return (next, true);
        }

        if state == GradientState::RelaxedRun && angle_deg >= self.relaxed_min_deg {
            return (GradientState::RelaxedRun, true);
        }

        (GradientState::Idle, false)
    }
}

impl Default for SlopeBands {
    fn default() -> Self {
        Self::from_config(&BaselineConfig::default())
    }
}

/// Hysteresis state between consecutive transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientState {
    /// No run in progress
    #[default]
    Idle,
    /// Run of strict acceptances, not yet past the continuance limit
    StrictRun(usize),
    /// Run past the continuance limit, relaxed band applies
    RelaxedRun,
}

/// Absolute slope angle between two points in degrees, time measured in days
pub fn slope_angle_deg(from: &FilteredPoint, to: &FilteredPoint) -> f64 {
    let elapsed_days = axis::days_between(from.timestamp, to.timestamp);
    (to.power - from.power).abs().atan2(elapsed_days).to_degrees()
}

// ============= Point Selection =============

/// Where a point sits in the sequence, each position has its own survival rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    First,
    Interior,
    Last,
}

/// Both transitions touching the point were accepted
const FULLY_COMPLIANT: u8 = 2;
/// Exactly one transition touching the point was accepted
const HALF_COMPLIANT: u8 = 1;

fn survives(compliance: &[u8], index: usize, position: Position) -> bool {
    let own = compliance[index];
    match position {
        // Only run starts qualify: own transition accepted and the next point fully inside a run
        Position::First => own == HALF_COMPLIANT && compliance[index + 1] == FULLY_COMPLIANT,
        Position::Last => own == HALF_COMPLIANT && compliance[index - 1] == FULLY_COMPLIANT,
        Position::Interior => {
            own == FULLY_COMPLIANT
                || (own == HALF_COMPLIANT
                    && (compliance[index - 1] == FULLY_COMPLIANT
                        || compliance[index + 1] == FULLY_COMPLIANT))
        }
    }
}

/// Keep the envelope points lying on steep, parabola-like stretches.
///
/// Fewer than three points can never form a run, so they yield nothing.
pub fn filter_gradients(points: &[FilteredPoint], bands: &SlopeBands) -> Vec<FilteredPoint> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut compliance = vec![0_u8; n];
    let mut state = GradientState::Idle;

    for (i, pair) in points.windows(2).enumerate() {
        let angle = slope_angle_deg(&pair[0], &pair[1]);
        let (next, accepted) = bands.step(state, angle);
        state = next;

        if accepted {
            compliance[i] += 1;
            compliance[i + 1] += 1;
        }
    }

    let kept: Vec<FilteredPoint> = points
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            let position = match *i {
                0 => Position::First,
                i if i == n - 1 => Position::Last,
                _ => Position::Interior,
            };
            survives(&compliance, *i, position)
        })
        .map(|(_, p)| *p)
        .collect();

    debug!("Gradient filter kept {} of {} envelope points", kept.len(), n);

    kept
}
