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

//! FluxION Curtailment Baseline
//!
//! Estimates how much a D-PV system would have generated on a given day had it
//! not been curtailed. The pipeline runs on one circuit-day at a time:
//!
//! 1. **Daylight**: trim night-time noise around the first/last sample above 10 W
//! 2. **Envelope**: keep only the rising and falling edges of the power curve
//! 3. **Gradient**: keep only steep, parabola-like stretches of the envelope
//! 4. **Polyfit**: least-squares quadratic through the surviving points
//! 5. **Quality**: count samples that sit close to the fitted curve
//!
//! Degenerate days (no daylight, too few points to fit) are reported as data,
//! never as errors, so a batch over many site-days is never aborted by one bad day.

pub mod axis;
pub mod baseline;
pub mod daylight;
pub mod energy;
pub mod envelope;
pub mod gradient;
pub mod polyfit;
pub mod quality;
pub mod resample;

pub use baseline::{
    BaselineError, BaselineEstimator, BaselineOutcome, BaselineSample, estimate_baseline,
};
pub use daylight::filter_daylight;
pub use energy::{energy_generated_kwh, estimate_expected_energy, expected_energy_kwh};
pub use envelope::{FilteredPoint, extract_envelope, high_power_points};
pub use gradient::{GradientState, SlopeBands, filter_gradients};
pub use polyfit::{BaselineModel, FitError, QuadraticFit};
pub use quality::assess_quality;
pub use resample::{has_usable_size, resample_to_minutes};

// Re-export shared types so callers only need this crate
pub use curtail_types::{
    BaselineConfig, ConfigError, CurtailmentEnergies, DaySample, DaySeries, DaylightWindow,
    EnergyEstimate, EstimationMethod, QualityAssessment, SeriesError, UnavailableReason,
};
