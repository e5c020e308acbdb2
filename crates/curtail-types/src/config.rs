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

//! Thresholds for baseline estimation.
//!
//! Defaults reproduce the reference curtailment numbers; change them only
//! after comparing against known outputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be within 0-90 degrees, got {value}")]
    AngleOutOfRange { field: &'static str, value: f64 },

    #[error("strict angle band is empty: {min}..{max}")]
    EmptyStrictBand { min: f64, max: f64 },

    #[error("relaxed angle minimum {relaxed} exceeds strict minimum {strict}")]
    RelaxedAboveStrict { relaxed: f64, strict: f64 },
}

fn default_daylight_threshold_w() -> f64 {
    10.0
}

fn default_envelope_floor_w() -> f64 {
    300.0
}

fn default_strict_angle_min_deg() -> f64 {
    80.0
}

fn default_strict_angle_max_deg() -> f64 {
    90.0
}

fn default_relaxed_angle_min_deg() -> f64 {
    70.0
}

fn default_continuance_limit() -> usize {
    2
}

fn default_near_fit_tolerance_w() -> f64 {
    50.0
}

fn default_min_near_fit_points() -> usize {
    50
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Power above which a sample counts as daylight (W)
    #[serde(default = "default_daylight_threshold_w")]
    pub daylight_threshold_w: f64,

    /// Samples at or below this power are ignored by the envelope filter (W)
    #[serde(default = "default_envelope_floor_w")]
    pub envelope_floor_w: f64,

    /// Lower bound of the strict slope band (degrees, inclusive)
    #[serde(default = "default_strict_angle_min_deg")]
    pub strict_angle_min_deg: f64,

    /// Upper bound of the strict slope band (degrees, exclusive)
    #[serde(default = "default_strict_angle_max_deg")]
    pub strict_angle_max_deg: f64,

    /// Lower bound accepted once a strict run is long enough (degrees)
    #[serde(default = "default_relaxed_angle_min_deg")]
    pub relaxed_angle_min_deg: f64,

    /// Strict acceptances that must be exceeded before the relaxed bound applies
    #[serde(default = "default_continuance_limit")]
    pub continuance_limit: usize,

    /// Residual below which a sample is "near" the fitted curve (W)
    #[serde(default = "default_near_fit_tolerance_w")]
    pub near_fit_tolerance_w: f64,

    /// Near-fit samples that must be exceeded for a trusted baseline.
    /// Absolute count, not a share of the day: short days fail on purpose.
    #[serde(default = "default_min_near_fit_points")]
    pub min_near_fit_points: usize,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            daylight_threshold_w: default_daylight_threshold_w(),
            envelope_floor_w: default_envelope_floor_w(),
            strict_angle_min_deg: default_strict_angle_min_deg(),
            strict_angle_max_deg: default_strict_angle_max_deg(),
            relaxed_angle_min_deg: default_relaxed_angle_min_deg(),
            continuance_limit: default_continuance_limit(),
            near_fit_tolerance_w: default_near_fit_tolerance_w(),
            min_near_fit_points: default_min_near_fit_points(),
        }
    }
}

impl BaselineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("daylight_threshold_w", self.daylight_threshold_w),
            ("envelope_floor_w", self.envelope_floor_w),
            ("near_fit_tolerance_w", self.near_fit_tolerance_w),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("strict_angle_min_deg", self.strict_angle_min_deg),
            ("strict_angle_max_deg", self.strict_angle_max_deg),
            ("relaxed_angle_min_deg", self.relaxed_angle_min_deg),
        ] {
            if !(0.0..=90.0).contains(&value) {
                return Err(ConfigError::AngleOutOfRange { field, value });
            }
        }

        if self.strict_angle_min_deg >= self.strict_angle_max_deg {
            return Err(ConfigError::EmptyStrictBand {
                min: self.strict_angle_min_deg,
                max: self.strict_angle_max_deg,
            });
        }

        if self.relaxed_angle_min_deg > self.strict_angle_min_deg {
            return Err(ConfigError::RelaxedAboveStrict {
                relaxed: self.relaxed_angle_min_deg,
                strict: self.strict_angle_min_deg,
            });
        }

        Ok(())
    }
}
