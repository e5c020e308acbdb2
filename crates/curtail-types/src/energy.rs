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

use serde::{Deserialize, Serialize};
use std::fmt;

/// Energy lost to each curtailment mechanism on one day (kWh)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurtailmentEnergies {
    pub tripping_kwh: f64,
    /// Missing when the V-VAr detector could not run
    #[serde(default)]
    pub vvar_kwh: Option<f64>,
    /// Missing when the V-Watt detector could not run
    #[serde(default)]
    pub vwatt_kwh: Option<f64>,
}

/// How the expected (uncurtailed) energy was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMethod {
    /// Clear-sky day, quadratic baseline
    Polyfit,
    /// Cloudy day with tripping, linear interpolation across the trip
    Linear,
}

impl fmt::Display for EstimationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polyfit => write!(f, "Polyfit"),
            Self::Linear => write!(f, "Linear"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// Clear-sky classification was not available for the date
    NoClearSkyClassification,
    /// Not a clear-sky day and no tripping to interpolate across
    NoTrippingDetected,
    /// Inputs were missing or not finite
    InsufficientData,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoClearSkyClassification => write!(f, "no clear-sky classification"),
            Self::NoTrippingDetected => write!(f, "no tripping detected"),
            Self::InsufficientData => write!(f, "insufficient data"),
        }
    }
}

/// Expected daily generation without curtailment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnergyEstimate {
    Available { kwh: f64, method: EstimationMethod },
    Unavailable { reason: UnavailableReason },
}

impl EnergyEstimate {
    pub fn kwh(&self) -> Option<f64> {
        match self {
            Self::Available { kwh, .. } => Some(*kwh),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn method(&self) -> Option<EstimationMethod> {
        match self {
            Self::Available { method, .. } => Some(*method),
            Self::Unavailable { .. } => None,
        }
    }
}

impl fmt::Display for EnergyEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { kwh, method } => write!(f, "{kwh:.2} kWh ({method})"),
            Self::Unavailable { reason } => write!(f, "n/a ({reason})"),
        }
    }
}
