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

//! Shared data types for curtailment analysis.
//!
//! Everything here is plain data: one day of inverter samples, the thresholds
//! that drive baseline estimation, and the tagged energy results handed to
//! downstream reporting.

pub mod config;
pub mod energy;
pub mod quality;
pub mod sample;

// Re-export common types for convenience
pub use config::{BaselineConfig, ConfigError};
pub use energy::{CurtailmentEnergies, EnergyEstimate, EstimationMethod, UnavailableReason};
pub use quality::QualityAssessment;
pub use sample::{DaySample, DaySeries, DaylightWindow, SeriesError};
