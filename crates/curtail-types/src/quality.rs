// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

use serde::{Deserialize, Serialize};

/// Trust signal for a fitted baseline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// True when the baseline may be used by curtailment detectors
    pub is_good: bool,
    /// Samples whose residual against the baseline is below tolerance
    pub near_fit_points: usize,
}

impl QualityAssessment {
    /// Verdict for a day without a usable baseline
    pub fn unusable() -> Self {
        Self::default()
    }
}
