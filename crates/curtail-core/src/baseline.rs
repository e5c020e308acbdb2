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

use crate::daylight::filter_daylight;
use crate::envelope::{FilteredPoint, extract_envelope, high_power_points};
use crate::gradient::{SlopeBands, filter_gradients};
use crate::polyfit::BaselineModel;
use crate::quality::assess_quality;
use curtail_types::{
    BaselineConfig, ConfigError, DaySample, DaySeries, DaylightWindow, QualityAssessment,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BaselineError {
    #[error("AC capacity must be a positive number of watts, got {0}")]
    InvalidCapacity(f64),

    #[error("invalid baseline configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A daylight sample augmented with derived columns
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaselineSample {
    pub sample: DaySample,
    /// Power as a share of the inverter AC capacity
    pub power_relative: f64,
    /// Baseline clamped to `[0, ac_capacity]`, `None` when no baseline could be fitted
    pub power_expected: Option<f64>,
}

/// Everything produced for one circuit-day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineOutcome {
    /// `None` when no sample exceeded the daylight threshold
    pub window: Option<DaylightWindow>,
    /// Samples strictly inside the daylight window
    pub series: Vec<BaselineSample>,
    /// Points that survived envelope and gradient filtering
    pub filtered_points: Vec<FilteredPoint>,
    pub model: Option<BaselineModel>,
    pub quality: QualityAssessment,
}

impl BaselineOutcome {
    fn degenerate(window: Option<DaylightWindow>, series: Vec<BaselineSample>) -> Self {
        Self {
            window,
            series,
            filtered_points: Vec::new(),
            model: None,
            quality: QualityAssessment::unusable(),
        }
    }

    /// True when the day did not yield a usable baseline
    pub fn is_degenerate(&self) -> bool {
        self.model.is_none()
    }
}

/// Runs the baseline pipeline with a fixed configuration.
///
/// Stateless between calls, so one estimator can serve many circuit-days,
/// including from several threads at once.
#[derive(Debug, Clone, Default)]
pub struct BaselineEstimator {
    config: BaselineConfig,
}

impl BaselineEstimator {
    pub fn new(config: BaselineConfig) -> Result<Self, BaselineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BaselineConfig {
        &self.config
    }

    /// Estimate the uncurtailed generation curve for one circuit-day.
    ///
    /// Stages run in a fixed order: daylight trim, relative power, high-power
    /// subset, envelope, gradient, polyfit, evaluation over the whole daylight
    /// window, clamp to `[0, ac_capacity_w]`, quality gate.
    pub fn estimate(
        &self,
        series: &DaySeries,
        ac_capacity_w: f64,
    ) -> Result<BaselineOutcome, BaselineError> {
        if !ac_capacity_w.is_finite() || ac_capacity_w <= 0.0 {
            return Err(BaselineError::InvalidCapacity(ac_capacity_w));
        }

        let (window, daylight) = filter_daylight(series, self.config.daylight_threshold_w);
        let Some(window) = window else {
            warn!("No daylight samples, baseline unavailable");
            return Ok(BaselineOutcome::degenerate(None, Vec::new()));
        };

        let mut augmented: Vec<BaselineSample> = daylight
            .iter()
            .map(|s| BaselineSample {
                sample: *s,
                power_relative: s.power / ac_capacity_w,
                power_expected: None,
            })
            .collect();

        let envelope = extract_envelope(high_power_points(&daylight, self.config.envelope_floor_w));
        let filtered = filter_gradients(&envelope, &SlopeBands::from_config(&self.config));

        let model = match BaselineModel::fit(&filtered) {
            Ok(model) => model,
            Err(e) => {
                warn!(
                    "Baseline fit failed for window {} - {}: {}",
                    window.sunrise, window.sunset, e
                );
                let mut outcome = BaselineOutcome::degenerate(Some(window), augmented);
                outcome.filtered_points = filtered;
                return Ok(outcome);
            }
        };

        for point in &mut augmented {
            let expected = model.expected_power_at(point.sample.timestamp);
            point.power_expected = Some(expected.clamp(0.0, ac_capacity_w));
        }

        let quality = assess_quality(
            augmented
                .iter()
                .filter_map(|p| p.power_expected.map(|e| (p.sample.power, e))),
            &self.config,
        );

        info!(
            "Baseline quality {}: {} of {} samples near fit, {} points fitted",
            if quality.is_good { "good" } else { "poor" },
            quality.near_fit_points,
            augmented.len(),
            filtered.len()
        );

        Ok(BaselineOutcome {
            window: Some(window),
            series: augmented,
            filtered_points: filtered,
            model: Some(model),
            quality,
        })
    }
}

/// Estimate with default thresholds
pub fn estimate_baseline(
    series: &DaySeries,
    ac_capacity_w: f64,
) -> Result<BaselineOutcome, BaselineError> {
    BaselineEstimator::default().estimate(series, ac_capacity_w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn dawn() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 21)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    /// Minute samples of a symmetric parabola peaking at `peak_w` in the middle
    fn parabola_day(minutes: i64, peak_w: f64) -> DaySeries {
        let half = minutes as f64 / 2.0;
        DaySeries::new(
            (0..=minutes)
                .map(|m| {
                    let x = (m as f64 - half) / half;
                    DaySample::new(dawn() + Duration::minutes(m), peak_w * (1.0 - x * x))
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_capacity() {
        let day = parabola_day(200, 5000.0);
        assert_eq!(
            estimate_baseline(&day, 0.0),
            Err(BaselineError::InvalidCapacity(0.0))
        );
        assert!(estimate_baseline(&day, f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = BaselineConfig {
            near_fit_tolerance_w: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            BaselineEstimator::new(config),
            Err(BaselineError::Config(_))
        ));
    }

    #[test]
    fn test_dark_day_is_degenerate() {
        let day = DaySeries::new(
            (0..100)
                .map(|m| DaySample::new(dawn() + Duration::minutes(m), 5.0))
                .collect(),
        )
        .unwrap();
        let outcome = estimate_baseline(&day, 5000.0).unwrap();
        assert!(outcome.window.is_none());
        assert!(outcome.series.is_empty());
        assert!(outcome.is_degenerate());
        assert!(!outcome.quality.is_good);
    }

    #[test]
    fn test_flat_day_is_degenerate_not_panic() {
        let mut samples = vec![DaySample::new(dawn(), 0.0)];
        samples.extend((1..120).map(|m| DaySample::new(dawn() + Duration::minutes(m), 500.0)));
        samples.push(DaySample::new(dawn() + Duration::minutes(120), 0.0));
        let day = DaySeries::new(samples).unwrap();

        let outcome = estimate_baseline(&day, 5000.0).unwrap();
        assert!(outcome.window.is_some());
        assert_eq!(outcome.series.len(), 117);
        assert!(outcome.is_degenerate());
        assert!(outcome.series.iter().all(|p| p.power_expected.is_none()));
        assert!(!outcome.quality.is_good);
    }

    #[test]
    fn test_clear_day_fits_and_clamps() {
        let day = parabola_day(200, 5000.0);
        let outcome = estimate_baseline(&day, 4000.0).unwrap();

        assert!(!outcome.is_degenerate());
        // First and last samples above 10 W bound the window and are excluded
        assert_eq!(outcome.series.len(), 197);
        for point in &outcome.series {
            let expected = point.power_expected.unwrap();
            assert!((0.0..=4000.0).contains(&expected));
            assert!((point.power_relative - point.sample.power / 4000.0).abs() < 1e-12);
        }
        assert!(outcome.series.iter().any(|p| p.power_expected == Some(4000.0)));
    }

    #[test]
    fn test_estimator_is_reusable() {
        let estimator = BaselineEstimator::default();
        let day = parabola_day(200, 5000.0);
        let first = estimator.estimate(&day, 5000.0).unwrap();
        let second = estimator.estimate(&day, 5000.0).unwrap();
        assert_eq!(first, second);
    }
}
