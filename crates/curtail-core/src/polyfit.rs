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

//! Quadratic least-squares baseline.

use crate::axis;
use crate::envelope::FilteredPoint;
use chrono::NaiveDateTime;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Points needed to pin down a quadratic
const MIN_DISTINCT_POINTS: usize = 3;

/// Singular values below this are treated as zero during the solve
const SVD_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("quadratic fit needs {MIN_DISTINCT_POINTS} distinct points, got {points}")]
    Underdetermined { points: usize },

    #[error("least-squares system is singular")]
    Singular,

    #[error("fit input contains non-finite values")]
    NonFinite,
}

/// `y = a·x² + b·x + c` fitted by least squares.
///
/// Raw day numbers (~20 000) make the Vandermonde columns nearly collinear, so
/// the solve runs on `u = (x - center) / scale` and the transform is kept
/// alongside the coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadraticFit {
    center: f64,
    scale: f64,
    /// Coefficients in `u`, constant term first
    scaled: [f64; 3],
}

impl QuadraticFit {
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, FitError> {
        if xs.len() != ys.len() {
            return Err(FitError::Underdetermined {
                points: xs.len().min(ys.len()),
            });
        }
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite);
        }

        let mut distinct = xs.to_vec();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup();
        if distinct.len() < MIN_DISTINCT_POINTS {
            return Err(FitError::Underdetermined { points: xs.len() });
        }

        let center = xs.iter().sum::<f64>() / xs.len() as f64;
        let scale = xs
            .iter()
            .map(|x| (x - center).abs())
            .fold(0.0_f64, f64::max);

        let design = DMatrix::from_fn(xs.len(), 3, |row, col| {
            let u = (xs[row] - center) / scale;
            match col {
                0 => 1.0,
                1 => u,
                _ => u * u,
            }
        });
        let target = DVector::from_column_slice(ys);

        let solution = design
            .svd(true, true)
            .solve(&target, SVD_EPSILON)
            .map_err(|_| FitError::Singular)?;

        let scaled = [solution[0], solution[1], solution[2]];
        if scaled.iter().any(|c| !c.is_finite()) {
            return Err(FitError::Singular);
        }

        Ok(Self {
            center,
            scale,
            scaled,
        })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let u = (x - self.center) / self.scale;
        let [c0, c1, c2] = self.scaled;
        c0 + u * (c1 + u * c2)
    }

    /// Coefficients in `x`, highest power first: `[a, b, c]`
    pub fn coefficients(&self) -> [f64; 3] {
        let [c0, c1, c2] = self.scaled;
        let (m, s) = (self.center, self.scale);
        let a = c2 / (s * s);
        let b = c1 / s - 2.0 * c2 * m / (s * s);
        let c = c0 - c1 * m / s + c2 * m * m / (s * s);
        [a, b, c]
    }
}

/// Expected power as a function of time, fitted once per circuit-day.
///
/// The raw curve is unclamped; it can be re-evaluated at any timestamp within
/// or slightly beyond the fitted window without refitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineModel {
    fit: QuadraticFit,
}

impl BaselineModel {
    pub fn fit(points: &[FilteredPoint]) -> Result<Self, FitError> {
        let xs: Vec<f64> = points
            .iter()
            .map(|p| axis::fractional_days(p.timestamp))
            .collect();
        let ys: Vec<f64> = points.iter().map(|p| p.power).collect();

        let fit = QuadraticFit::fit(&xs, &ys)?;
        debug!(
            "Fitted baseline through {} points, coefficients {:?}",
            points.len(),
            fit.coefficients()
        );
        Ok(Self { fit })
    }

    pub fn expected_power_at(&self, timestamp: NaiveDateTime) -> f64 {
        self.fit.evaluate(axis::fractional_days(timestamp))
    }

    /// `[a, b, c]` over fractional days since the Unix epoch
    pub fn coefficients(&self) -> [f64; 3] {
        self.fit.coefficients()
    }

    pub fn quadratic(&self) -> &QuadraticFit {
        &self.fit
    }
}
