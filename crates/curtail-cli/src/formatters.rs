// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! Output formatters for baseline and energy results.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use curtail_core::{BaselineOutcome, DaylightWindow, EnergyEstimate, QualityAssessment};
use serde::Serialize;
use std::path::Path;

const TIME_FORMAT: &str = "%H:%M:%S";

/// Summary of one circuit-day, printed as a table or JSON
#[derive(Debug, Clone, Serialize)]
pub struct BaselineReport {
    pub circuit_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub samples: usize,
    pub window: Option<DaylightWindow>,
    pub filtered_points: usize,
    pub quality: QualityAssessment,
    /// `[a, b, c]` over fractional days since the Unix epoch
    pub coefficients: Option<[f64; 3]>,
    pub energy_generated_kwh: f64,
    pub energy_expected_kwh: Option<f64>,
}

impl BaselineReport {
    pub fn is_degenerate(&self) -> bool {
        self.coefficients.is_none()
    }
}

/// Formatter for pretty tables
#[derive(Debug)]
pub struct TableFormatter;

/// Formatter for CSV export
#[derive(Debug)]
pub struct CsvFormatter;

fn bold(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

impl TableFormatter {
    pub fn format_baseline(report: &BaselineReport) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![bold("Metric"), bold("Value")]);

        let window = report.window.map_or_else(
            || "-".to_owned(),
            |w| {
                format!(
                    "{} - {}",
                    w.sunrise.format(TIME_FORMAT),
                    w.sunset.format(TIME_FORMAT)
                )
            },
        );
        let quality = if report.is_degenerate() {
            Cell::new("insufficient data").fg(Color::Yellow)
        } else if report.quality.is_good {
            Cell::new("good").fg(Color::Green)
        } else {
            Cell::new("poor").fg(Color::Red)
        };

        table.add_row(vec![
            Cell::new("Circuit"),
            Cell::new(report.circuit_id.as_deref().unwrap_or("-")),
        ]);
        table.add_row(vec![
            Cell::new("Date"),
            Cell::new(report.date.map_or_else(|| "-".to_owned(), |d| d.to_string())),
        ]);
        table.add_row(vec![Cell::new("Samples"), Cell::new(report.samples)]);
        table.add_row(vec![Cell::new("Daylight window"), Cell::new(window)]);
        table.add_row(vec![
            Cell::new("Filtered points"),
            Cell::new(report.filtered_points),
        ]);
        table.add_row(vec![
            Cell::new("Near-fit samples"),
            Cell::new(report.quality.near_fit_points),
        ]);
        table.add_row(vec![Cell::new("Baseline quality"), quality]);
        table.add_row(vec![
            Cell::new("Generated (kWh)"),
            Cell::new(format!("{:.2}", report.energy_generated_kwh)),
        ]);
        table.add_row(vec![
            Cell::new("Expected (kWh)"),
            Cell::new(
                report
                    .energy_expected_kwh
                    .map_or_else(|| "insufficient data".to_owned(), |e| format!("{e:.2}")),
            ),
        ]);

        let mut output = table.to_string();
        output.push('\n');
        output
    }

    pub fn format_energy(generated_kwh: f64, estimate: &EnergyEstimate) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![bold("Generated (kWh)"), bold("Expected")]);
        table.add_row(vec![
            Cell::new(format!("{generated_kwh:.2}")),
            Cell::new(estimate.to_string()),
        ]);

        let mut output = table.to_string();
        output.push('\n');
        output
    }
}

impl CsvFormatter {
    /// Daylight samples with relative and expected power.
    ///
    /// Expected power is left blank on days without a baseline.
    pub fn export_series(outcome: &BaselineOutcome, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        writer.write_record(["timestamp", "power", "power_relative", "power_expected"])?;

        for point in &outcome.series {
            writer.write_record([
                point.sample.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                format!("{:.3}", point.sample.power),
                format!("{:.6}", point.power_relative),
                point
                    .power_expected
                    .map(|e| format!("{e:.3}"))
                    .unwrap_or_default(),
            ])?;
        }

        writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDateTime};
    use curtail_core::{DaySample, DaySeries, estimate_baseline};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 21)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn empty_report() -> BaselineReport {
        BaselineReport {
            circuit_id: None,
            date: None,
            samples: 0,
            window: None,
            filtered_points: 0,
            quality: QualityAssessment::unusable(),
            coefficients: None,
            energy_generated_kwh: 0.0,
            energy_expected_kwh: None,
        }
    }

    #[test]
    fn test_degenerate_day_reads_insufficient_data() {
        let output = TableFormatter::format_baseline(&empty_report());
        assert!(output.contains("insufficient data"));
        assert!(output.contains("Daylight window"));
    }

    #[test]
    fn test_good_day_table() {
        let report = BaselineReport {
            circuit_id: Some("42".to_owned()),
            date: Some(noon().date()),
            samples: 600,
            window: Some(DaylightWindow {
                sunrise: noon() - Duration::hours(6),
                sunset: noon() + Duration::hours(6),
            }),
            filtered_points: 120,
            quality: QualityAssessment {
                is_good: true,
                near_fit_points: 400,
            },
            coefficients: Some([-1.0, 2.0, 3.0]),
            energy_generated_kwh: 31.456,
            energy_expected_kwh: Some(33.0),
        };
        let output = TableFormatter::format_baseline(&report);
        assert!(output.contains("06:00:00 - 18:00:00"));
        assert!(output.contains("good"));
        assert!(output.contains("31.46"));
        assert!(output.contains("33.00"));
    }

    #[test]
    fn test_energy_table() {
        let estimate = EnergyEstimate::Unavailable {
            reason: curtail_core::UnavailableReason::NoTrippingDetected,
        };
        let output = TableFormatter::format_energy(12.0, &estimate);
        assert!(output.contains("12.00"));
        assert!(output.contains("n/a"));
    }

    #[test]
    fn test_export_leaves_expected_blank_without_baseline() {
        let series = DaySeries::new(
            (0..5)
                .map(|m| DaySample::new(noon() + Duration::minutes(m), 500.0))
                .collect(),
        )
        .unwrap();
        let outcome = estimate_baseline(&series, 5000.0).unwrap();
        assert!(outcome.is_degenerate());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        CsvFormatter::export_series(&outcome, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("timestamp,power,power_relative,power_expected")
        );
        // Window bounds are excluded, three interior samples remain
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], "2025-06-21 12:01:00,500.000,0.100000,");
    }
}
