// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! D-PV CSV ingestion.

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use csv::StringRecord;
use curtail_core::{DaySample, DaySeries};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Exports carry fractional seconds and offsets after this prefix
const TIMESTAMP_PREFIX_LEN: usize = 19;

/// One circuit on one date, as read from an export
#[derive(Debug, Clone)]
pub struct CircuitDay {
    pub circuit_id: Option<String>,
    pub series: DaySeries,
    /// Rows belonging to other circuits or dates
    pub skipped_rows: usize,
}

/// Column positions resolved from the header row
#[derive(Debug)]
struct Columns {
    timestamp: usize,
    power: usize,
    circuit: Option<usize>,
    energy: Option<usize>,
    reactive_power: Option<usize>,
    voltage: Option<usize>,
    duration: Option<usize>,
    apparent_power: Option<usize>,
    power_factor: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        Ok(Self {
            timestamp: find("Timestamp").context("CSV has no Timestamp column")?,
            power: find("power").context("CSV has no power column")?,
            circuit: find("c_id"),
            energy: find("energy"),
            reactive_power: find("reactive_power"),
            voltage: find("voltage"),
            duration: find("duration"),
            apparent_power: find("va"),
            power_factor: find("pf"),
        })
    }
}

fn parse_value_or_default<T: std::str::FromStr + Default>(s: &str) -> T {
    if s.is_empty() {
        T::default()
    } else {
        s.parse().unwrap_or_default()
    }
}

fn field(record: &StringRecord, column: Option<usize>) -> f64 {
    column
        .and_then(|i| record.get(i))
        .map(parse_value_or_default)
        .unwrap_or_default()
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.get(..TIMESTAMP_PREFIX_LEN).unwrap_or(raw);
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .with_context(|| format!("Failed to parse timestamp: {raw}"))
}

/// Read the first circuit-day of an export.
///
/// The circuit and date of the first row select which rows are kept. Rows are
/// sorted by time and repeated timestamps keep their first occurrence.
pub fn read_circuit_day(reader: impl Read) -> Result<CircuitDay> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::locate(reader.headers().context("Failed to read CSV header")?)?;

    let mut selected: Option<(Option<String>, chrono::NaiveDate)> = None;
    let mut samples = Vec::new();
    let mut skipped_rows = 0;

    for (line, result) in reader.records().enumerate() {
        let record = result.context("Failed to read CSV record")?;
        let raw_timestamp = record
            .get(columns.timestamp)
            .with_context(|| format!("Row {} has no timestamp", line + 1))?;
        let timestamp = parse_timestamp(raw_timestamp)?;
        let circuit = columns
            .circuit
            .and_then(|i| record.get(i))
            .map(str::to_owned);

        let (wanted_circuit, wanted_date) =
            selected.get_or_insert_with(|| (circuit.clone(), timestamp.date()));
        if circuit != *wanted_circuit || timestamp.date() != *wanted_date {
            skipped_rows += 1;
            continue;
        }

        samples.push(DaySample {
            timestamp,
            power: field(&record, Some(columns.power)),
            reactive_power: field(&record, columns.reactive_power),
            voltage: field(&record, columns.voltage),
            apparent_power: field(&record, columns.apparent_power),
            power_factor: field(&record, columns.power_factor),
            energy: field(&record, columns.energy),
            duration: field(&record, columns.duration),
        });
    }

    let Some((circuit_id, date)) = selected else {
        bail!("CSV contains no data rows");
    };

    let read = samples.len();
    samples.sort_by_key(|s| s.timestamp);
    samples.dedup_by_key(|s| s.timestamp);
    if samples.len() < read {
        warn!("Dropped {} rows with repeated timestamps", read - samples.len());
    }
    if skipped_rows > 0 {
        debug!("Skipped {skipped_rows} rows from other circuits or dates");
    }

    let series = DaySeries::new(samples)
        .with_context(|| format!("Invalid power series for {date}"))?;

    Ok(CircuitDay {
        circuit_id,
        series,
        skipped_rows,
    })
}

pub fn load_circuit_day(path: &Path) -> Result<CircuitDay> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;
    read_circuit_day(file).with_context(|| format!("Failed to load {}", path.display()))
}
