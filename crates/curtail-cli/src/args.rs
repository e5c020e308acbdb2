// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "curtail")]
#[command(author, version, about = "D-PV curtailment baseline estimator")]
#[command(
    long_about = "Estimate the uncurtailed generation curve of a solar inverter from one day\n\
    of measured power, and combine detected curtailment into expected energy.\n\
    \nExamples:\n  \
    curtail baseline --csv circuit.csv --ac-capacity 5000\n  \
    curtail baseline --csv circuit.csv --config site.toml --output json\n  \
    curtail energy --generated 24.1 --tripping 1.3 --clear-sky false"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fit the clear-sky baseline for one circuit-day
    #[command(
        long_about = "Read a D-PV CSV export, fit the baseline through the upper envelope\n\
        of the power curve and report how well the day follows it.\n\
        \nOnly the circuit and date of the first row are analysed.\n\
        \nExamples:\n  \
        curtail baseline --csv circuit.csv --ac-capacity 5000\n  \
        curtail baseline --csv circuit.csv --ac-capacity 5000 --export baseline.csv"
    )]
    Baseline(BaselineArgs),

    /// Combine generated energy with detected curtailment
    Energy(EnergyArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Parser)]
pub struct BaselineArgs {
    /// D-PV CSV export
    #[arg(long, value_name = "PATH")]
    pub csv: PathBuf,

    /// Inverter AC capacity in watts (overrides [site] in the config file)
    #[arg(long, value_name = "WATTS")]
    pub ac_capacity: Option<f64>,

    /// TOML file with [baseline] thresholds and [site] details
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Write the daylight series with expected power to a CSV file
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct EnergyArgs {
    /// Energy generated on the day (kWh)
    #[arg(long, value_name = "KWH")]
    pub generated: f64,

    /// Energy lost to inverter tripping (kWh)
    #[arg(long, value_name = "KWH", default_value_t = 0.0)]
    pub tripping: f64,

    /// Energy lost to Volt-VAr response (kWh)
    #[arg(long, value_name = "KWH")]
    pub vvar: Option<f64>,

    /// Energy lost to Volt-Watt response (kWh)
    #[arg(long, value_name = "KWH")]
    pub vwatt: Option<f64>,

    /// Clear-sky classification of the day, omit when unknown
    #[arg(long, value_name = "BOOL", action = clap::ArgAction::Set)]
    pub clear_sky: Option<bool>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}
