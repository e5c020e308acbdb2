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

mod args;
mod config;
mod formatters;
mod loader;

use anyhow::{Context, Result};
use args::{BaselineArgs, Cli, Commands, EnergyArgs, OutputFormat};
use clap::Parser;
use config::CliConfig;
use curtail_core::{
    BaselineEstimator, CurtailmentEnergies, energy_generated_kwh, estimate_expected_energy,
    expected_energy_kwh, has_usable_size, resample_to_minutes,
};
use formatters::{BaselineReport, CsvFormatter, TableFormatter};
use tracing::{info, warn};

fn run_baseline(args: &BaselineArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let ac_capacity_w = config.ac_capacity_w(args.ac_capacity)?;

    let day = loader::load_circuit_day(&args.csv)?;
    info!(
        "Loaded {} samples for circuit {}",
        day.series.len(),
        day.circuit_id.as_deref().unwrap_or("-")
    );

    if !has_usable_size(&day.series) {
        warn!("Day has too few samples or no daytime data");
        println!("Cannot analyse this day: insufficient data");
        return Ok(());
    }

    let series = resample_to_minutes(&day.series).context("Failed to resample series")?;
    let estimator = BaselineEstimator::new(config.baseline)?;
    let outcome = estimator.estimate(&series, ac_capacity_w)?;

    let report = BaselineReport {
        circuit_id: day.circuit_id,
        date: series.date(),
        samples: series.len(),
        window: outcome.window,
        filtered_points: outcome.filtered_points.len(),
        quality: outcome.quality,
        coefficients: outcome.model.map(|m| m.coefficients()),
        energy_generated_kwh: energy_generated_kwh(&series),
        energy_expected_kwh: expected_energy_kwh(&outcome),
    };

    match args.output {
        OutputFormat::Table => print!("{}", TableFormatter::format_baseline(&report)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }

    if let Some(path) = &args.export {
        CsvFormatter::export_series(&outcome, path)?;
        info!("Exported {} samples to {}", outcome.series.len(), path.display());
    }

    Ok(())
}

fn run_energy(args: &EnergyArgs) -> Result<()> {
    let curtailment = CurtailmentEnergies {
        tripping_kwh: args.tripping,
        vvar_kwh: args.vvar,
        vwatt_kwh: args.vwatt,
    };
    let estimate = estimate_expected_energy(args.generated, &curtailment, args.clear_sky);

    match args.output {
        OutputFormat::Table => print!("{}", TableFormatter::format_energy(args.generated, &estimate)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&estimate).context("Failed to serialize estimate")?
        ),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose {
        "curtail=debug"
    } else {
        "curtail=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().context("Invalid log directive")?),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Baseline(args) => run_baseline(args),
        Commands::Energy(args) => run_energy(args),
    }
}
