// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.

//! TOML configuration file for the CLI.

use anyhow::{Context, Result};
use curtail_core::BaselineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Inverter AC capacity (W)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ac_capacity_w: Option<f64>,
}

/// Contents of `--config`, every table optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub baseline: BaselineConfig,

    #[serde(default)]
    pub site: SiteConfig,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .baseline
            .validate()
            .with_context(|| format!("Invalid [baseline] table in {}", path.display()))?;
        Ok(config)
    }

    /// Flag value wins over the config file
    pub fn ac_capacity_w(&self, flag: Option<f64>) -> Result<f64> {
        flag.or(self.site.ac_capacity_w).context(
            "AC capacity unknown: pass --ac-capacity or set [site] ac_capacity_w in --config",
        )
    }
}
