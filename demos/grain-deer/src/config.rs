//! Demo configuration, optionally loaded from JSON.
//!
//! Every key is optional; missing keys keep their defaults.
//!
//! ```json
//! {
//!   "sim":     { "start": { "year": 2024, "month": 0 },
//!                "end":   { "year": 2030, "month": 0 },
//!                "seed":  7 },
//!   "climate": { "noise_temp": 5.0 },
//!   "hunting": false
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eco_core::SimConfig;
use serde::Deserialize;

use crate::climate::ClimateParams;
use crate::roles::GrainParams;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub sim:            SimConfig,
    pub climate:        ClimateParams,
    pub grain:          GrainParams,
    pub initial_deer:   u32,
    /// Inches.
    pub initial_height: f64,
    /// `false` runs without the hunting role.
    pub hunting:        bool,
    pub output_dir:     PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sim:            SimConfig::default(),
            climate:        ClimateParams::default(),
            grain:          GrainParams::default(),
            initial_deer:   1,
            initial_height: 5.0,
            hunting:        true,
            output_dir:     PathBuf::from("output/grain-deer"),
        }
    }
}

impl DemoConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
