use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Baseline soil moisture (%) when none is configured.
pub const DEFAULT_REFERENCE_MOISTURE: f64 = 30.0;

pub const DEFAULT_INPUT: &str = "data/experiment.csv";
pub const DEFAULT_OUTPUT: &str = "results/breakdown_rates.csv";
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Zero-initial policy
// ---------------------------------------------------------------------------

/// What to do with a row whose initial concentration is exactly zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroInitialPolicy {
    /// Keep the row, set its breakdown rate to NaN and report it.
    #[default]
    Flag,
    /// Fail the run with `DivisionByZero`.
    Abort,
}

// ---------------------------------------------------------------------------
// Pipeline configuration
// ---------------------------------------------------------------------------

/// Parameters of the numeric stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub reference_moisture: f64,
    pub zero_initial: ZeroInitialPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference_moisture: DEFAULT_REFERENCE_MOISTURE,
            zero_initial: ZeroInitialPolicy::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.reference_moisture.is_finite() || self.reference_moisture <= 0.0 {
            return Err(PipelineError::InvalidConfiguration(format!(
                "reference_moisture must be a positive number, got {}",
                self.reference_moisture
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Everything a single input → output run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Rows printed after saving; 0 disables the preview.
    pub preview_rows: usize,
    #[serde(flatten)]
    pub pipeline: PipelineConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            pipeline: PipelineConfig::default(),
        }
    }
}

impl RunConfig {
    /// Read a JSON run file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}
