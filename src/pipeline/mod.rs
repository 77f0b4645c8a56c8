/// Numeric stages, applied in a fixed order over one in-memory table.
///
/// ```text
///   Dataset (initial, final, moisture, ...)
///        │
///        ▼
///   ┌─────────────────────────┐
///   │ BreakdownRateCalculator │  + breakdown_rate
///   └─────────────────────────┘
///        │
///        ▼
///   ┌────────────────────┐
///   │ MoistureNormalizer │  + corrected_breakdown_rate
///   └────────────────────┘
/// ```

pub mod breakdown;
pub mod moisture;

use crate::config::PipelineConfig;
use crate::data::model::Dataset;
use crate::error::Result;

pub use breakdown::BreakdownRateCalculator;
pub use moisture::MoistureNormalizer;

/// Recognized column names.
pub mod columns {
    pub const CONCENTRATION_INITIAL: &str = "pollutant_concentration_initial";
    pub const CONCENTRATION_FINAL: &str = "pollutant_concentration_final";
    pub const SOIL_MOISTURE: &str = "soil_moisture_pct";
    pub const BREAKDOWN_RATE: &str = "breakdown_rate";
    pub const CORRECTED_BREAKDOWN_RATE: &str = "corrected_breakdown_rate";
}

/// Outcome of a successful pass over the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSummary {
    pub rows: usize,
    /// Rows whose breakdown rate was set to NaN because the initial concentration was zero.
    pub flagged_rows: usize,
}

/// Run both stages over `dataset`.
///
/// The configuration is checked before any row is touched. On error the
/// dataset may hold the breakdown column but never a partial one.
pub fn run_stages(dataset: &mut Dataset, config: &PipelineConfig) -> Result<StageSummary> {
    let normalizer = MoistureNormalizer::new(config.reference_moisture)?;
    let calculator = BreakdownRateCalculator::new(config.zero_initial);

    let flagged_rows = calculator.apply(dataset)?;
    normalizer.apply(dataset)?;

    Ok(StageSummary {
        rows: dataset.len(),
        flagged_rows,
    })
}
