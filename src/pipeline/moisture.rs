use crate::config::PipelineConfig;
use crate::data::model::{CellValue, Dataset};
use crate::error::Result;

use super::columns::{BREAKDOWN_RATE, CORRECTED_BREAKDOWN_RATE, SOIL_MOISTURE};

// ---------------------------------------------------------------------------
// MoistureNormalizer
// ---------------------------------------------------------------------------

/// Appends `corrected_breakdown_rate = breakdown_rate * (moisture / reference)`.
///
/// The result is not clamped: moisture above the reference can push the
/// corrected rate past 1.0, and a negative rate scales the same way.
#[derive(Debug, Clone, Copy)]
pub struct MoistureNormalizer {
    reference_moisture: f64,
}

impl MoistureNormalizer {
    /// Fails with `InvalidConfiguration` unless the reference is a positive number.
    pub fn new(reference_moisture: f64) -> Result<Self> {
        PipelineConfig {
            reference_moisture,
            ..Default::default()
        }
        .validate()?;
        Ok(Self { reference_moisture })
    }

    /// Scaling applied to a sample at the given soil moisture.
    pub fn multiplier(&self, moisture_pct: f64) -> f64 {
        moisture_pct / self.reference_moisture
    }

    pub fn correct(&self, breakdown_rate: f64, moisture_pct: f64) -> f64 {
        breakdown_rate * self.multiplier(moisture_pct)
    }

    /// Compute the corrected column and attach it to `dataset`.
    pub fn apply(&self, dataset: &mut Dataset) -> Result<()> {
        dataset.column_index(BREAKDOWN_RATE)?;
        dataset.column_index(SOIL_MOISTURE)?;

        let rates = dataset.numeric_column(BREAKDOWN_RATE)?;
        let moisture = dataset.numeric_column(SOIL_MOISTURE)?;

        let corrected = rates
            .iter()
            .zip(&moisture)
            .map(|(&rate, &m)| CellValue::Float(self.correct(rate, m)))
            .collect();

        dataset.set_column(CORRECTED_BREAKDOWN_RATE, corrected)?;
        log::debug!(
            "moisture correction applied to {} rows (reference {}%)",
            dataset.len(),
            self.reference_moisture
        );
        Ok(())
    }
}
