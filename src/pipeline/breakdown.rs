use crate::config::ZeroInitialPolicy;
use crate::data::model::{CellValue, Dataset};
use crate::error::{PipelineError, Result};

use super::columns::{BREAKDOWN_RATE, CONCENTRATION_FINAL, CONCENTRATION_INITIAL};

// ---------------------------------------------------------------------------
// BreakdownRateCalculator
// ---------------------------------------------------------------------------

/// Appends `breakdown_rate = (initial - final) / initial` to every row.
///
/// A negative rate (concentration went up) is a valid result. A zero initial
/// concentration is handled according to the configured [`ZeroInitialPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakdownRateCalculator {
    policy: ZeroInitialPolicy,
}

impl BreakdownRateCalculator {
    pub fn new(policy: ZeroInitialPolicy) -> Self {
        Self { policy }
    }

    /// Fractional reduction for one sample, `None` when `initial` is zero.
    pub fn rate(initial: f64, final_: f64) -> Option<f64> {
        if initial == 0.0 {
            return None;
        }
        Some((initial - final_) / initial)
    }

    /// Compute the column and attach it to `dataset`.
    ///
    /// Returns the number of rows flagged non-finite under
    /// [`ZeroInitialPolicy::Flag`]. Nothing is modified on error.
    pub fn apply(&self, dataset: &mut Dataset) -> Result<usize> {
        // Schema first, so a missing column wins over a bad cell in the other one.
        dataset.column_index(CONCENTRATION_INITIAL)?;
        dataset.column_index(CONCENTRATION_FINAL)?;

        let initial = dataset.numeric_column(CONCENTRATION_INITIAL)?;
        let final_ = dataset.numeric_column(CONCENTRATION_FINAL)?;

        let mut flagged = 0;
        let mut rates = Vec::with_capacity(initial.len());
        for (row, (&i, &f)) in initial.iter().zip(&final_).enumerate() {
            let rate = match Self::rate(i, f) {
                Some(rate) => rate,
                None => match self.policy {
                    ZeroInitialPolicy::Abort => return Err(PipelineError::DivisionByZero { row }),
                    ZeroInitialPolicy::Flag => {
                        log::warn!("row {row}: initial concentration is zero, breakdown rate set to NaN");
                        flagged += 1;
                        f64::NAN
                    }
                },
            };
            rates.push(CellValue::Float(rate));
        }

        dataset.set_column(BREAKDOWN_RATE, rates)?;
        log::debug!("breakdown rate computed for {} rows ({flagged} flagged)", dataset.len());
        Ok(flagged)
    }
}
