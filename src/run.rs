use anyhow::{Context, Result};

use crate::config::RunConfig;
use crate::data::{loader, preview, writer};
use crate::error::PipelineError;
use crate::pipeline::{self, StageSummary};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub summary: StageSummary,
    /// First rows of the output table, when a preview was requested.
    pub preview: Option<String>,
}

/// Load → breakdown rate → moisture correction → write.
///
/// The output file is only created once every stage has succeeded.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    if !config.input.exists() {
        return Err(PipelineError::InputNotFound(config.input.clone()).into());
    }

    let mut dataset = loader::load_file(&config.input)
        .with_context(|| format!("loading {}", config.input.display()))?;

    let summary = pipeline::run_stages(&mut dataset, &config.pipeline)?;
    if summary.flagged_rows > 0 {
        log::warn!(
            "{} of {} rows have a zero initial concentration; their rates are NaN",
            summary.flagged_rows,
            summary.rows
        );
    }

    writer::write_file(&dataset, &config.output)
        .with_context(|| format!("writing {}", config.output.display()))?;

    let preview = match config.preview_rows {
        0 => None,
        n => Some(preview::head(&dataset, n)?),
    };

    Ok(RunReport { summary, preview })
}
