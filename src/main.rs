use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use soil_breakdown::{PipelineError, RunConfig, ZeroInitialPolicy};

/// Compute pollutant breakdown rates and correct them for soil moisture.
#[derive(Parser)]
#[command(name = "soil-breakdown")]
#[command(version, about)]
struct Cli {
    /// Input table (.csv, .json or .parquet) [default: data/experiment.csv].
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output table; parent directories are created [default: results/breakdown_rates.csv].
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Baseline soil moisture (%) that leaves a rate unscaled [default: 30.0].
    #[arg(short, long, allow_negative_numbers = true)]
    reference_moisture: Option<f64>,

    /// Handling of rows whose initial concentration is zero [default: flag].
    #[arg(long, value_enum)]
    on_zero_initial: Option<ZeroPolicyArg>,

    /// Number of result rows to print after saving (0 disables) [default: 5].
    #[arg(long)]
    preview: Option<usize>,

    /// JSON run file; flags given on the command line take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ZeroPolicyArg {
    Flag,
    Abort,
}

impl From<ZeroPolicyArg> for ZeroInitialPolicy {
    fn from(arg: ZeroPolicyArg) -> Self {
        match arg {
            ZeroPolicyArg::Flag => ZeroInitialPolicy::Flag,
            ZeroPolicyArg::Abort => ZeroInitialPolicy::Abort,
        }
    }
}

impl Cli {
    fn into_config(self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(reference) = self.reference_moisture {
            config.pipeline.reference_moisture = reference;
        }
        if let Some(policy) = self.on_zero_initial {
            config.pipeline.zero_initial = policy.into();
        }
        if let Some(rows) = self.preview {
            config.preview_rows = rows;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    log::debug!("run configuration: {config:?}");

    match soil_breakdown::run(&config) {
        Ok(report) => {
            println!("Results saved to {}", config.output.display());
            if let Some(table) = report.preview {
                println!("{table}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<PipelineError>() {
                // Expected when the experiment has not been exported yet.
                Some(missing @ PipelineError::InputNotFound(_)) => println!("{missing}"),
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
