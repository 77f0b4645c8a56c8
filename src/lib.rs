//! Pollutant breakdown rates from soil experiments.
//!
//! A run loads a measurement table, derives the fractional reduction in
//! pollutant concentration per sample, corrects it for the sample's soil
//! moisture relative to a reference value, and writes the enriched table.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod run;

pub use config::{PipelineConfig, RunConfig, ZeroInitialPolicy};
pub use error::PipelineError;
pub use run::{RunReport, run};
