//! Ranks regions for a location-siting decision.
//!
//! Raw indicator observations are pivoted per region, min-max normalized,
//! averaged into category scores and combined into composite indices
//! (structural, opportunity and density-adjusted). The ranking module turns
//! any of those indices into a top-N shortlist.

pub mod attributes;
pub mod config;
pub mod error;
pub mod observation;
pub mod output;
pub mod pipeline;
pub mod ranking;
pub mod scoring;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::score_observations;
