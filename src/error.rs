use std::path::PathBuf;
use thiserror::Error;

/// Conditions the scoring pipeline surfaces to its caller.
///
/// Degenerate indicator columns, indicators missing from a period and
/// unresolved region attributes are not errors: they fall back to
/// documented defaults inside the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The observation table is absent or could not be read.
    #[error("observation table {path} is unavailable: {reason}")]
    MissingSource { path: PathBuf, reason: String },

    /// Filtering left nothing to score.
    #[error("no observations in scope: {0}")]
    EmptyScope(String),

    /// Fewer candidates than requested remain after exclusion.
    #[error("requested top {requested} regions but only {available} remain after exclusion")]
    InsufficientRanked { requested: usize, available: usize },
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
