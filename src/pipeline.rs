use tracing::info;

use crate::attributes::RegionResolver;
use crate::config::ReferenceConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::observation::{filter_scope, join_periods, pivot_period, select_periods, Observation};
use crate::scoring::{score_regions, ScoredTable, ScoringConfig};

/// Run every scoring stage over a raw observation table.
///
/// Filters to scope and the configured indicators, pivots the current and
/// baseline periods, joins them by region and builds all indices.
pub fn score_observations(
    observations: &[Observation],
    scoring: &ScoringConfig,
    references: &ReferenceConfig,
) -> PipelineResult<ScoredTable> {
    let in_scope = filter_scope(observations, &scoring.indicators())?;

    let periods = select_periods(
        &in_scope,
        scoring.trend.current_period,
        scoring.trend.baseline_period,
    )?;

    let joined = join_periods(
        pivot_period(&in_scope, periods.current),
        pivot_period(&in_scope, periods.baseline),
    );
    if joined.is_empty() {
        return Err(PipelineError::EmptyScope(format!(
            "no region has data in both {} and {}",
            periods.baseline, periods.current
        )));
    }

    info!(
        regions = joined.len(),
        current = periods.current,
        baseline = periods.baseline,
        "scoring regions"
    );

    let resolver = RegionResolver::from_config(references);
    Ok(score_regions(joined, periods, scoring, &resolver))
}
