use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::types::{Observation, RegionFeatureRow};
use crate::error::{PipelineError, PipelineResult};

/// The two periods a scoring run compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodSelection {
    pub current: i32,
    pub baseline: i32,
}

/// Keep in-scope observations whose indicator is on the allow-list.
///
/// Fails with `EmptyScope` when nothing survives, so no index is ever
/// computed over zero regions.
pub fn filter_scope(
    observations: &[Observation],
    allow_list: &BTreeSet<String>,
) -> PipelineResult<Vec<Observation>> {
    let filtered: Vec<Observation> = observations
        .iter()
        .filter(|obs| obs.in_scope && allow_list.contains(&obs.indicator))
        .cloned()
        .collect();

    if filtered.is_empty() {
        return Err(PipelineError::EmptyScope(format!(
            "{} observations read, none in scope for {} configured indicators",
            observations.len(),
            allow_list.len()
        )));
    }

    debug!(
        kept = filtered.len(),
        total = observations.len(),
        "filtered observations to analysis scope"
    );
    Ok(filtered)
}

/// Pick the current and baseline periods.
///
/// Current defaults to the latest period present and baseline to the
/// earliest one, so the trend spans all available history rather than a
/// fixed look-back window. Overrides must name a period that has data.
pub fn select_periods(
    observations: &[Observation],
    current_override: Option<i32>,
    baseline_override: Option<i32>,
) -> PipelineResult<PeriodSelection> {
    let periods: BTreeSet<i32> = observations.iter().map(|obs| obs.period).collect();

    let (Some(&earliest), Some(&latest)) = (periods.first(), periods.last()) else {
        return Err(PipelineError::EmptyScope(
            "no periods present in the filtered table".to_string(),
        ));
    };

    let pick = |requested: Option<i32>, fallback: i32, role: &str| match requested {
        Some(period) if periods.contains(&period) => Ok(period),
        Some(period) => Err(PipelineError::EmptyScope(format!(
            "{} period {} has no observations (available: {:?})",
            role, period, periods
        ))),
        None => Ok(fallback),
    };

    Ok(PeriodSelection {
        current: pick(current_override, latest, "current")?,
        baseline: pick(baseline_override, earliest, "baseline")?,
    })
}

/// Reshape observations into one row per region for `period`.
///
/// Rows come back ordered by region name. Repeated observations of the same
/// indicator are averaged; missing values are ignored, and an indicator whose
/// values are all missing is left out of the row.
pub fn pivot_period(observations: &[Observation], period: i32) -> Vec<RegionFeatureRow> {
    // region -> indicator -> (sum, count)
    let mut cells: BTreeMap<&str, BTreeMap<&str, (f64, u32)>> = BTreeMap::new();

    for obs in observations.iter().filter(|obs| obs.period == period) {
        let row = cells.entry(obs.region.as_str()).or_default();
        if let Some(value) = obs.value {
            let cell = row.entry(obs.indicator.as_str()).or_insert((0.0, 0));
            cell.0 += value;
            cell.1 += 1;
        }
    }

    cells
        .into_iter()
        .map(|(region, row)| RegionFeatureRow {
            region: region.to_string(),
            period,
            features: row
                .into_iter()
                .map(|(indicator, (sum, count))| (indicator.to_string(), sum / count as f64))
                .collect(),
        })
        .collect()
}

/// Pair each region's current row with its baseline row.
///
/// Regions missing from either period are dropped (inner join on name).
/// Output keeps the order of `current`.
pub fn join_periods(
    current: Vec<RegionFeatureRow>,
    baseline: Vec<RegionFeatureRow>,
) -> Vec<(RegionFeatureRow, RegionFeatureRow)> {
    let mut by_region: BTreeMap<String, RegionFeatureRow> = baseline
        .into_iter()
        .map(|row| (row.region.clone(), row))
        .collect();

    let mut joined = Vec::with_capacity(current.len());
    for row in current {
        match by_region.remove(&row.region) {
            Some(past) => joined.push((row, past)),
            None => debug!(region = %row.region, "dropped region without baseline period"),
        }
    }

    for region in by_region.keys() {
        debug!(region = %region, "dropped region without current period");
    }

    joined
}
