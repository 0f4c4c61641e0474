use crate::scoring::ScoredRegion;

/// Filter out excluded regions, returning only ranking candidates.
///
/// Names must match exactly as they appear in the observation table.
pub fn filter_excluded<'a>(regions: &'a [ScoredRegion], exclude: &[String]) -> Vec<&'a ScoredRegion> {
    regions
        .iter()
        .filter(|r| !exclude.iter().any(|name| *name == r.region))
        .collect()
}
