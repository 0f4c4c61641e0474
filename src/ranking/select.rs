use serde::Serialize;
use std::collections::BTreeMap;

use super::filter::filter_excluded;
use crate::error::{PipelineError, PipelineResult};
use crate::scoring::{IndexKind, ScoredRegion};

/// One row of the shortlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize, // 1-based
    pub region: String,
    pub index_value: f64,
    pub source_features: BTreeMap<String, f64>,
}

/// Rank regions by `index` and keep the best `top_n`.
///
/// Excluded names are removed first. Sorting is stable, so regions with
/// equal index values keep their table order. Returns `InsufficientRanked`
/// instead of a shorter list when too few candidates remain.
pub fn select(
    regions: &[ScoredRegion],
    index: IndexKind,
    exclude: &[String],
    top_n: usize,
) -> PipelineResult<Vec<RankedEntry>> {
    let mut candidates = filter_excluded(regions, exclude);

    if candidates.len() < top_n {
        return Err(PipelineError::InsufficientRanked {
            requested: top_n,
            available: candidates.len(),
        });
    }

    // Descending under a total order, so NaN cannot break the sort
    candidates.sort_by(|a, b| b.indices.get(index).total_cmp(&a.indices.get(index)));

    Ok(candidates
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, region)| RankedEntry {
            rank: i + 1,
            region: region.region.clone(),
            index_value: region.indices.get(index),
            source_features: region.features.clone(),
        })
        .collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::attributes::{MatchKind, RegionAttributes};
    use crate::scoring::{CategoryScores, HunterScores, Indices, Kpis};

    pub(crate) fn scored(name: &str, structural: f64) -> ScoredRegion {
        ScoredRegion {
            region: name.to_string(),
            attributes: RegionAttributes {
                population: 50_000,
                competitor_count: 20,
                population_match: MatchKind::Default,
                competitor_match: MatchKind::Default,
            },
            features: BTreeMap::from([("x".to_string(), structural)]),
            baseline_features: BTreeMap::new(),
            normalized: BTreeMap::new(),
            categories: CategoryScores::default(),
            kpis: Kpis {
                residents_per_competitor: 2500.0,
                competitor_density: 0.0004,
                market_volume_mio: 1250.0,
                risk: 3.0,
                growth_percent: 0.0,
            },
            hunter: HunterScores::default(),
            saturation_penalty: 0.0,
            indices: Indices {
                structural,
                opportunity: 100.0 - structural,
                density_adjusted: structural,
                overall: structural,
            },
        }
    }

    fn regions() -> Vec<ScoredRegion> {
        vec![
            scored("A", 90.0),
            scored("B", 95.0),
            scored("C", 95.0),
            scored("D", 80.0),
        ]
    }

    #[test]
    fn test_select_ties_keep_input_order() {
        let ranked = select(&regions(), IndexKind::Structural, &["D".to_string()], 2).unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].region, "B");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].region, "C");
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[1].index_value, 95.0);
    }

    #[test]
    fn test_select_ranks_are_contiguous() {
        let ranked = select(&regions(), IndexKind::Structural, &[], 4).unwrap();
        let ranks: Vec<usize> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
        let names: Vec<&str> = ranked.iter().map(|e| e.region.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_select_uses_requested_index() {
        let ranked = select(&regions(), IndexKind::Opportunity, &[], 1).unwrap();
        assert_eq!(ranked[0].region, "D"); // 100 - 80
        assert_eq!(ranked[0].index_value, 20.0);
    }

    #[test]
    fn test_select_insufficient_candidates() {
        let result = select(&regions(), IndexKind::Structural, &["D".to_string()], 4);
        match result {
            Err(PipelineError::InsufficientRanked {
                requested,
                available,
            }) => {
                assert_eq!(requested, 4);
                assert_eq!(available, 3);
            }
            other => panic!("expected InsufficientRanked, got {:?}", other),
        }
    }

    #[test]
    fn test_select_tolerates_nan_index() {
        let regions = vec![
            scored("A", 40.0),
            scored("B", f64::NAN),
            scored("C", 70.0),
            scored("D", 70.0),
        ];
        let ranked = select(&regions, IndexKind::Structural, &[], 4).unwrap();
        let names: Vec<&str> = ranked.iter().map(|e| e.region.as_str()).collect();

        // Positive NaN sorts above every number; ties still keep table order
        assert_eq!(names, vec!["B", "C", "D", "A"]);
        let ranks: Vec<usize> = ranked.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_select_carries_source_features() {
        let ranked = select(&regions(), IndexKind::Structural, &[], 1).unwrap();
        assert_eq!(ranked[0].source_features.get("x"), Some(&95.0));
    }
}
