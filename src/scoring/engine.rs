use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::category::{category_score, overall_score, NormalizedRow};
use super::config::{ScoringConfig, DEFAULT_PURCHASING_POWER_PER_CAPITA, DEFAULT_RISK};
use super::normalize::{normalize, normalize_dense};
use super::saturation::{ratio, SaturationInput};
use super::trend::growth;
use crate::attributes::{RegionAttributes, RegionResolver};
use crate::observation::{PeriodSelection, RegionFeatureRow};

/// Composite indices a ranking can be based on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Mean of the four category scores
    #[default]
    Structural,
    /// Weighted service gap, growth, risk and market size ("hunter" index)
    Opportunity,
    /// Structural index minus the saturation penalty
    DensityAdjusted,
    /// Mean of all normalized indicators
    Overall,
}

impl IndexKind {
    pub fn label(&self) -> &'static str {
        match self {
            IndexKind::Structural => "Structural",
            IndexKind::Opportunity => "Opportunity",
            IndexKind::DensityAdjusted => "Density-adjusted",
            IndexKind::Overall => "Overall",
        }
    }
}

/// Category scores of one region; `None` when no indicator of the category has data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CategoryScores {
    pub wealth: Option<f64>,
    pub economic_activity: Option<f64>,
    pub mobility: Option<f64>,
    pub stability: Option<f64>,
}

impl CategoryScores {
    /// Unweighted mean of all four categories, empty ones counting as 0.
    pub fn structural(&self) -> f64 {
        [
            self.wealth,
            self.economic_activity,
            self.mobility,
            self.stability,
        ]
        .iter()
        .map(|score| score.unwrap_or(0.0))
        .sum::<f64>()
            / 4.0
    }
}

/// Raw market figures derived from indicators and reference data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpis {
    pub residents_per_competitor: f64,
    pub competitor_density: f64, // Competitors per resident
    pub market_volume_mio: f64,
    pub risk: f64,
    pub growth_percent: f64,
}

/// Normalized sub-scores of the opportunity index.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HunterScores {
    pub service_gap: f64,
    pub growth: f64,
    pub risk: f64,
    pub market_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Indices {
    pub structural: f64,
    pub opportunity: f64,
    pub density_adjusted: f64,
    pub overall: f64,
}

impl Indices {
    pub fn get(&self, kind: IndexKind) -> f64 {
        match kind {
            IndexKind::Structural => self.structural,
            IndexKind::Opportunity => self.opportunity,
            IndexKind::DensityAdjusted => self.density_adjusted,
            IndexKind::Overall => self.overall,
        }
    }
}

/// Everything computed for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRegion {
    pub region: String,
    pub attributes: RegionAttributes,
    pub features: BTreeMap<String, f64>,
    pub baseline_features: BTreeMap<String, f64>,
    pub normalized: NormalizedRow,
    pub categories: CategoryScores,
    pub kpis: Kpis,
    pub hunter: HunterScores,
    pub saturation_penalty: f64,
    pub indices: Indices,
}

/// The full scored table of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTable {
    pub current_period: i32,
    pub baseline_period: i32,
    pub saturation: &'static str,
    pub regions: Vec<ScoredRegion>,
}

/// Score every region of the joined current/baseline rows.
///
/// Rows keep their input order. Degenerate columns, absent indicators and
/// unresolved reference data fall back to defaults, so the table always has
/// every index for every region.
pub fn score_regions(
    joined: Vec<(RegionFeatureRow, RegionFeatureRow)>,
    periods: PeriodSelection,
    config: &ScoringConfig,
    resolver: &RegionResolver,
) -> ScoredTable {
    let strategy = config.saturation.strategy();
    let (current, baseline): (Vec<RegionFeatureRow>, Vec<RegionFeatureRow>) =
        joined.into_iter().unzip();

    let normalized = normalize_columns(&current, config);
    log_absent_indicators(&current, config);

    let categories: Vec<CategoryScores> = normalized
        .iter()
        .map(|row| CategoryScores {
            wealth: category_score(&config.categories.wealth, row),
            economic_activity: category_score(&config.categories.economic_activity, row),
            mobility: category_score(&config.categories.mobility, row),
            stability: category_score(&config.categories.stability, row),
        })
        .collect();

    let attributes: Vec<RegionAttributes> = current
        .iter()
        .map(|row| resolver.resolve(&row.region))
        .collect();

    let kpis: Vec<Kpis> = current
        .iter()
        .zip(&baseline)
        .zip(&attributes)
        .map(|((now, past), attrs)| market_kpis(now, past, attrs, config))
        .collect();

    let hunter = hunter_scores(&kpis);
    let weights = config.hunter_weights;
    let weight_total = weights.total();

    let saturation = strategy.apply(
        &categories
            .iter()
            .zip(&attributes)
            .map(|(cats, attrs)| SaturationInput {
                structural: cats.structural(),
                population: attrs.population as f64,
                competitors: attrs.competitor_count as f64,
            })
            .collect::<Vec<_>>(),
    );

    let regions = current
        .into_iter()
        .zip(baseline)
        .zip(normalized)
        .enumerate()
        .map(|(i, ((now, past), normalized))| {
            let sub = hunter[i];
            let opportunity = ratio(
                sub.service_gap * weights.service_gap
                    + sub.growth * weights.growth
                    + sub.risk * weights.risk
                    + sub.market_size * weights.market_size,
                weight_total,
            );

            ScoredRegion {
                region: now.region,
                attributes: attributes[i],
                features: now.features,
                baseline_features: past.features,
                categories: categories[i],
                kpis: kpis[i],
                hunter: sub,
                saturation_penalty: saturation[i].penalty,
                indices: Indices {
                    structural: categories[i].structural(),
                    opportunity,
                    density_adjusted: saturation[i].adjusted,
                    overall: overall_score(&normalized).unwrap_or(0.0),
                },
                normalized,
            }
        })
        .collect();

    ScoredTable {
        current_period: periods.current,
        baseline_period: periods.baseline,
        saturation: strategy.name(),
        regions,
    }
}

/// Normalize every indicator column of the current period.
fn normalize_columns(rows: &[RegionFeatureRow], config: &ScoringConfig) -> Vec<NormalizedRow> {
    let columns: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.features.keys().map(String::as_str))
        .collect();

    let mut normalized = vec![NormalizedRow::new(); rows.len()];
    for indicator in columns {
        let raw: Vec<Option<f64>> = rows.iter().map(|row| row.get(indicator)).collect();
        if is_degenerate(&raw) {
            debug!(indicator, "indicator has no variance, scoring 0 for all regions");
        }

        let scores = normalize(&raw, config.is_inverted(indicator));
        for (row, score) in normalized.iter_mut().zip(scores) {
            if let Some(score) = score {
                row.insert(indicator.to_string(), score);
            }
        }
    }
    normalized
}

fn is_degenerate(values: &[Option<f64>]) -> bool {
    let mut present = values.iter().flatten();
    match present.next() {
        Some(first) => present.all(|v| v == first),
        None => false,
    }
}

fn log_absent_indicators(rows: &[RegionFeatureRow], config: &ScoringConfig) {
    for indicator in config.indicators() {
        if !rows.iter().any(|row| row.features.contains_key(&indicator)) {
            debug!(indicator = %indicator, "indicator absent from current period, skipped");
        }
    }
}

fn market_kpis(
    now: &RegionFeatureRow,
    past: &RegionFeatureRow,
    attrs: &RegionAttributes,
    config: &ScoringConfig,
) -> Kpis {
    let population = attrs.population as f64;
    let competitors = attrs.competitor_count as f64;

    let purchasing_power = now
        .get(&config.purchasing_power_indicator)
        .unwrap_or(DEFAULT_PURCHASING_POWER_PER_CAPITA);

    Kpis {
        residents_per_competitor: ratio(population, competitors),
        competitor_density: ratio(competitors, population),
        market_volume_mio: purchasing_power * population / 1_000_000.0,
        risk: now.get(&config.risk_indicator).unwrap_or(DEFAULT_RISK),
        growth_percent: growth(
            now.get(&config.trend_indicator),
            past.get(&config.trend_indicator),
        ),
    }
}

fn hunter_scores(kpis: &[Kpis]) -> Vec<HunterScores> {
    let column = |f: fn(&Kpis) -> f64| kpis.iter().map(f).collect::<Vec<f64>>();

    let service_gap = normalize_dense(&column(|k| k.residents_per_competitor), false);
    let growth = normalize_dense(&column(|k| k.growth_percent), false);
    let risk = normalize_dense(&column(|k| k.risk), true);
    let market_size = normalize_dense(&column(|k| k.market_volume_mio), false);

    (0..kpis.len())
        .map(|i| HunterScores {
            service_gap: service_gap[i],
            growth: growth[i],
            risk: risk[i],
            market_size: market_size[i],
        })
        .collect()
}
