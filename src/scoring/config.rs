use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::saturation::SaturationStrategy;

/// Per-capita purchasing power substituted when the purchasing-power
/// indicator is not in the table (EUR per resident and year).
pub const DEFAULT_PURCHASING_POWER_PER_CAPITA: f64 = 25_000.0;

/// Risk value used when the risk indicator is not in the table.
pub const DEFAULT_RISK: f64 = 3.0;

pub const DEFAULT_PENALTY_FACTOR: f64 = 0.25;

/// Residents per competitor treated as "normal" supply by the deviation strategy.
pub const DEFAULT_SATURATION_REFERENCE: f64 = 3792.0;

pub const DEFAULT_SATURATION_SCALING: f64 = 0.004;

/// Main scoring configuration.
///
/// Defines which indicators feed each category, which are inverted, and the
/// constants of the composite indices. Every field has a default, so a
/// partial section only overrides what it names.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   categories:
///     wealth: ["Medianeinkommen"]
///     mobility: ["Pkw-Dichte"]
///   invert: ["Arbeitslosenquote"]
///   hunter_weights: { service_gap: 2.0, growth: 1.5, risk: 1.0, market_size: 0.5 }
///   saturation:
///     strategy: deviation
///     reference: 3792
///     scaling: 0.004
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Indicator lists of the four structural categories
    pub categories: CategoryConfig,

    /// Indicators where a low raw value is better (scores are flipped)
    pub invert: Vec<String>,

    /// Indicator whose change between baseline and current period is the trend
    pub trend_indicator: String,

    /// Indicator used as market risk (inverted in the opportunity index)
    pub risk_indicator: String,

    /// Per-capita purchasing power used for the market-volume estimate
    pub purchasing_power_indicator: String,

    pub hunter_weights: HunterWeights,

    pub saturation: SaturationConfig,

    pub trend: TrendConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            categories: CategoryConfig::default(),
            invert: vec![
                "Arbeitslosenquote".to_string(),
                "Haushalte mit niedrigem Einkommen".to_string(),
            ],
            trend_indicator: "Medianeinkommen".to_string(),
            risk_indicator: "Arbeitslosenquote".to_string(),
            purchasing_power_indicator: "Einzelhandelsrelevante Kaufkraft".to_string(),
            hunter_weights: HunterWeights::default(),
            saturation: SaturationConfig::default(),
            trend: TrendConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Every indicator the scoring run reads; observations outside this set are dropped.
    pub fn indicators(&self) -> BTreeSet<String> {
        self.categories
            .all()
            .flat_map(|(_, indicators)| indicators.iter().cloned())
            .chain([
                self.trend_indicator.clone(),
                self.risk_indicator.clone(),
                self.purchasing_power_indicator.clone(),
            ])
            .collect()
    }

    pub fn is_inverted(&self, indicator: &str) -> bool {
        self.invert.iter().any(|i| i == indicator)
    }
}

/// Indicator lists for the four categories of the structural index.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryConfig {
    pub wealth: Vec<String>,
    pub economic_activity: Vec<String>,
    pub mobility: Vec<String>,
    pub stability: Vec<String>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        let list = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            wealth: list(&[
                "Einzelhandelsrelevante Kaufkraft",
                "Haushalte mit hohem Einkommen",
                "Medianeinkommen",
            ]),
            economic_activity: list(&[
                "Einwohnerdichte",
                "Beschäftigtendichte (AO)",
                "Bruttoinlandsprodukt je Einwohner in Kaufkraftstandards (KKS)",
            ]),
            mobility: list(&["Pkw-Dichte"]),
            stability: list(&["Arbeitslosenquote", "Haushalte mit niedrigem Einkommen"]),
        }
    }
}

impl CategoryConfig {
    /// Categories with their config key, in structural-index order.
    pub fn all(&self) -> impl Iterator<Item = (&'static str, &Vec<String>)> {
        [
            ("wealth", &self.wealth),
            ("economic_activity", &self.economic_activity),
            ("mobility", &self.mobility),
            ("stability", &self.stability),
        ]
        .into_iter()
    }
}

/// Relative weights of the opportunity ("hunter") index sub-scores.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HunterWeights {
    pub service_gap: f64,
    pub growth: f64,
    pub risk: f64,
    pub market_size: f64,
}

impl Default for HunterWeights {
    fn default() -> Self {
        Self {
            service_gap: 2.0,
            growth: 1.5,
            risk: 1.0,
            market_size: 0.5,
        }
    }
}

impl HunterWeights {
    pub fn total(&self) -> f64 {
        self.service_gap + self.growth + self.risk + self.market_size
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SaturationKind {
    /// Subtract the normalized competitor density times `penalty_factor`
    #[default]
    Ratio,
    /// Subtract the deviation of residents per competitor from `reference` times `scaling`
    Deviation,
}

/// Saturation penalty of the density-adjusted index.
///
/// Only the constants of the selected strategy are used.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SaturationConfig {
    pub strategy: SaturationKind,
    pub penalty_factor: f64,
    pub reference: f64,
    pub scaling: f64,
}

impl Default for SaturationConfig {
    fn default() -> Self {
        Self {
            strategy: SaturationKind::Ratio,
            penalty_factor: DEFAULT_PENALTY_FACTOR,
            reference: DEFAULT_SATURATION_REFERENCE,
            scaling: DEFAULT_SATURATION_SCALING,
        }
    }
}

impl SaturationConfig {
    pub fn strategy(&self) -> SaturationStrategy {
        match self.strategy {
            SaturationKind::Ratio => SaturationStrategy::Ratio {
                penalty_factor: self.penalty_factor,
            },
            SaturationKind::Deviation => SaturationStrategy::Deviation {
                reference: self.reference,
                scaling: self.scaling,
            },
        }
    }
}

/// Optional overrides of the compared periods.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct TrendConfig {
    /// Defaults to the latest period in the table
    pub current_period: Option<i32>,
    /// Defaults to the earliest period in the table
    pub baseline_period: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.hunter_weights.total(), 5.0);
        assert_eq!(config.saturation.strategy, SaturationKind::Ratio);
        assert_eq!(config.saturation.penalty_factor, 0.25);
        assert!(config.is_inverted("Arbeitslosenquote"));
        assert!(!config.is_inverted("Medianeinkommen"));
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
invert: ["Arbeitslosenquote"]
hunter_weights:
  service_gap: 4.0
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.invert, vec!["Arbeitslosenquote".to_string()]);
        assert_eq!(config.hunter_weights.service_gap, 4.0);
        // Unnamed fields keep their defaults
        assert_eq!(config.hunter_weights.growth, 1.5);
        assert_eq!(config.categories, CategoryConfig::default());
    }

    #[test]
    fn test_deviation_strategy_parse() {
        let yaml = r#"
saturation:
  strategy: deviation
  reference: 4000
  scaling: 0.01
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(
            config.saturation.strategy(),
            SaturationStrategy::Deviation {
                reference: 4000.0,
                scaling: 0.01
            }
        );
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str("weights: 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_indicators_allow_list() {
        let config = ScoringConfig::default();
        let indicators = config.indicators();
        assert!(indicators.contains("Pkw-Dichte"));
        assert!(indicators.contains("Medianeinkommen"));
        assert_eq!(indicators.len(), 9);
    }
}
