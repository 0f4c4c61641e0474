pub mod resolver;

pub use resolver::{strip_suffixes, MatchKind, ReferenceTable, Resolved};

use serde::Serialize;

use crate::config::ReferenceConfig;

/// Externally supplied attributes of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionAttributes {
    pub population: u64,
    pub competitor_count: u64,
    pub population_match: MatchKind,
    pub competitor_match: MatchKind,
}

/// Resolves population and competitor counts for region names.
///
/// Built once from the reference section of the config. The two attributes
/// are looked up independently because reference data rarely covers both
/// for the same set of regions.
#[derive(Debug, Clone)]
pub struct RegionResolver {
    population: ReferenceTable<u64>,
    competitors: ReferenceTable<u64>,
    default_population: u64,
    default_competitors: u64,
}

impl RegionResolver {
    pub fn from_config(config: &ReferenceConfig) -> Self {
        let mut population = ReferenceTable::new(config.strip_suffixes.clone());
        let mut competitors = ReferenceTable::new(config.strip_suffixes.clone());

        for region in &config.regions {
            if let Some(value) = region.population {
                population.insert(&region.name, &region.aliases, value);
            }
            if let Some(value) = region.competitors {
                competitors.insert(&region.name, &region.aliases, value);
            }
        }

        Self {
            population,
            competitors,
            default_population: config.default_population,
            default_competitors: config.default_competitors,
        }
    }

    pub fn resolve(&self, region_name: &str) -> RegionAttributes {
        let population = self.population.resolve(region_name, self.default_population);
        let competitors = self.competitors.resolve(region_name, self.default_competitors);

        RegionAttributes {
            population: population.value,
            competitor_count: competitors.value,
            population_match: population.kind,
            competitor_match: competitors.kind,
        }
    }
}
