use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::scoring::{IndexKind, ScoringConfig};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub references: ReferenceConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    /// Display unit per indicator, e.g. "Medianeinkommen: €"
    #[serde(default)]
    pub units: BTreeMap<String, String>,
}

/// Where the observation table lives and how its columns are named.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub path: Option<PathBuf>,
    pub delimiter: char,
    pub columns: ColumnNames,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: ',',
            columns: ColumnNames::default(),
        }
    }
}

/// Header names of the required columns.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    pub region: String,
    pub indicator: String,
    pub period: String,
    pub value: String,
    pub in_scope: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            region: "region".to_string(),
            indicator: "indicator".to_string(),
            period: "period".to_string(),
            value: "value".to_string(),
            in_scope: "in_scope".to_string(),
        }
    }
}

/// Manually maintained population and competitor counts.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceConfig {
    /// Looked up in declaration order
    pub regions: Vec<RegionReference>,
    pub default_population: u64,
    pub default_competitors: u64,
    /// Qualifiers removed from region names before matching
    pub strip_suffixes: Vec<String>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            default_population: 50_000,
            default_competitors: 20,
            strip_suffixes: vec![
                ", Stadt".to_string(),
                ", Landkreis".to_string(),
                ", City".to_string(),
                ", District".to_string(),
                ", County".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegionReference {
    pub name: String,
    #[serde(default)]
    pub population: Option<u64>,
    /// Number of competing branches in the region
    #[serde(default)]
    pub competitors: Option<u64>,
    /// Other spellings of the region name in the indicator table
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Region names (as in the table) removed before ranking
    pub exclude: Vec<String>,
    pub top_n: usize,
    pub index: IndexKind,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            top_n: 8,
            index: IndexKind::Structural,
        }
    }
}
