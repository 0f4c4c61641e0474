use std::collections::BTreeMap;

/// A single raw indicator value for one region in one period.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub region: String,
    pub indicator: String,
    pub period: i32,      // Year
    pub value: Option<f64>, // None when the source cell was empty or non-numeric
    pub in_scope: bool,
}

impl Observation {
    pub fn new(region: &str, indicator: &str, period: i32, value: Option<f64>) -> Self {
        Self {
            region: region.to_string(),
            indicator: indicator.to_string(),
            period,
            value,
            in_scope: true,
        }
    }
}

/// One region's indicator values for a single period.
///
/// Indicators without an observation are absent, never zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionFeatureRow {
    pub region: String,
    pub period: i32,
    pub features: BTreeMap<String, f64>,
}

impl RegionFeatureRow {
    pub fn get(&self, indicator: &str) -> Option<f64> {
        self.features.get(indicator).copied()
    }
}

/// Summary of a table load, reported in verbose mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub total_rows: usize,
    pub skipped_rows: usize,  // Unparsable period
    pub missing_values: usize, // Value coerced to missing
}
