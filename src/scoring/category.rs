use std::collections::BTreeMap;

/// Normalized indicator scores per region, keyed by indicator name.
pub type NormalizedRow = BTreeMap<String, f64>;

/// Mean of a category's normalized indicators for one region.
///
/// Only indicators present in `row` count, so a category keeps working when
/// the indicator catalog drops a column. `None` means the region has no data
/// for any of the category's indicators.
pub fn category_score(indicators: &[String], row: &NormalizedRow) -> Option<f64> {
    let present: Vec<f64> = indicators
        .iter()
        .filter_map(|indicator| row.get(indicator).copied())
        .collect();

    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

/// Category score for every region, in the order of `rows`.
pub fn aggregate(indicators: &[String], rows: &[NormalizedRow]) -> Vec<Option<f64>> {
    rows.iter().map(|row| category_score(indicators, row)).collect()
}

/// Mean of every normalized indicator a region has, regardless of category.
pub fn overall_score(row: &NormalizedRow) -> Option<f64> {
    if row.is_empty() {
        None
    } else {
        Some(row.values().sum::<f64>() / row.len() as f64)
    }
}
