use std::path::Path;

use tracing::{debug, info};

use super::types::{LoadStats, Observation};
use crate::config::DataConfig;
use crate::error::{PipelineError, PipelineResult};

/// Column positions resolved from the header row.
struct ColumnIndex {
    region: usize,
    indicator: usize,
    period: usize,
    value: usize,
    in_scope: usize,
}

/// Read an observation table from a delimited text file.
///
/// Values that do not parse as numbers become missing, matching how the
/// indicator exports mark suppressed cells. Rows whose period cannot be
/// parsed are skipped and counted in the returned stats.
pub fn load_observations(
    path: &Path,
    data: &DataConfig,
) -> PipelineResult<(Vec<Observation>, LoadStats)> {
    let missing = |reason: String| PipelineError::MissingSource {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(data.delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| missing(e.to_string()))?;

    let headers = reader.headers().map_err(|e| missing(e.to_string()))?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| missing(format!("column '{}' not found in header", name)))
    };
    let columns = ColumnIndex {
        region: find(&data.columns.region)?,
        indicator: find(&data.columns.indicator)?,
        period: find(&data.columns.period)?,
        value: find(&data.columns.value)?,
        in_scope: find(&data.columns.in_scope)?,
    };

    let mut observations = Vec::new();
    let mut stats = LoadStats::default();

    for record in reader.records() {
        let record = record.map_err(|e| missing(e.to_string()))?;
        stats.total_rows += 1;

        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let Some(period) = parse_period(field(columns.period)) else {
            stats.skipped_rows += 1;
            debug!(row = stats.total_rows, "skipping row with unparsable period");
            continue;
        };

        let value = parse_value(field(columns.value));
        if value.is_none() {
            stats.missing_values += 1;
        }

        observations.push(Observation {
            region: field(columns.region).to_string(),
            indicator: field(columns.indicator).to_string(),
            period,
            value,
            in_scope: parse_flag(field(columns.in_scope)),
        });
    }

    info!(
        rows = stats.total_rows,
        skipped = stats.skipped_rows,
        missing_values = stats.missing_values,
        "loaded observation table from {}",
        path.display()
    );
    Ok((observations, stats))
}

/// Periods are years; exports sometimes write them as "2022.0".
fn parse_period(s: &str) -> Option<i32> {
    s.parse::<i32>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().filter(|p| p.fract() == 0.0).map(|p| p as i32))
}

fn parse_value(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "wahr"
    )
}
