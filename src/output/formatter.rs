use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::attributes::MatchKind;
use crate::ranking::RankedEntry;
use crate::scoring::{IndexKind, ScoredRegion, ScoredTable};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format an index value with one decimal ("71.3", "-4.0")
pub fn format_score(score: f64) -> String {
    if score.is_finite() {
        format!("{:.1}", score)
    } else {
        "n/a".to_string()
    }
}

/// Format a category score, showing "n/a" when the category had no data
pub fn format_category(score: Option<f64>) -> String {
    score.map(format_score).unwrap_or_else(|| "n/a".to_string())
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a region name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the shortlist as a table with columns: Rank, Index, Region
/// The header names the index the ranking is based on.
/// Rank column: 3 chars (fits "99."), right-aligned
/// Index column is right-aligned, 7 chars wide (fits "-100.0")
pub fn format_ranked_table(entries: &[RankedEntry], index: IndexKind, use_colors: bool) -> String {
    if entries.is_empty() {
        return "No regions ranked.".to_string();
    }

    let term_width = get_terminal_width();
    let rank_width = 3;
    let score_width = 7;
    let separator = "  ";
    let fixed_width = rank_width + 1 + score_width + separator.len();

    let header = format!("{} index", index.label());
    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };

    let rows = entries.iter().map(|entry| {
        let rank_str = format!("{:>2}.", entry.rank);
        let score_padded = format!(
            "{:>width$}",
            format_score(entry.index_value),
            width = score_width
        );

        let name = match term_width {
            Some(width) if width > fixed_width + 10 => {
                truncate_name(&entry.region, width - fixed_width)
            }
            Some(_) => truncate_name(&entry.region, 20),
            None => entry.region.clone(),
        };

        if use_colors {
            format!(
                "{} {}{}{}",
                rank_str.dimmed(),
                score_padded.bold(),
                separator,
                name
            )
        } else {
            format!("{} {}{}{}", rank_str, score_padded, separator, name)
        }
    });

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the shortlist as tab-separated values for scripting
/// Columns: rank, index value, region (no headers, no colors)
pub fn format_tsv(entries: &[RankedEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}\t{}\t{}",
                entry.rank,
                format_score(entry.index_value),
                entry.region
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct Report<'a> {
    index: IndexKind,
    shortlist: &'a [RankedEntry],
    table: &'a ScoredTable,
}

/// Serialize the shortlist together with the full scored table
pub fn format_json(entries: &[RankedEntry], index: IndexKind, table: &ScoredTable) -> Result<String> {
    serde_json::to_string_pretty(&Report {
        index,
        shortlist: entries,
        table,
    })
    .context("Failed to serialize report")
}

fn match_note(kind: MatchKind) -> &'static str {
    match kind {
        MatchKind::Exact => "",
        MatchKind::Alias => " (alias)",
        MatchKind::Substring => " (approximate match)",
        MatchKind::Default => " (default)",
    }
}

fn with_unit(value: f64, indicator: &str, units: &BTreeMap<String, String>) -> String {
    match units.get(indicator) {
        Some(unit) => format!("{:.2} {}", value, unit),
        None => format!("{:.2}", value),
    }
}

/// Format a region with its full score breakdown (for `show` and verbose mode)
pub fn format_region_detail(
    region: &ScoredRegion,
    units: &BTreeMap<String, String>,
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();

    let title = if use_colors {
        region.region.bold().to_string()
    } else {
        region.region.clone()
    };
    lines.push(title);

    let attrs = &region.attributes;
    lines.push(format!(
        "  Population: {}{}",
        attrs.population,
        match_note(attrs.population_match)
    ));
    lines.push(format!(
        "  Competitors: {}{}",
        attrs.competitor_count,
        match_note(attrs.competitor_match)
    ));

    let idx = &region.indices;
    lines.push(format!(
        "  Indices: structural {} | opportunity {} | density-adjusted {} | overall {}",
        format_score(idx.structural),
        format_score(idx.opportunity),
        format_score(idx.density_adjusted),
        format_score(idx.overall)
    ));

    let cats = &region.categories;
    lines.push(format!(
        "  Categories: wealth {} | economy {} | mobility {} | stability {}",
        format_category(cats.wealth),
        format_category(cats.economic_activity),
        format_category(cats.mobility),
        format_category(cats.stability)
    ));

    let hunter = &region.hunter;
    lines.push(format!(
        "  Opportunity: service gap {} | growth {} | risk {} | market size {}",
        format_score(hunter.service_gap),
        format_score(hunter.growth),
        format_score(hunter.risk),
        format_score(hunter.market_size)
    ));

    let kpis = &region.kpis;
    lines.push(format!(
        "  Market: {:.0} residents per competitor | volume {:.1} Mio | growth {:+.1}% | saturation penalty {}",
        kpis.residents_per_competitor,
        kpis.market_volume_mio,
        kpis.growth_percent,
        format_score(region.saturation_penalty)
    ));

    if !region.features.is_empty() {
        lines.push("  Indicators:".to_string());
        for (indicator, value) in &region.features {
            let score = region
                .normalized
                .get(indicator)
                .map(|s| format_score(*s))
                .unwrap_or_else(|| "n/a".to_string());
            let line = format!(
                "    {}: {} (score {})",
                indicator,
                with_unit(*value, indicator, units),
                score
            );
            lines.push(if use_colors {
                line.dimmed().to_string()
            } else {
                line
            });
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::select::tests::scored;

    fn entry(rank: usize, region: &str, value: f64) -> RankedEntry {
        RankedEntry {
            rank,
            region: region.to_string(),
            index_value: value,
            source_features: BTreeMap::new(),
        }
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(71.34), "71.3");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(-4.0), "-4.0");
        assert_eq!(format_score(f64::NAN), "n/a");
    }

    #[test]
    fn test_format_category_distinguishes_missing() {
        assert_eq!(format_category(Some(0.0)), "0.0");
        assert_eq!(format_category(None), "n/a");
    }

    #[test]
    fn test_format_ranked_table_empty() {
        assert_eq!(
            format_ranked_table(&[], IndexKind::Structural, false),
            "No regions ranked."
        );
    }

    #[test]
    fn test_format_ranked_table_rows() {
        let entries = vec![entry(1, "Erlangen, Stadt", 71.34), entry(2, "Bamberg, Stadt", 64.0)];
        let result = format_ranked_table(&entries, IndexKind::Opportunity, false);
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Opportunity index");
        assert!(lines[1].starts_with(" 1."));
        assert!(lines[1].contains("71.3"));
        assert!(lines[1].contains("Erlangen"));
        assert!(lines[2].starts_with(" 2."));
    }

    #[test]
    fn test_format_tsv() {
        let entries = vec![entry(1, "Hof, Stadt", 12.5)];
        assert_eq!(format_tsv(&entries), "1\t12.5\tHof, Stadt");
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Nürnberger Land", 40), "Nürnberger Land");
        assert_eq!(truncate_name("Nürnberger Land", 8), "Nürnb...");
        assert_eq!(truncate_name("Nürnberger Land", 2), "Nü");
    }

    #[test]
    fn test_format_region_detail() {
        let region = scored("Coburg, Stadt", 55.0);
        let units = BTreeMap::from([("x".to_string(), "%".to_string())]);
        let result = format_region_detail(&region, &units, false);

        assert!(result.starts_with("Coburg, Stadt"));
        assert!(result.contains("Population: 50000 (default)"));
        assert!(result.contains("structural 55.0"));
        assert!(result.contains("wealth n/a"));
        assert!(result.contains("x: 55.00 % (score n/a)"));
    }

    #[test]
    fn test_format_json_contains_shortlist_and_table() {
        let table = ScoredTable {
            current_period: 2022,
            baseline_period: 2015,
            saturation: "ratio",
            regions: vec![scored("Hof, Stadt", 40.0)],
        };
        let entries = vec![entry(1, "Hof, Stadt", 40.0)];
        let json = format_json(&entries, IndexKind::Structural, &table).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["index"], "structural");
        assert_eq!(value["shortlist"][0]["rank"], 1);
        assert_eq!(value["table"]["regions"][0]["region"], "Hof, Stadt");
        assert_eq!(value["table"]["regions"][0]["attributes"]["population_match"], "default");
    }
}
