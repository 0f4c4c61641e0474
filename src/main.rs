use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn, Level};

use supply_score::ranking::RankedEntry;
use supply_score::scoring::IndexKind;
use supply_score::PipelineError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_SOURCE: i32 = 2;
const EXIT_DATA: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_USAGE: i32 = 64;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank regions and print the shortlist (default if no subcommand)
    Rank,
    /// Show the score breakdown of a shortlisted region
    Show {
        /// Rank of the region to show (1-based, as shown in the shortlist)
        rank: usize,
    },
    /// Write a config file with the built-in defaults
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "supply-score")]
#[command(about = "Rank regions by normalized socioeconomic indicators", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/supply-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Observation table (overrides data.path from the config)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Index to rank by (overrides selection.index)
    #[arg(short, long, global = true)]
    index: Option<IndexKind>,

    /// Shortlist size (overrides selection.top_n)
    #[arg(short = 'n', long, global = true)]
    top_n: Option<usize>,

    /// Accept a shorter shortlist when too few regions remain after exclusion
    #[arg(long, global = true)]
    allow_short: bool,

    /// Output format of the shortlist
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Look up a shortlist entry by its 1-based rank.
fn shortlist_entry(shortlist: &[RankedEntry], rank: usize) -> Option<&RankedEntry> {
    rank.checked_sub(1).and_then(|i| shortlist.get(i))
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Rank);
    let start_time = Instant::now();

    init_logging(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { force } = command {
        let path = match config_path.map(Ok).unwrap_or_else(supply_score::config::get_config_path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
        if let Err(e) = supply_score::config::write_default_config(&path, force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote default config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match supply_score::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = supply_score::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let scoring = config.scoring.clone().unwrap_or_default();

    let Some(data_path) = cli.data.or_else(|| config.data.path.clone()) else {
        eprintln!("No observation table configured.");
        eprintln!("Pass --data <file> or add it to the config file:");
        eprintln!("  data:");
        eprintln!("    path: data/indicators.csv");
        std::process::exit(EXIT_CONFIG);
    };

    let (observations, stats) =
        match supply_score::observation::load_observations(&data_path, &config.data) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(EXIT_SOURCE);
            }
        };
    if stats.skipped_rows > 0 {
        warn!(
            "skipped {} of {} rows with an unparsable period",
            stats.skipped_rows, stats.total_rows
        );
    }

    let table = match supply_score::score_observations(&observations, &scoring, &config.references)
    {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let index = cli.index.unwrap_or(config.selection.index);
    let top_n = cli.top_n.unwrap_or(config.selection.top_n);
    let exclude = &config.selection.exclude;

    let shortlist = match supply_score::ranking::select(&table.regions, index, exclude, top_n) {
        Ok(entries) => entries,
        Err(PipelineError::InsufficientRanked { available, .. }) if cli.allow_short => {
            warn!("only {} regions available, shortlist is shorter than {}", available, top_n);
            match supply_score::ranking::select(&table.regions, index, exclude, available) {
                Ok(entries) => entries,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(EXIT_DATA);
                }
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Use --allow-short to accept a shorter list.");
            std::process::exit(EXIT_DATA);
        }
    };

    let use_colors = supply_score::output::should_use_colors();

    // Route based on subcommand
    match command {
        Commands::Rank => {
            match cli.format {
                OutputFormat::Table => {
                    println!(
                        "{}",
                        supply_score::output::format_ranked_table(&shortlist, index, use_colors)
                    );
                    if cli.verbose {
                        for entry in &shortlist {
                            if let Some(region) =
                                table.regions.iter().find(|r| r.region == entry.region)
                            {
                                println!();
                                println!(
                                    "{}",
                                    supply_score::output::format_region_detail(
                                        region,
                                        &config.units,
                                        use_colors
                                    )
                                );
                            }
                        }
                    }
                }
                OutputFormat::Tsv => {
                    println!("{}", supply_score::output::format_tsv(&shortlist));
                }
                OutputFormat::Json => {
                    match supply_score::output::format_json(&shortlist, index, &table) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            eprintln!("{:#}", e);
                            std::process::exit(EXIT_DATA);
                        }
                    }
                }
            }

            info!(
                "ranked {} of {} regions ({} to {}, {} saturation) in {:?}",
                shortlist.len(),
                table.regions.len(),
                table.baseline_period,
                table.current_period,
                table.saturation,
                start_time.elapsed()
            );
        }
        Commands::Show { rank } => {
            let Some(entry) = shortlist_entry(&shortlist, rank) else {
                eprintln!(
                    "Invalid rank {}. Must be between 1 and {}.",
                    rank,
                    shortlist.len()
                );
                std::process::exit(EXIT_USAGE);
            };

            if let Some(region) = table.regions.iter().find(|r| r.region == entry.region) {
                println!(
                    "{}",
                    supply_score::output::format_region_detail(region, &config.units, use_colors)
                );
            }
        }
        Commands::Init { .. } => unreachable!("handled before loading data"),
    }

    std::process::exit(EXIT_SUCCESS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn entry(rank: usize, region: &str) -> RankedEntry {
        RankedEntry {
            rank,
            region: region.to_string(),
            index_value: 50.0,
            source_features: BTreeMap::new(),
        }
    }

    #[test]
    fn test_parse_show_rank() {
        let cli = Cli::try_parse_from(["supply-score", "show", "1"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Show { rank: 1 })));
        assert_eq!(cli.index, None);
    }

    #[test]
    fn test_parse_show_with_global_index() {
        let cli =
            Cli::try_parse_from(["supply-score", "--index", "opportunity", "show", "2"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Show { rank: 2 })));
        assert_eq!(cli.index, Some(IndexKind::Opportunity));

        let cli =
            Cli::try_parse_from(["supply-score", "show", "3", "--index", "density-adjusted"])
                .unwrap();
        assert!(matches!(cli.command, Some(Commands::Show { rank: 3 })));
        assert_eq!(cli.index, Some(IndexKind::DensityAdjusted));
    }

    #[test]
    fn test_parse_defaults_to_rank() {
        let cli = Cli::try_parse_from(["supply-score", "-n", "5", "--format", "tsv"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.top_n, Some(5));
        assert!(matches!(cli.format, OutputFormat::Tsv));
    }

    #[test]
    fn test_parse_init_force() {
        let cli = Cli::try_parse_from(["supply-score", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Init { force: true })));
    }

    #[test]
    fn test_shortlist_entry_bounds() {
        let shortlist = vec![entry(1, "Hof, Stadt"), entry(2, "Coburg, Stadt")];
        assert_eq!(shortlist_entry(&shortlist, 1).map(|e| e.region.as_str()), Some("Hof, Stadt"));
        assert_eq!(shortlist_entry(&shortlist, 2).map(|e| e.rank), Some(2));
        assert!(shortlist_entry(&shortlist, 0).is_none());
        assert!(shortlist_entry(&shortlist, 3).is_none());
    }
}
