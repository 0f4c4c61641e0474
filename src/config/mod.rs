mod init;
mod schema;

pub use init::{default_config_yaml, write_default_config};
pub use schema::{
    ColumnNames, Config, DataConfig, ReferenceConfig, RegionReference, SelectionConfig,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::scoring::validate_scoring;

/// Get the config directory path (~/.config/supply-score/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("supply-score"))
}

/// Get the default config file path (~/.config/supply-score/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/supply-score/config.yaml) and falls back to built-in defaults
///   when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                debug!(
                    "no config at {}, using built-in defaults",
                    default_path.display()
                );
                return Ok(Config::default());
            }
            default_path
        }
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    debug!("loaded config from {}", config_path.display());
    Ok(config)
}

/// Validate the whole configuration.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = match validate_scoring(&config.scoring.clone().unwrap_or_default()) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    let refs = &config.references;
    if refs.default_population == 0 {
        errors.push("references.default_population: must be positive".to_string());
    }
    if refs.default_competitors == 0 {
        errors.push("references.default_competitors: must be positive".to_string());
    }
    for (i, region) in refs.regions.iter().enumerate() {
        if region.name.trim().is_empty() {
            errors.push(format!("references.regions[{}].name: must not be empty", i));
        }
        if region.population == Some(0) {
            errors.push(format!(
                "references.regions[{}].population: must be positive ('{}')",
                i, region.name
            ));
        }
        if region.competitors == Some(0) {
            errors.push(format!(
                "references.regions[{}].competitors: must be positive ('{}')",
                i, region.name
            ));
        }
    }

    if config.selection.top_n == 0 {
        errors.push("selection.top_n: must be at least 1".to_string());
    }

    if !config.data.delimiter.is_ascii() {
        errors.push(format!(
            "data.delimiter: '{}' is not a single-byte character",
            config.data.delimiter
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::IndexKind;
    use std::env;

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
data:
  path: data/inkar_bayern_nordbayern.csv
  columns:
    region: Name
    indicator: Indikator
    period: Zeitbezug
    value: Wert
    in_scope: Nordbayern
scoring:
  saturation:
    strategy: deviation
references:
  default_population: 50000
  regions:
    - name: Nürnberg
      population: 540000
      competitors: 190
    - name: Amberg
      population: 42000
      aliases: ["Amberg (Oberpfalz)"]
selection:
  exclude: ["Schweinfurt, Stadt"]
  top_n: 8
  index: opportunity
units:
  Medianeinkommen: "€"
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.data.columns.region, "Name");
        assert_eq!(config.data.delimiter, ',');
        assert!(config.scoring.is_some());
        assert_eq!(config.references.regions.len(), 2);
        assert_eq!(config.references.regions[1].competitors, None);
        assert_eq!(config.references.default_competitors, 20);
        assert_eq!(config.selection.index, IndexKind::Opportunity);
        assert_eq!(config.units.get("Medianeinkommen").map(String::as_str), Some("€"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.selection.top_n, 8);
    }

    #[test]
    fn test_validate_config_collects_all_errors() {
        let mut config = Config::default();
        config.selection.top_n = 0;
        config.references.default_competitors = 0;
        config.references.regions.push(RegionReference {
            name: "Hof".to_string(),
            population: Some(47_000),
            competitors: Some(0),
            aliases: vec![],
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("selection.top_n")));
        assert!(errors.iter().any(|e| e.contains("regions[0].competitors")));
    }

    #[test]
    fn test_load_config_missing_explicit_path() {
        let path = env::temp_dir().join("supply_score_test_missing_config.yaml");
        let _ = std::fs::remove_file(&path);
        assert!(load_config(Some(path)).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let path = env::temp_dir().join("supply_score_test_config.yaml");
        std::fs::write(&path, "selection:\n  top_n: 3\n").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.selection.top_n, 3);
        assert_eq!(config.selection.index, IndexKind::Structural);

        let _ = std::fs::remove_file(&path);
    }
}
