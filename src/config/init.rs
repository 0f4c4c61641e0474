use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::Path;

use super::schema::Config;
use crate::scoring::ScoringConfig;

const HEADER: &str = "\
# supply-score configuration
#
# data.path points at the observation table (one row per region, indicator
# and period). Rename data.columns.* to match its header.
# references.regions holds population and competitor counts per region;
# regions without an entry use the defaults.
";

/// Render the built-in defaults as a commented YAML document.
pub fn default_config_yaml() -> Result<String> {
    let config = Config {
        scoring: Some(ScoringConfig::default()),
        ..Config::default()
    };
    let body = serde_saphyr::to_string(&config).context("Failed to serialize default config")?;
    Ok(format!("{}\n{}", HEADER, body))
}

/// Write the default config to `path` atomically.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let yaml = default_config_yaml()?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .context("Failed to write default config")?;
    file.commit().context("Failed to save default config")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config_yaml_parses_back() {
        let yaml = default_config_yaml().unwrap();
        assert!(yaml.starts_with("# supply-score configuration"));

        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(parsed.scoring, Some(ScoringConfig::default()));
        assert_eq!(parsed.selection.top_n, 8);
    }

    #[test]
    fn test_write_default_config_refuses_overwrite() {
        let path = env::temp_dir().join("supply_score_test_init.yaml");
        let _ = std::fs::remove_file(&path);

        write_default_config(&path, false).unwrap();
        assert!(path.exists());
        assert!(write_default_config(&path, false).is_err());
        assert!(write_default_config(&path, true).is_ok());

        let _ = std::fs::remove_file(&path);
    }
}
