//! Game configuration loader.

use std::path::Path;

use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Missing tables and fields fall back to [`GameConfig::default`], so a file
/// only needs to list what it changes.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        let config = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))?;
        tracing::debug!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    /// Parse and validate a config from TOML text.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = ConfigLoader::parse("").expect("empty config parses");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_tables_override_only_named_fields() {
        let config = ConfigLoader::parse(
            r#"
            max_frame_delta = 0.05

            [pursuer]
            hearing_radius = 260.0
            max_speed = 500.0

            [generation]
            barns = { min = 2, max = 4 }
            "#,
        )
        .expect("partial config parses");
        assert_eq!(config.max_frame_delta, 0.05);
        assert_eq!(config.pursuer.hearing_radius, 260.0);
        assert_eq!(config.pursuer.max_speed, 500.0);
        assert_eq!(config.pursuer.base_speed, 180.0);
        assert_eq!(config.generation.barns.max, 4);
        assert_eq!(config.generation.ponds.min, 3);
        assert_eq!(config.items.total, 100);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let error = ConfigLoader::parse("[pursuer]\nmax_speed = 10.0\n")
            .expect_err("ceiling below base must fail");
        assert!(error.to_string().contains("Invalid config"));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("game.toml");
        std::fs::write(&path, "[items]\ntotal = 40\n").expect("write config");
        let config = ConfigLoader::load(&path).expect("load config");
        assert_eq!(config.items.total, 40);

        let missing = ConfigLoader::load(&dir.path().join("missing.toml"));
        assert!(missing.is_err());
    }
}
