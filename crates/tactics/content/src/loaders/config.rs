//! Combat tunables loader.

use std::path::Path;

use tactics_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat tunables from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load combat tunables from a TOML file.
    ///
    /// Missing keys keep their [`CombatConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse combat tunables from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse combat config TOML: {}", e))?;

        if config.experience_per_level <= 0.0 {
            anyhow::bail!(
                "experience_per_level must be positive, got {}",
                config.experience_per_level
            );
        }
        if config.max_fatigue <= 0.0 {
            anyhow::bail!("max_fatigue must be positive, got {}", config.max_fatigue);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("flank_bonus_per_ally = 0.25\n").unwrap();
        assert_eq!(config.flank_bonus_per_ally, 0.25);
        assert_eq!(
            config.hill_defense_bonus,
            CombatConfig::DEFAULT_HILL_DEFENSE_BONUS
        );
    }

    #[test]
    fn rejects_non_positive_level_cost() {
        let err = ConfigLoader::parse("experience_per_level = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("experience_per_level"));
    }
}
