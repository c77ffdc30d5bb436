//! Combat tables loader.

use std::path::Path;

use battle_core::{Cadence, CombatTables};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Balance parameters read from `tables.toml`.
///
/// Both sections are optional; missing keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceTables {
    pub combat: CombatTables,
    pub cadence: Cadence,
}

/// Loader for combat tables from TOML files.
pub struct TablesLoader;

impl TablesLoader {
    pub fn load(path: &Path) -> LoadResult<BalanceTables> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BalanceTables> {
        let tables: BalanceTables = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tables TOML: {}", e))?;

        if tables.combat.variance_min > tables.combat.variance_max {
            anyhow::bail!(
                "variance_min ({}) exceeds variance_max ({})",
                tables.combat.variance_min,
                tables.combat.variance_max
            );
        }
        if tables.combat.defense_divisor == 0 {
            anyhow::bail!("defense_divisor must be positive");
        }
        for (name, chance) in [
            ("miss_chance", tables.combat.miss_chance),
            ("special_chance", tables.combat.special_chance),
        ] {
            if chance > 100 {
                anyhow::bail!("{name} must be a percentage, got {chance}");
            }
        }
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_tables_keep_defaults() {
        let tables = TablesLoader::parse(
            r#"
            [combat]
            special_chance = 25
            crit_multiplier = 130

            [cadence]
            base_interval_ms = 1500
            "#,
        )
        .unwrap();

        assert_eq!(tables.combat.special_chance, 25);
        assert_eq!(tables.combat.crit_multiplier, 130);
        assert_eq!(tables.combat.poison_decay, 2);
        assert_eq!(tables.cadence.base_interval_ms, 1_500);
        assert_eq!(tables.cadence.min_interval_ms, 100);
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(TablesLoader::parse("").unwrap(), BalanceTables::default());
    }

    #[test]
    fn rejects_inverted_variance() {
        let err = TablesLoader::parse("[combat]\nvariance_min = 5\nvariance_max = 1\n").unwrap_err();
        assert!(err.to_string().contains("variance_min"));
    }
}
