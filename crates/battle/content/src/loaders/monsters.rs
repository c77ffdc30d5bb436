//! Monster catalog loader.

use std::collections::HashSet;
use std::path::Path;

use battle_core::{MonsterCatalog, MonsterTemplate};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Monster catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterCatalogFile {
    pub monsters: Vec<MonsterTemplate>,
}

/// Loader for monster templates from RON files.
pub struct MonsterLoader;

impl MonsterLoader {
    /// Load a monster catalog from a RON file.
    ///
    /// Duplicate ids are rejected rather than silently shadowed.
    pub fn load(path: &Path) -> LoadResult<MonsterCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load monster catalog {}: {}", path.display(), e))
    }

    /// Parse a monster catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<MonsterCatalog> {
        let file: MonsterCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse monster catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for template in &file.monsters {
            if !seen.insert(template.id.as_str()) {
                anyhow::bail!("Duplicate monster id '{}'", template.id);
            }
            if template.stats.max_health == 0 {
                anyhow::bail!("Monster '{}' has zero max health", template.id);
            }
        }

        tracing::debug!(target: "battle::content", monsters = file.monsters.len(), "Loaded monster catalog");
        Ok(file.monsters.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{MonsterOracle, SpecialAbility};

    use super::*;

    const CATALOG: &str = r#"(
        monsters: [
            (
                id: "slime",
                name: "Slime",
                stats: (health: 40, max_health: 40, attack: 6, defense: 1),
            ),
            (
                id: "fire_drake",
                name: "Fire Drake",
                stats: (
                    level: 5,
                    health: 160,
                    max_health: 160,
                    attack: 22,
                    defense: 9,
                    speed: 120,
                    crit_chance: 20,
                    abilities: [reflect, poison],
                ),
                bounty: (gold: 40, drops: ["drake_scale"], drop_chance: 50),
            ),
        ],
    )"#;

    #[test]
    fn parses_templates_with_defaults() {
        let catalog = MonsterLoader::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);

        let slime = catalog.template("slime").unwrap();
        assert_eq!(slime.stats.speed, 100);
        assert_eq!(slime.stats.crit_chance, 15);
        assert_eq!(slime.bounty.gold, 0);

        let drake = catalog.template("fire_drake").unwrap();
        assert!(drake.stats.has_ability(SpecialAbility::Reflect));
        assert_eq!(drake.bounty.drops, vec!["drake_scale"]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let dup = r#"(monsters: [
            (id: "bat", name: "Bat", stats: (health: 5, max_health: 5, attack: 2, defense: 0)),
            (id: "bat", name: "Big Bat", stats: (health: 9, max_health: 9, attack: 3, defense: 0)),
        ])"#;
        let err = MonsterLoader::parse(dup).unwrap_err();
        assert!(err.to_string().contains("Duplicate monster id 'bat'"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MonsterLoader::load(&dir.path().join("nope.ron")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
