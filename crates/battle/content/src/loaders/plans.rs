//! Run plan loader.

use std::path::Path;

use crate::PlanDefinition;
use crate::loaders::{LoadResult, read_file};

/// Loader for run plans from RON files.
///
/// Plan files usually enable `unwrap_variant_newtypes` so the plan kind reads
/// as `stage(id: ..., waves: ...)`.
pub struct PlanLoader;

impl PlanLoader {
    /// Load a plan definition from a RON file.
    pub fn load(path: &Path) -> LoadResult<PlanDefinition> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load run plan {}: {}", path.display(), e))
    }

    /// Parse a plan definition from RON text.
    ///
    /// Only syntax is checked here; catalog references are validated when
    /// the run starts so a broken plan ends the run with a configuration
    /// error instead of failing the host.
    pub fn parse(content: &str) -> LoadResult<PlanDefinition> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse run plan RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{EncounterSize, ObjectiveKind, RunPlan};

    use super::*;

    #[test]
    fn parses_stage_with_objectives() {
        let text = r#"
            #![enable(implicit_some, unwrap_variant_newtypes)]
            (
                plan: stage(
                    id: "meadow",
                    level: 2,
                    waves: [(count: 1), (count: 2), (count: 3)],
                    pool: ["slime", "bat"],
                    boss: "goblin_chief",
                ),
                objectives: [
                    defeat_monsters(count: 5),
                    defeat_boss(monster_id: "goblin_chief"),
                ],
            )
        "#;
        let definition = PlanLoader::parse(text).unwrap();
        let RunPlan::Stage(stage) = &definition.plan else {
            panic!("expected stage plan, got {:?}", definition.plan);
        };
        assert_eq!(stage.waves.len(), 3);
        assert_eq!(stage.boss.as_deref(), Some("goblin_chief"));
        assert_eq!(stage.level_scaling, 10);

        let objectives = definition.objectives();
        assert_eq!(objectives.len(), 2);
        assert_eq!(objectives[0].target, 5);
        assert_eq!(
            objectives[1].kind,
            ObjectiveKind::DefeatBoss {
                monster_id: "goblin_chief".into()
            }
        );
    }

    #[test]
    fn parses_dungeon_floors() {
        let text = r#"
            #![enable(implicit_some, unwrap_variant_newtypes)]
            (
                plan: dungeon(
                    id: "crypt",
                    floors: [(size: single), (size: double), (size: triple, boss: true)],
                    pool: ["skeleton"],
                    boss: "lich",
                    floor_scaling: 20,
                ),
            )
        "#;
        let definition = PlanLoader::parse(text).unwrap();
        let RunPlan::Dungeon(dungeon) = definition.plan else {
            panic!("expected dungeon plan");
        };
        assert_eq!(dungeon.floors[2].size, EncounterSize::Triple);
        assert!(dungeon.floors[2].boss);
        assert!(definition.objectives.is_empty());
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = PlanLoader::parse("(plan: volcano())").unwrap_err();
        assert!(err.to_string().contains("Failed to parse run plan RON"));
    }
}
