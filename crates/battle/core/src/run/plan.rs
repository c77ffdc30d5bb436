//! Run plans: what each encounter of a run is made of.
//!
//! A plan is static content. [`RunPlan::encounter`] turns an encounter index
//! into a concrete [`EncounterSpec`] (monster ids, scaling, boss) using the
//! run RNG, and [`EncounterSpec::spawn`] resolves those ids through a
//! [`MonsterOracle`].

use rand::Rng;

use crate::error::ConfigError;
use crate::rng::pick_index;
use crate::state::{Combatant, MAX_ENEMIES};

use super::catalog::MonsterOracle;

/// One wave of a stage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaveSpec {
    /// Number of simultaneous enemies.
    pub count: usize,
}

/// Number of simultaneous enemies on a dungeon floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EncounterSize {
    #[default]
    Single,
    Double,
    Triple,
}

impl EncounterSize {
    #[inline]
    pub const fn count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }
}

/// One floor of a dungeon.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorSpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub size: EncounterSize,
    /// Boss floors put the dungeon boss in the first slot.
    #[cfg_attr(feature = "serde", serde(default))]
    pub boss: bool,
}

#[cfg(feature = "serde")]
const fn default_level() -> u32 {
    1
}

#[cfg(feature = "serde")]
const fn default_level_scaling() -> u32 {
    StagePlan::DEFAULT_LEVEL_SCALING
}

#[cfg(feature = "serde")]
const fn default_floor_scaling() -> u32 {
    DungeonPlan::DEFAULT_FLOOR_SCALING
}

#[cfg(feature = "serde")]
const fn default_boss_every() -> u32 {
    InfinitePlan::DEFAULT_BOSS_EVERY
}

#[cfg(feature = "serde")]
const fn default_growth() -> u32 {
    InfinitePlan::DEFAULT_GROWTH
}

/// Wave-based stage: waves in order, boss on the final wave.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StagePlan {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u32,
    pub waves: Vec<WaveSpec>,
    pub pool: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boss: Option<String>,
    /// Stat bonus in percent per stage level above 1.
    #[cfg_attr(feature = "serde", serde(default = "default_level_scaling"))]
    pub level_scaling: u32,
}

impl StagePlan {
    pub const DEFAULT_LEVEL_SCALING: u32 = 10;
}

/// Floor-based dungeon with per-floor scaling.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DungeonPlan {
    pub id: String,
    pub floors: Vec<FloorSpec>,
    pub pool: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boss: Option<String>,
    /// Stat bonus in percent per floor below the first.
    #[cfg_attr(feature = "serde", serde(default = "default_floor_scaling"))]
    pub floor_scaling: u32,
}

impl DungeonPlan {
    pub const DEFAULT_FLOOR_SCALING: u32 = 15;
}

/// Endless spawns with growing difficulty.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfinitePlan {
    pub id: String,
    pub pool: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boss: Option<String>,
    /// Every n-th encounter includes the boss.
    #[cfg_attr(feature = "serde", serde(default = "default_boss_every"))]
    pub boss_every: u32,
    /// Stat bonus in percent per cleared encounter.
    #[cfg_attr(feature = "serde", serde(default = "default_growth"))]
    pub growth: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_encounters: Option<u32>,
}

impl InfinitePlan {
    pub const DEFAULT_BOSS_EVERY: u32 = 5;
    pub const DEFAULT_GROWTH: u32 = 10;
}

/// Composition of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RunPlan {
    Stage(StagePlan),
    Dungeon(DungeonPlan),
    Infinite(InfinitePlan),
}

/// A concrete encounter: which monsters, how strong.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSpec {
    /// Zero-based position in the run.
    pub index: u32,
    pub label: String,
    /// Template ids in slot order.
    pub monsters: Vec<String>,
    /// Stat scaling in percent (100 = template stats).
    pub scale_percent: u32,
    pub level: u32,
    pub boss: Option<String>,
}

impl EncounterSpec {
    /// Resolves monster ids into combatants. When the encounter has a boss,
    /// the first slot is marked as the boss.
    pub fn spawn(&self, oracle: &dyn MonsterOracle) -> Result<Vec<Combatant>, ConfigError> {
        self.monsters
            .iter()
            .enumerate()
            .map(|(slot, id)| {
                let template = oracle
                    .template(id)
                    .ok_or_else(|| ConfigError::UnknownMonster(id.clone()))?;
                let monster = template.spawn(self.scale_percent, self.level);
                Ok(if slot == 0 && self.boss.is_some() { monster.as_boss() } else { monster })
            })
            .collect()
    }
}

impl RunPlan {
    pub fn id(&self) -> &str {
        match self {
            Self::Stage(plan) => &plan.id,
            Self::Dungeon(plan) => &plan.id,
            Self::Infinite(plan) => &plan.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Stage(_) => "stage",
            Self::Dungeon(_) => "dungeon",
            Self::Infinite(_) => "infinite",
        }
    }

    fn pool(&self) -> &[String] {
        match self {
            Self::Stage(plan) => &plan.pool,
            Self::Dungeon(plan) => &plan.pool,
            Self::Infinite(plan) => &plan.pool,
        }
    }

    fn boss(&self) -> Option<&str> {
        match self {
            Self::Stage(plan) => plan.boss.as_deref(),
            Self::Dungeon(plan) => plan.boss.as_deref(),
            Self::Infinite(plan) => plan.boss.as_deref(),
        }
    }

    /// Number of encounters, or `None` for an uncapped infinite run.
    pub fn encounter_limit(&self) -> Option<u32> {
        match self {
            Self::Stage(plan) => Some(plan.waves.len() as u32),
            Self::Dungeon(plan) => Some(plan.floors.len() as u32),
            Self::Infinite(plan) => plan.max_encounters,
        }
    }

    /// Checks the plan against the catalog before any encounter starts.
    pub fn validate(&self, oracle: &dyn MonsterOracle) -> Result<(), ConfigError> {
        let plan = self.id().to_string();

        if self.pool().is_empty() {
            return Err(ConfigError::EmptyMonsterPool { plan });
        }
        for id in self.pool().iter().map(String::as_str).chain(self.boss()) {
            if oracle.template(id).is_none() {
                return Err(ConfigError::UnknownMonster(id.to_string()));
            }
        }

        match self {
            Self::Stage(stage) => {
                if stage.waves.is_empty() {
                    return Err(ConfigError::NoEncounters { plan });
                }
                for (index, wave) in stage.waves.iter().enumerate() {
                    if wave.count == 0 || wave.count > MAX_ENEMIES {
                        return Err(ConfigError::InvalidEnemyCount {
                            plan,
                            index: index as u32,
                            count: wave.count,
                        });
                    }
                }
            }
            Self::Dungeon(dungeon) => {
                if dungeon.floors.is_empty() {
                    return Err(ConfigError::NoEncounters { plan });
                }
                if dungeon.boss.is_none() && dungeon.floors.iter().any(|floor| floor.boss) {
                    return Err(ConfigError::MissingBoss { plan });
                }
            }
            Self::Infinite(infinite) => {
                if infinite.max_encounters == Some(0) {
                    return Err(ConfigError::NoEncounters { plan });
                }
                if infinite.boss.is_some() && infinite.boss_every == 0 {
                    return Err(ConfigError::ZeroBossInterval { plan });
                }
            }
        }
        Ok(())
    }

    /// Composes encounter `index`, or `None` once the plan is exhausted.
    pub fn encounter<R: Rng + ?Sized>(&self, index: u32, rng: &mut R) -> Option<EncounterSpec> {
        if self.encounter_limit().is_some_and(|limit| index >= limit) {
            return None;
        }

        let (label, count, boss, scale_percent, level) = match self {
            Self::Stage(stage) => {
                let wave = stage.waves.get(index as usize)?;
                let last = index as usize + 1 == stage.waves.len();
                let boss = stage.boss.clone().filter(|_| last);
                let scale = 100 + stage.level.saturating_sub(1) * stage.level_scaling;
                let label = format!("Wave {}/{}", index + 1, stage.waves.len());
                (label, wave.count, boss, scale, stage.level)
            }
            Self::Dungeon(dungeon) => {
                let floor = dungeon.floors.get(index as usize)?;
                let boss = dungeon.boss.clone().filter(|_| floor.boss);
                let scale = 100 + index * dungeon.floor_scaling;
                let label = format!("Floor {}/{}", index + 1, dungeon.floors.len());
                (label, floor.size.count(), boss, scale, index + 1)
            }
            Self::Infinite(infinite) => {
                let count = (1 + index as usize / 3).min(MAX_ENEMIES);
                let boss = infinite
                    .boss
                    .clone()
                    .filter(|_| infinite.boss_every > 0 && (index + 1) % infinite.boss_every == 0);
                let scale = 100 + index * infinite.growth;
                let label = format!("Encounter {}", index + 1);
                (label, count, boss, scale, index + 1)
            }
        };

        let pool = self.pool();
        let fill = if boss.is_some() { count.saturating_sub(1) } else { count };
        let monsters = boss
            .iter()
            .cloned()
            .chain((0..fill).filter_map(|_| pick_index(rng, pool.len()).map(|i| pool[i].clone())))
            .collect();

        Some(EncounterSpec {
            index,
            label,
            monsters,
            scale_percent,
            level,
            boss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;
    use crate::run::catalog::{MonsterCatalog, MonsterTemplate};
    use crate::state::CombatantStats;

    fn catalog() -> MonsterCatalog {
        ["rat", "bat", "wolf", "lich"]
            .into_iter()
            .map(|id| MonsterTemplate::new(id, id.to_uppercase(), CombatantStats::new(20, 4, 1)))
            .collect()
    }

    fn stage() -> StagePlan {
        StagePlan {
            id: "meadow".into(),
            level: 3,
            waves: vec![WaveSpec { count: 1 }, WaveSpec { count: 2 }, WaveSpec { count: 3 }],
            pool: vec!["rat".into(), "bat".into()],
            boss: Some("lich".into()),
            level_scaling: StagePlan::DEFAULT_LEVEL_SCALING,
        }
    }

    #[test]
    fn stage_places_boss_on_final_wave() {
        let plan = RunPlan::Stage(stage());
        plan.validate(&catalog()).unwrap();
        let mut rng = seeded_rng(1);

        let first = plan.encounter(0, &mut rng).unwrap();
        assert_eq!(first.monsters.len(), 1);
        assert!(first.boss.is_none());
        assert_eq!(first.scale_percent, 120);
        assert_eq!(first.label, "Wave 1/3");

        let last = plan.encounter(2, &mut rng).unwrap();
        assert_eq!(last.monsters.len(), 3);
        assert_eq!(last.monsters[0], "lich");
        assert_eq!(last.boss.as_deref(), Some("lich"));

        assert!(plan.encounter(3, &mut rng).is_none());
    }

    #[test]
    fn dungeon_scales_per_floor() {
        let plan = RunPlan::Dungeon(DungeonPlan {
            id: "crypt".into(),
            floors: vec![
                FloorSpec::default(),
                FloorSpec {
                    size: EncounterSize::Double,
                    boss: false,
                },
                FloorSpec {
                    size: EncounterSize::Triple,
                    boss: true,
                },
            ],
            pool: vec!["wolf".into()],
            boss: Some("lich".into()),
            floor_scaling: 20,
        });
        plan.validate(&catalog()).unwrap();
        let mut rng = seeded_rng(2);

        let specs: Vec<_> = (0..3).filter_map(|i| plan.encounter(i, &mut rng)).collect();
        assert_eq!(specs.iter().map(|s| s.scale_percent).collect::<Vec<_>>(), vec![100, 120, 140]);
        assert_eq!(specs.iter().map(|s| s.level).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(specs[1].monsters, vec!["wolf", "wolf"]);
        assert_eq!(specs[2].monsters, vec!["lich", "wolf", "wolf"]);

        let spawned = specs[2].spawn(&catalog()).unwrap();
        assert_eq!(spawned[0].max_health(), 28);
        assert!(spawned[0].boss);
        assert!(spawned[1..].iter().all(|monster| !monster.boss));
        assert!(specs[1].spawn(&catalog()).unwrap().iter().all(|monster| !monster.boss));
    }

    #[test]
    fn infinite_grows_and_summons_boss() {
        let plan = RunPlan::Infinite(InfinitePlan {
            id: "tower".into(),
            pool: vec!["rat".into()],
            boss: Some("lich".into()),
            boss_every: 4,
            growth: 10,
            max_encounters: Some(9),
        });
        plan.validate(&catalog()).unwrap();
        let mut rng = seeded_rng(3);

        let sizes: Vec<usize> = (0..9)
            .filter_map(|i| plan.encounter(i, &mut rng))
            .map(|spec| spec.monsters.len())
            .collect();
        assert_eq!(sizes, vec![1, 1, 1, 2, 2, 2, 3, 3, 3]);

        let fourth = plan.encounter(3, &mut rng).unwrap();
        assert_eq!(fourth.boss.as_deref(), Some("lich"));
        assert_eq!(fourth.scale_percent, 130);
        assert!(plan.encounter(9, &mut rng).is_none());
    }

    #[test]
    fn malformed_plans_are_rejected() {
        let catalog = catalog();

        let mut unknown = stage();
        unknown.pool.push("dragon".into());
        assert_eq!(
            RunPlan::Stage(unknown).validate(&catalog),
            Err(ConfigError::UnknownMonster("dragon".into()))
        );

        let mut crowded = stage();
        crowded.waves[1].count = 4;
        assert!(matches!(
            RunPlan::Stage(crowded).validate(&catalog),
            Err(ConfigError::InvalidEnemyCount { index: 1, count: 4, .. })
        ));

        let mut empty = stage();
        empty.waves.clear();
        assert!(matches!(
            RunPlan::Stage(empty).validate(&catalog),
            Err(ConfigError::NoEncounters { .. })
        ));

        let mut no_pool = stage();
        no_pool.pool.clear();
        assert!(matches!(
            RunPlan::Stage(no_pool).validate(&catalog),
            Err(ConfigError::EmptyMonsterPool { .. })
        ));

        let bossless = RunPlan::Dungeon(DungeonPlan {
            id: "pit".into(),
            floors: vec![FloorSpec {
                size: EncounterSize::Single,
                boss: true,
            }],
            pool: vec!["rat".into()],
            boss: None,
            floor_scaling: 0,
        });
        assert!(matches!(bossless.validate(&catalog), Err(ConfigError::MissingBoss { .. })));
    }

    #[test]
    fn spawning_unknown_template_fails() {
        let spec = EncounterSpec {
            index: 0,
            label: "Wave 1/1".into(),
            monsters: vec!["ghost".into()],
            scale_percent: 100,
            level: 1,
            boss: None,
        };
        assert_eq!(spec.spawn(&catalog()), Err(ConfigError::UnknownMonster("ghost".into())));
    }
}
