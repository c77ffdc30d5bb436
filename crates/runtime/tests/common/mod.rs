#![allow(dead_code)]

use std::sync::Arc;

use battle_core::{
    Combatant, CombatantStats, InfinitePlan, MonsterCatalog, MonsterTemplate, RunPlan, StagePlan,
    WaveSpec,
};
use battle_runtime::{RunBuilder, RunOrchestrator, RuntimeConfig};

pub fn catalog() -> Arc<MonsterCatalog> {
    Arc::new(
        [
            MonsterTemplate::new("goblin", "Goblin", CombatantStats::new(80, 10, 5)),
            MonsterTemplate::new("rat", "Rat", CombatantStats::new(30, 6, 1)),
            MonsterTemplate::new("ogre", "Ogre", CombatantStats::new(140, 14, 6)),
        ]
        .into_iter()
        .collect(),
    )
}

pub fn hero() -> Combatant {
    Combatant::player("Hero", CombatantStats::new(600, 30, 10))
}

pub fn stage(waves: &[usize], boss: Option<&str>) -> RunPlan {
    RunPlan::Stage(StagePlan {
        id: "meadow".into(),
        level: 1,
        waves: waves.iter().map(|&count| WaveSpec { count }).collect(),
        pool: vec!["goblin".into(), "rat".into()],
        boss: boss.map(String::from),
        level_scaling: StagePlan::DEFAULT_LEVEL_SCALING,
    })
}

pub fn endless() -> RunPlan {
    RunPlan::Infinite(InfinitePlan {
        id: "tower".into(),
        pool: vec!["goblin".into()],
        boss: None,
        boss_every: InfinitePlan::DEFAULT_BOSS_EVERY,
        growth: 0,
        max_encounters: None,
    })
}

pub fn config(seed: u64) -> RuntimeConfig {
    RuntimeConfig {
        seed: Some(seed),
        ..RuntimeConfig::default()
    }
}

pub fn builder(plan: RunPlan, seed: u64) -> RunBuilder {
    RunOrchestrator::builder()
        .config(config(seed))
        .catalog(catalog())
        .plan(plan)
        .player(hero())
}
