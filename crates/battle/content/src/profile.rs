//! Content-side descriptions that are not part of the battle model itself.

use battle_core::{Combatant, CombatantStats, Objective, ObjectiveKind, RunPlan};

/// Player stats as provided by the profile collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerProfile {
    pub name: String,
    pub stats: CombatantStats,
}

impl PlayerProfile {
    pub fn new(name: impl Into<String>, stats: CombatantStats) -> Self {
        Self {
            name: name.into(),
            stats,
        }
    }

    pub fn to_combatant(&self) -> Combatant {
        Combatant::player(self.name.clone(), self.stats.clone())
    }
}

/// A run plan together with the objectives tracked while it runs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanDefinition {
    pub plan: RunPlan,
    #[cfg_attr(feature = "serde", serde(default))]
    pub objectives: Vec<ObjectiveKind>,
}

impl PlanDefinition {
    /// Fresh objectives with no progress.
    pub fn objectives(&self) -> Vec<Objective> {
        self.objectives.iter().cloned().map(Objective::new).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::CombatantId;

    #[test]
    fn profile_builds_full_health_player() {
        let profile = PlayerProfile::new("Ayla", CombatantStats::new(120, 25, 8));
        let player = profile.to_combatant();
        assert_eq!(player.id, CombatantId::Player);
        assert_eq!(player.health(), 120);
        assert_eq!(player.name, "Ayla");
    }
}
