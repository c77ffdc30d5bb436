use crate::combat::BattleAction;
use crate::state::{BattleLogEntry, LogEvent};

/// What an objective asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ObjectiveKind {
    DefeatMonsters { count: u32 },
    DefeatBoss { monster_id: String },
    DealDamage { amount: u64 },
}

impl ObjectiveKind {
    fn target(&self) -> u64 {
        match self {
            Self::DefeatMonsters { count } => u64::from(*count),
            Self::DefeatBoss { .. } => 1,
            Self::DealDamage { amount } => *amount,
        }
    }
}

/// Declarative progress target, read-only to the battle session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub current: u64,
    pub target: u64,
    pub completed: bool,
}

impl Objective {
    pub fn new(kind: ObjectiveKind) -> Self {
        let target = kind.target();
        Self {
            kind,
            current: 0,
            target,
            completed: target == 0,
        }
    }

    pub fn defeat_monsters(count: u32) -> Self {
        Self::new(ObjectiveKind::DefeatMonsters { count })
    }

    pub fn defeat_boss(monster_id: impl Into<String>) -> Self {
        Self::new(ObjectiveKind::DefeatBoss {
            monster_id: monster_id.into(),
        })
    }

    pub fn deal_damage(amount: u64) -> Self {
        Self::new(ObjectiveKind::DealDamage { amount })
    }

    pub fn record_action(&mut self, action: &BattleAction) {
        if let ObjectiveKind::DealDamage { .. } = self.kind {
            if action.attacker.is_player() {
                self.advance(u64::from(action.damage));
            }
        }
    }

    pub fn record_entry(&mut self, entry: &BattleLogEntry) {
        let LogEvent::EnemyDefeated { template, boss, .. } = &entry.event else {
            return;
        };
        match &self.kind {
            ObjectiveKind::DefeatMonsters { .. } => self.advance(1),
            ObjectiveKind::DefeatBoss { monster_id } => {
                if *boss && template.as_deref() == Some(monster_id.as_str()) {
                    self.advance(1);
                }
            }
            ObjectiveKind::DealDamage { .. } => {}
        }
    }

    /// Progress never exceeds the target and completion is sticky.
    fn advance(&mut self, by: u64) {
        self.current = self.current.saturating_add(by).min(self.target);
        if self.current >= self.target {
            self.completed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CombatantId;

    fn defeated(template: &str, boss: bool) -> BattleLogEntry {
        let event = LogEvent::EnemyDefeated {
            enemy: CombatantId::Enemy(0),
            template: Some(template.into()),
            boss,
        };
        BattleLogEntry {
            seq: 3,
            tick: 5,
            clock_ms: 10_000,
            kind: event.kind(),
            event,
            message: String::new(),
        }
    }

    #[test]
    fn defeat_count_caps_at_target() {
        let mut objective = Objective::defeat_monsters(2);
        for template in ["rat", "rat", "bat"] {
            objective.record_entry(&defeated(template, false));
        }
        assert_eq!(objective.current, 2);
        assert!(objective.completed);
    }

    #[test]
    fn boss_objective_checks_identity() {
        let mut objective = Objective::defeat_boss("lich");
        objective.record_entry(&defeated("rat", false));
        assert!(!objective.completed);
        objective.record_entry(&defeated("lich", false));
        assert!(!objective.completed);
        objective.record_entry(&defeated("lich", true));
        assert!(objective.completed);
        assert_eq!(objective.current, 1);
    }
}
