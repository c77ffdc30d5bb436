use crate::combat::BattleAction;
use crate::state::{BattleLogEntry, BattleOutcome, BattleState, CombatantId, LogEvent};

/// Cumulative counters for one run.
///
/// Folded by the orchestrator from the actions and log entries of each
/// session; the session itself never touches it. Damage figures are the
/// resolved amounts, before clamping to the target's remaining health.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunStatistics {
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub monsters_defeated: u32,
    pub bosses_defeated: u32,
    /// Special abilities triggered by the player.
    pub skills_used: u32,
    /// Extra damage from the player's multi-hit specials.
    pub combo_damage: u64,
    pub critical_hits: u32,
    pub misses: u32,
    pub healing: u64,
    pub encounters_cleared: u32,
    pub ticks: u64,
    /// Battle clock summed over all encounters, at 1x speed.
    pub elapsed_ms: u64,
    pub gold_obtained: u64,
    pub items_obtained: Vec<String>,
}

impl RunStatistics {
    /// Attributes one resolved attack by attacker id.
    pub fn record_action(&mut self, action: &BattleAction) {
        let damage = u64::from(action.damage);
        let reflected = u64::from(action.reflected);

        if action.attacker.is_player() {
            self.damage_dealt += damage;
            self.damage_taken += reflected;
            if action.missed {
                self.misses += 1;
            }
            if action.critical {
                self.critical_hits += 1;
            }
            if action.ability.is_some() {
                self.skills_used += 1;
            }
            if action.is_combo() {
                self.combo_damage += u64::from(action.bonus_damage);
            }
        } else {
            self.damage_taken += damage;
            self.damage_dealt += reflected;
        }
    }

    /// Folds non-attack log events (poison, healing, defeats, rewards).
    pub fn record_entry(&mut self, entry: &BattleLogEntry) {
        match &entry.event {
            LogEvent::PoisonTick { target, damage } => {
                if *target == CombatantId::Player {
                    self.damage_taken += u64::from(*damage);
                } else {
                    self.damage_dealt += u64::from(*damage);
                }
            }
            LogEvent::Healed { target, amount } if target.is_player() => {
                self.healing += u64::from(*amount);
            }
            LogEvent::EnemyDefeated { boss, .. } => {
                self.monsters_defeated += 1;
                if *boss {
                    self.bosses_defeated += 1;
                }
            }
            LogEvent::GoldFound { amount, .. } => {
                self.gold_obtained += u64::from(*amount);
            }
            LogEvent::ItemFound { item, .. } => {
                self.items_obtained.push(item.clone());
            }
            _ => {}
        }
    }

    /// Stamps the end of an encounter.
    pub fn finish_encounter(&mut self, state: &BattleState) {
        self.ticks += state.tick;
        self.elapsed_ms += state.clock_ms;
        if state.outcome == BattleOutcome::Victory {
            self.encounters_cleared += 1;
        }
    }
}
