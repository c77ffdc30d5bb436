//! Per-tick battle state machine.
//!
//! [`BattleEngine::advance`] takes the current snapshot and returns the next
//! one. The input is never mutated, so a caller that discards a report (for
//! example after cancellation) leaves the battle exactly as it was.

use rand::Rng;

use crate::combat::{BattleAction, StatusDelta, resolve_attack};
use crate::config::CombatTables;
use crate::rng::{pick_index, roll_percent};
use crate::schedule::{Cadence, TickRole};
use crate::state::{
    BattleLogEntry, BattleOutcome, BattleSpeed, BattleState, CombatantId, LogEvent, SpecialAbility,
};

/// Everything produced by one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Snapshot after the tick; replaces the previous one wholesale.
    pub state: BattleState,
    pub tick: u64,
    pub role: TickRole,
    /// Attacks resolved on this tick, in order.
    pub actions: Vec<BattleAction>,
    /// Log entries appended on this tick.
    pub entries: Vec<BattleLogEntry>,
    /// Enemies that fell on this tick.
    pub defeated: Vec<CombatantId>,
}

/// Applies resolver output to battle snapshots.
pub struct BattleEngine<'a> {
    tables: &'a CombatTables,
    cadence: &'a Cadence,
}

impl<'a> BattleEngine<'a> {
    pub fn new(tables: &'a CombatTables, cadence: &'a Cadence) -> Self {
        Self { tables, cadence }
    }

    /// Seeds the log with the battle-start entry naming every combatant.
    pub fn start(&self, mut state: BattleState) -> BattleState {
        if !state.log.is_empty() {
            return state;
        }

        let mut combatants = vec![state.player.id];
        combatants.extend(state.enemies.iter().map(|e| e.id));
        let foes = state
            .enemies
            .iter()
            .map(|e| format!("{} (Lv.{})", e.name, e.stats.level))
            .collect::<Vec<_>>()
            .join(", ");
        let message = format!("{} engages {foes}", state.player.name);

        state.push_log(LogEvent::BattleStarted { combatants }, message);
        state
    }

    /// Resolves the next tick.
    ///
    /// A finished battle is returned unchanged with an empty report.
    pub fn advance<R: Rng + ?Sized>(&self, state: &BattleState, rng: &mut R) -> TickReport {
        let mut next = state.clone();
        if state.is_over() {
            return TickReport {
                tick: state.tick,
                role: TickRole::for_tick(state.tick),
                state: next,
                actions: Vec::new(),
                entries: Vec::new(),
                defeated: Vec::new(),
            };
        }

        let since = next.last_seq();
        // The clock runs at 1x so snapshots do not depend on the UI speed.
        next.clock_ms += self.cadence.next_wait_ms(state, BattleSpeed::Normal);
        next.tick += 1;
        let role = TickRole::for_tick(next.tick);

        tracing::trace!(target: "battle::engine", tick = next.tick, %role, "Resolving tick");

        let mut turn = Turn::default();
        match role {
            TickRole::Player => self.player_turn(&mut next, rng, &mut turn),
            TickRole::Enemies => self.enemy_turn(&mut next, rng, &mut turn),
        }
        Self::settle(&mut next);

        let entries = next.entries_since(since).to_vec();
        TickReport {
            tick: next.tick,
            role,
            state: next,
            actions: turn.actions,
            entries,
            defeated: turn.defeated,
        }
    }

    fn player_turn<R: Rng + ?Sized>(&self, state: &mut BattleState, rng: &mut R, turn: &mut Turn) {
        for index in 0..state.enemies.len() {
            let enemy = &mut state.enemies[index];
            if !enemy.is_alive() || enemy.poison == 0 {
                continue;
            }
            let id = enemy.id;
            let damage = enemy.tick_poison(self.tables.poison_decay);
            let message = format!("{} takes {damage} poison damage", enemy.name);
            let fell = !enemy.is_alive();
            state.push_log(LogEvent::PoisonTick { target: id, damage }, message);
            if fell {
                self.record_defeat(state, id, rng, turn);
            }
        }
        if state.all_enemies_defeated() {
            return;
        }

        if state.player.take_frozen() {
            let message = format!("{} is frozen and loses the turn", state.player.name);
            state.push_log(
                LogEvent::Skipped {
                    combatant: CombatantId::Player,
                },
                message,
            );
            return;
        }

        let targets = state.living_enemy_ids();
        let Some(target) = pick_index(rng, targets.len()).map(|index| targets[index]) else {
            return;
        };
        let Some(defender) = state.combatant(target).cloned() else {
            tracing::warn!(target: "battle::engine", combatant = %target, "Ignoring attack on unknown combatant");
            return;
        };

        let resolution = resolve_attack(&state.player, &defender, self.tables, rng);
        let action = resolution.action;

        if let Some(enemy) = state.combatant_mut(target) {
            resolution.defender.apply(enemy);
        }
        resolution.attacker.apply(&mut state.player);

        let target_alive = state.combatant(target).is_some_and(|c| c.is_alive());
        self.log_action(state, &action, target_alive);
        if !target_alive {
            self.record_defeat(state, target, rng, turn);
        }
        turn.actions.push(action);
    }

    fn enemy_turn<R: Rng + ?Sized>(&self, state: &mut BattleState, rng: &mut R, turn: &mut Turn) {
        if state.player.poison > 0 {
            let damage = state.player.tick_poison(self.tables.poison_decay);
            let message = format!("{} takes {damage} poison damage", state.player.name);
            state.push_log(
                LogEvent::PoisonTick {
                    target: CombatantId::Player,
                    damage,
                },
                message,
            );
        }
        if !state.player.is_alive() {
            return;
        }

        // Attacks resolve against a projection; the real player takes the
        // summed damage once at the end of the tick.
        let mut projected = state.player.clone();
        let mut total = StatusDelta::default();
        let mut resolved = Vec::new();

        for index in 0..state.enemies.len() {
            let enemy = &mut state.enemies[index];
            if !enemy.is_alive() {
                continue;
            }
            if enemy.take_frozen() {
                let (id, message) = (enemy.id, format!("{} is frozen and loses the turn", enemy.name));
                state.push_log(LogEvent::Skipped { combatant: id }, message);
                continue;
            }

            let resolution = resolve_attack(enemy, &projected, self.tables, rng);
            resolution.attacker.apply(enemy);
            resolution.defender.apply(&mut projected);
            total.merge(&resolution.defender);

            let action = resolution.action;
            let attacker_alive = enemy.is_alive();
            self.log_action(state, &action, true);
            if !attacker_alive {
                self.record_defeat(state, action.attacker, rng, turn);
            }
            resolved.push(action);
        }

        let applied = total.apply(&mut state.player);
        tracing::debug!(
            target: "battle::engine",
            tick = state.tick,
            attacks = resolved.len(),
            damage = applied.lost,
            "Enemy volley applied"
        );

        if state.player.is_alive() {
            for action in &resolved {
                self.log_status(state, action);
            }
        }
        turn.actions.extend(resolved);
    }

    /// Appends the action entry plus heal entries. Status entries follow only
    /// if the target is still standing.
    fn log_action(&self, state: &mut BattleState, action: &BattleAction, log_status: bool) {
        state.push_log(
            LogEvent::Action {
                action: action.clone(),
            },
            action.message.clone(),
        );

        if action.healed > 0 {
            let name = state
                .combatant(action.attacker)
                .map(|c| c.name.clone())
                .unwrap_or_default();
            state.push_log(
                LogEvent::Healed {
                    target: action.attacker,
                    amount: action.healed,
                },
                format!("{name} recovers {} health", action.healed),
            );
        }

        if log_status && action.target.enemy_index().is_some() {
            self.log_status(state, action);
        }
    }

    fn log_status(&self, state: &mut BattleState, action: &BattleAction) {
        let Some(ability) = action.ability else {
            return;
        };
        let verb = match ability {
            SpecialAbility::Freeze => "is frozen",
            SpecialAbility::Poison => "is poisoned",
            SpecialAbility::Curse => "is cursed",
            SpecialAbility::DoubleStrike | SpecialAbility::LifeDrain | SpecialAbility::Reflect => {
                return;
            }
        };
        let Some(target) = state.combatant(action.target) else {
            tracing::warn!(target: "battle::engine", combatant = %action.target, "Status on unknown combatant");
            return;
        };
        if !target.is_alive() {
            return;
        }
        let message = format!("{} {verb}", target.name);
        state.push_log(
            LogEvent::StatusApplied {
                target: action.target,
                ability,
            },
            message,
        );
    }

    /// Logs an enemy's defeat and announces its bounty.
    fn record_defeat<R: Rng + ?Sized>(
        &self,
        state: &mut BattleState,
        id: CombatantId,
        rng: &mut R,
        turn: &mut Turn,
    ) {
        if id.is_player() || turn.defeated.contains(&id) {
            return;
        }
        let Some(enemy) = state.combatant(id).cloned() else {
            tracing::warn!(target: "battle::engine", combatant = %id, "Defeat of unknown combatant");
            return;
        };
        turn.defeated.push(id);

        state.push_log(
            LogEvent::EnemyDefeated {
                enemy: id,
                template: enemy.template.clone(),
                boss: enemy.boss,
            },
            format!("{} is defeated", enemy.name),
        );

        let bounty = &enemy.bounty;
        if bounty.gold > 0 {
            state.push_log(
                LogEvent::GoldFound {
                    source: id,
                    amount: bounty.gold,
                },
                format!("Found {} gold", bounty.gold),
            );
        }
        if !bounty.drops.is_empty() && roll_percent(rng, bounty.drop_chance) {
            if let Some(item) = pick_index(rng, bounty.drops.len()).map(|i| bounty.drops[i].clone()) {
                let message = format!("{} dropped {item}", enemy.name);
                state.push_log(LogEvent::ItemFound { source: id, item }, message);
            }
        }
    }

    /// Terminal check. Player defeat takes precedence over victory.
    fn settle(state: &mut BattleState) {
        if !state.player.is_alive() {
            state.outcome = BattleOutcome::Defeat;
            let message = format!("{} has fallen", state.player.name);
            state.push_log(LogEvent::Defeat, message);
        } else if state.all_enemies_defeated() {
            state.outcome = BattleOutcome::Victory;
            let message = format!("Victory after {} ticks", state.tick);
            state.push_log(LogEvent::Victory, message);
        } else {
            return;
        }
        tracing::debug!(
            target: "battle::engine",
            tick = state.tick,
            outcome = %state.outcome,
            "Battle finished"
        );
    }
}

#[derive(Default)]
struct Turn {
    actions: Vec<BattleAction>,
    defeated: Vec<CombatantId>,
}
