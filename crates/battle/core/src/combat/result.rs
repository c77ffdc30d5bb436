//! Attack resolution results.

use rand::Rng;

use crate::config::CombatTables;
use crate::rng::{pick_index, roll_percent};
use crate::state::{Combatant, CombatantId, SpecialAbility, StatusFlags};

use super::ability::{AbilityEffect, ratio, trigger_ability};
use super::damage::{apply_critical, apply_curse, mitigate, roll_base_damage};

/// One resolved attack. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleAction {
    pub attacker: CombatantId,
    pub target: CombatantId,
    /// Attack plus variance, before defense.
    pub base_damage: u32,
    /// First hit after defense, curse and critical.
    pub primary_damage: u32,
    /// Second hit from a double strike.
    pub bonus_damage: u32,
    /// Total damage dealt to the target.
    pub damage: u32,
    pub critical: bool,
    pub missed: bool,
    pub ability: Option<SpecialAbility>,
    /// Damage reflected back onto the attacker.
    pub reflected: u32,
    /// Health restored to the attacker by life drain.
    pub healed: u32,
    pub message: String,
}

impl BattleAction {
    fn missed(attacker: &Combatant, defender: &Combatant) -> Self {
        Self {
            attacker: attacker.id,
            target: defender.id,
            base_damage: 0,
            primary_damage: 0,
            bonus_damage: 0,
            damage: 0,
            critical: false,
            missed: true,
            ability: None,
            reflected: 0,
            healed: 0,
            message: format!("{} attacks {} but misses", attacker.name, defender.name),
        }
    }

    /// True if the action carried more than one damage instance.
    #[inline]
    pub fn is_combo(&self) -> bool {
        self.bonus_damage > 0
    }
}

/// Changes to apply to one combatant after an attack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusDelta {
    pub damage: u32,
    pub heal: u32,
    pub freeze: bool,
    pub curse: bool,
    /// Removes the combatant's own curse (spent on this attack).
    pub consume_curse: bool,
    /// Poison stacks to apply; the stronger of old and new wins.
    pub poison: u32,
}

/// Health changes actually applied by [`StatusDelta::apply`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppliedDelta {
    pub healed: u32,
    pub lost: u32,
}

impl StatusDelta {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Folds another delta for the same combatant into this one.
    ///
    /// Damage and healing add up; status flags combine; poison keeps the
    /// strongest application.
    pub fn merge(&mut self, other: &StatusDelta) {
        self.damage = self.damage.saturating_add(other.damage);
        self.heal = self.heal.saturating_add(other.heal);
        self.freeze |= other.freeze;
        self.curse |= other.curse;
        self.consume_curse |= other.consume_curse;
        self.poison = self.poison.max(other.poison);
    }

    /// Applies the delta: curse consumption, healing, damage, then new
    /// status. Status never lands on a combatant this delta defeated.
    pub fn apply(&self, target: &mut Combatant) -> AppliedDelta {
        if self.consume_curse {
            target.status.remove(StatusFlags::CURSED);
        }
        let healed = target.heal(self.heal);
        let lost = target.apply_damage(self.damage);

        if target.is_alive() {
            if self.freeze {
                target.status.insert(StatusFlags::FROZEN);
            }
            if self.curse {
                target.status.insert(StatusFlags::CURSED);
            }
            if self.poison > 0 {
                target.apply_poison(self.poison);
            }
        }

        AppliedDelta { healed, lost }
    }
}

/// Outcome of [`resolve_attack`]: the action plus deltas for both sides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackResolution {
    pub action: BattleAction,
    pub attacker: StatusDelta,
    pub defender: StatusDelta,
}

/// Resolves one attack from `attacker` against `defender`.
///
/// Rolls happen in a fixed order: miss, variance, critical, special trigger,
/// special pick. Neither combatant is mutated; callers apply the returned
/// deltas.
pub fn resolve_attack<R: Rng + ?Sized>(
    attacker: &Combatant,
    defender: &Combatant,
    tables: &CombatTables,
    rng: &mut R,
) -> AttackResolution {
    let mut attacker_delta = StatusDelta {
        consume_curse: attacker.is_cursed(),
        ..StatusDelta::default()
    };

    if roll_percent(rng, tables.miss_chance) {
        return AttackResolution {
            action: BattleAction::missed(attacker, defender),
            attacker: attacker_delta,
            defender: StatusDelta::default(),
        };
    }

    let base_damage = roll_base_damage(attacker.stats.attack, tables, rng);
    let mut primary = mitigate(base_damage, defender.stats.defense, tables);
    if attacker.is_cursed() {
        primary = apply_curse(primary, tables);
    }
    let critical = roll_percent(rng, attacker.stats.crit_chance);
    if critical {
        primary = apply_critical(primary, tables);
    }

    let offensive: Vec<SpecialAbility> = attacker.stats.offensive_abilities().collect();
    let ability = if !offensive.is_empty() && roll_percent(rng, tables.special_chance) {
        pick_index(rng, offensive.len()).map(|index| offensive[index])
    } else {
        None
    };
    let effect = ability
        .map(|ability| trigger_ability(ability, attacker, primary, tables))
        .unwrap_or_default();

    let damage = primary.saturating_add(effect.bonus_damage);

    let reflected = if defender.stats.has_ability(SpecialAbility::Reflect)
        && damage > 0
        && defender.health() > damage
    {
        ratio(damage, tables.reflect_ratio).max(1)
    } else {
        0
    };

    attacker_delta.merge(&effect.attacker);
    attacker_delta.damage = attacker_delta.damage.saturating_add(reflected);

    let mut defender_delta = effect.defender.clone();
    defender_delta.damage = damage;

    let message = describe(attacker, defender, critical, damage, ability, &effect, reflected);

    AttackResolution {
        action: BattleAction {
            attacker: attacker.id,
            target: defender.id,
            base_damage,
            primary_damage: primary,
            bonus_damage: effect.bonus_damage,
            damage,
            critical,
            missed: false,
            ability,
            reflected,
            healed: effect.attacker.heal,
            message,
        },
        attacker: attacker_delta,
        defender: defender_delta,
    }
}

fn describe(
    attacker: &Combatant,
    defender: &Combatant,
    critical: bool,
    damage: u32,
    ability: Option<SpecialAbility>,
    effect: &AbilityEffect,
    reflected: u32,
) -> String {
    let mut message = if critical {
        format!(
            "{} lands a critical hit on {} for {damage} damage",
            attacker.name, defender.name
        )
    } else {
        format!("{} hits {} for {damage} damage", attacker.name, defender.name)
    };

    match ability {
        Some(SpecialAbility::DoubleStrike) => {
            message.push_str(&format!(" (double strike +{})", effect.bonus_damage));
        }
        Some(SpecialAbility::LifeDrain) => {
            message.push_str(&format!(", draining {} health", effect.attacker.heal));
        }
        Some(SpecialAbility::Freeze) => {
            message.push_str(&format!(", freezing {}", defender.name));
        }
        Some(SpecialAbility::Poison) => {
            message.push_str(&format!(", poisoning {}", defender.name));
        }
        Some(SpecialAbility::Curse) => {
            message.push_str(&format!(", cursing {}", defender.name));
        }
        Some(SpecialAbility::Reflect) | None => {}
    }

    if reflected > 0 {
        message.push_str(&format!("; {} reflects {reflected} damage", defender.name));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;
    use crate::state::CombatantStats;

    fn flat_tables() -> CombatTables {
        CombatTables {
            variance_min: 0,
            variance_max: 0,
            ..CombatTables::without_procs()
        }
    }

    fn hero(stats: CombatantStats) -> Combatant {
        Combatant::player("Hero", stats)
    }

    fn orc(stats: CombatantStats) -> Combatant {
        Combatant::new(CombatantId::Enemy(0), "Orc", stats)
    }

    #[test]
    fn same_stream_same_action() {
        let attacker = hero(
            CombatantStats::new(100, 30, 0)
                .with_ability(SpecialAbility::DoubleStrike)
                .with_ability(SpecialAbility::Poison),
        );
        let defender = orc(CombatantStats::new(200, 10, 8).with_ability(SpecialAbility::Reflect));
        let tables = CombatTables::default();

        let mut a = seeded_rng(99);
        let mut b = seeded_rng(99);
        for _ in 0..50 {
            let left = resolve_attack(&attacker, &defender, &tables, &mut a);
            let right = resolve_attack(&attacker, &defender, &tables, &mut b);
            assert_eq!(left, right);
        }
    }

    #[test]
    fn resolution_does_not_mutate_inputs() {
        let attacker = hero(CombatantStats::new(100, 30, 0).with_ability(SpecialAbility::Freeze));
        let defender = orc(CombatantStats::new(80, 10, 5));
        let (a, d) = (attacker.clone(), defender.clone());

        let _ = resolve_attack(&attacker, &defender, &CombatTables::default(), &mut seeded_rng(4));
        assert_eq!(attacker, a);
        assert_eq!(defender, d);
    }

    #[test]
    fn double_strike_total_is_primary_plus_seventy_percent() {
        let attacker = hero(CombatantStats::new(100, 30, 0).with_ability(SpecialAbility::DoubleStrike));
        let defender = orc(CombatantStats::new(500, 10, 5));
        let tables = CombatTables {
            special_chance: 100,
            ..CombatTables::default()
        };

        let mut rng = seeded_rng(21);
        for _ in 0..100 {
            let action = resolve_attack(&attacker, &defender, &tables, &mut rng).action;
            assert_eq!(action.ability, Some(SpecialAbility::DoubleStrike));
            assert_eq!(action.damage, action.primary_damage + action.primary_damage * 7 / 10);
            assert!(action.is_combo());
        }
    }

    #[test]
    fn certain_miss_deals_nothing_but_spends_curse() {
        let mut attacker = hero(CombatantStats::new(100, 30, 0));
        attacker.status.insert(StatusFlags::CURSED);
        let defender = orc(CombatantStats::new(80, 10, 5));
        let tables = CombatTables {
            miss_chance: 100,
            ..CombatTables::default()
        };

        let resolution = resolve_attack(&attacker, &defender, &tables, &mut seeded_rng(0));
        assert!(resolution.action.missed);
        assert_eq!(resolution.action.damage, 0);
        assert!(resolution.defender.is_empty());
        assert!(resolution.attacker.consume_curse);
    }

    #[test]
    fn curse_weakens_before_critical() {
        let mut attacker = hero(CombatantStats::new(100, 20, 0).with_crit_chance(100));
        attacker.status.insert(StatusFlags::CURSED);
        let defender = orc(CombatantStats::new(80, 10, 0));

        let action = resolve_attack(&attacker, &defender, &flat_tables(), &mut seeded_rng(0)).action;
        // 20 * 0.7 = 14, then * 1.5 = 21
        assert!(action.critical);
        assert_eq!(action.base_damage, 20);
        assert_eq!(action.damage, 21);
    }

    #[test]
    fn reflect_only_when_defender_survives() {
        let attacker = hero(CombatantStats::new(100, 20, 0).with_crit_chance(0));
        let sturdy = orc(CombatantStats::new(80, 10, 0).with_ability(SpecialAbility::Reflect));
        let resolution = resolve_attack(&attacker, &sturdy, &flat_tables(), &mut seeded_rng(0));
        assert_eq!(resolution.action.reflected, 6);
        assert_eq!(resolution.attacker.damage, 6);

        let mut frail = sturdy.clone();
        frail.set_health(20);
        let resolution = resolve_attack(&attacker, &frail, &flat_tables(), &mut seeded_rng(0));
        assert_eq!(resolution.action.reflected, 0);
        assert_eq!(resolution.attacker.damage, 0);
    }

    #[test]
    fn applying_delta_heals_before_damage() {
        let mut orc = orc(CombatantStats::new(50, 10, 0));
        orc.set_health(10);
        let applied = StatusDelta {
            heal: 5,
            damage: 12,
            freeze: true,
            ..StatusDelta::default()
        }
        .apply(&mut orc);

        assert_eq!(applied, AppliedDelta { healed: 5, lost: 12 });
        assert_eq!(orc.health(), 3);
        assert!(orc.is_frozen());

        let applied = StatusDelta {
            damage: 10,
            poison: 4,
            ..StatusDelta::default()
        }
        .apply(&mut orc);
        assert_eq!(applied.lost, 3);
        assert_eq!(orc.poison, 0);
    }

    #[test]
    fn merged_deltas_sum_damage_and_keep_strongest_poison() {
        let mut total = StatusDelta::default();
        total.merge(&StatusDelta { damage: 7, poison: 3, ..StatusDelta::default() });
        total.merge(&StatusDelta { damage: 5, poison: 9, curse: true, ..StatusDelta::default() });
        assert_eq!(total.damage, 12);
        assert_eq!(total.poison, 9);
        assert!(total.curse);
    }
}
