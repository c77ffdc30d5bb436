//! Special-ability effects.

use crate::config::CombatTables;
use crate::state::{Combatant, SpecialAbility};

use super::result::StatusDelta;

/// Extra damage and status changes produced by a triggered ability.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AbilityEffect {
    /// Second damage instance added to the same action.
    pub bonus_damage: u32,
    pub attacker: StatusDelta,
    pub defender: StatusDelta,
}

/// Computes the effect of `ability` for a hit that dealt `primary` damage.
///
/// Life drain is capped by the attacker's missing health so the reported heal
/// matches what is applied.
pub fn trigger_ability(
    ability: SpecialAbility,
    attacker: &Combatant,
    primary: u32,
    tables: &CombatTables,
) -> AbilityEffect {
    let mut effect = AbilityEffect::default();
    match ability {
        SpecialAbility::DoubleStrike => {
            effect.bonus_damage = ratio(primary, tables.double_strike_ratio);
        }
        SpecialAbility::LifeDrain => {
            let missing = attacker.max_health().saturating_sub(attacker.health());
            effect.attacker.heal = ratio(primary, tables.life_drain_ratio).min(missing);
        }
        SpecialAbility::Freeze => {
            effect.defender.freeze = true;
        }
        SpecialAbility::Poison => {
            effect.defender.poison = ratio(attacker.stats.attack, tables.poison_ratio);
        }
        SpecialAbility::Curse => {
            effect.defender.curse = true;
        }
        SpecialAbility::Reflect => {
            // Passive; resolved from the defender's side.
        }
    }
    effect
}

/// Integer percentage of `value`, rounded down.
#[inline]
pub(crate) fn ratio(value: u32, percent: u32) -> u32 {
    (u64::from(value) * u64::from(percent) / 100) as u32
}
