//! Damage calculation.
//!
//! # Formula
//!
//! ```text
//! base     = max(1, attack + uniform(variance_min..=variance_max))
//! primary  = max(min_damage, base - defense / defense_divisor)
//! if cursed:   primary = max(1, primary * (100 - curse_penalty) / 100)
//! if critical: primary = primary * crit_multiplier / 100
//! ```
//!
//! The same formula applies to player and monster attacks.

use rand::Rng;

use crate::config::CombatTables;

/// Rolls raw damage before defense: attack plus variance, floored at 1.
pub fn roll_base_damage<R: Rng + ?Sized>(attack: u32, tables: &CombatTables, rng: &mut R) -> u32 {
    let (lo, hi) = if tables.variance_min <= tables.variance_max {
        (tables.variance_min, tables.variance_max)
    } else {
        (tables.variance_max, tables.variance_min)
    };
    let variance = rng.gen_range(lo..=hi);
    let raw = i64::from(attack) + i64::from(variance);
    raw.clamp(1, i64::from(u32::MAX)) as u32
}

/// Reduces raw damage by the defender's defense.
pub fn mitigate(base: u32, defense: u32, tables: &CombatTables) -> u32 {
    let reduction = defense / tables.defense_divisor.max(1);
    base.saturating_sub(reduction).max(tables.min_damage.max(1))
}

/// Weakens outgoing damage of a cursed attacker.
pub fn apply_curse(damage: u32, tables: &CombatTables) -> u32 {
    let keep = 100u32.saturating_sub(tables.curse_penalty);
    (u64::from(damage) * u64::from(keep) / 100).max(1) as u32
}

/// Multiplies damage for a critical hit.
pub fn apply_critical(damage: u32, tables: &CombatTables) -> u32 {
    (u64::from(damage) * u64::from(tables.crit_multiplier) / 100).max(1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded_rng;

    #[test]
    fn base_damage_stays_in_variance_band() {
        let tables = CombatTables::default();
        let mut rng = seeded_rng(11);
        for _ in 0..500 {
            let base = roll_base_damage(30, &tables, &mut rng);
            assert!((25..=39).contains(&base), "base {base} outside band");
        }
    }

    #[test]
    fn weak_attacks_floor_at_one() {
        let tables = CombatTables::default();
        let mut rng = seeded_rng(5);
        for _ in 0..200 {
            assert!(roll_base_damage(0, &tables, &mut rng) >= 1);
        }
        assert_eq!(mitigate(3, 50, &tables), 1);
    }

    #[test]
    fn defense_is_halved_before_subtraction() {
        let tables = CombatTables::default();
        assert_eq!(mitigate(30, 10, &tables), 25);
        assert_eq!(mitigate(30, 11, &tables), 25);
        assert_eq!(mitigate(30, 0, &tables), 30);
    }

    #[test]
    fn curse_and_critical_multipliers() {
        let tables = CombatTables::default();
        assert_eq!(apply_curse(20, &tables), 14);
        assert_eq!(apply_curse(1, &tables), 1);
        assert_eq!(apply_critical(20, &tables), 30);
        assert_eq!(apply_critical(apply_curse(20, &tables), &tables), 21);
    }
}
