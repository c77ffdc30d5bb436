//! Damage and effect resolution.
//!
//! This module provides pure functions for resolving a single attack. Given
//! attacker/defender snapshots, the combat tables and an RNG stream, the
//! resolver returns a [`BattleAction`] plus the status deltas to apply. It
//! never mutates its inputs.
//!
//! # Core Functions
//!
//! - `resolve_attack`: complete attack resolution (miss, damage, crit, abilities)
//! - `roll_base_damage` / `mitigate`: damage formula pieces
//! - `trigger_ability`: special-ability effects for a landed hit

pub mod ability;
pub mod damage;
pub mod result;

pub use ability::trigger_ability;
pub use damage::{apply_critical, apply_curse, mitigate, roll_base_damage};
pub use result::{AttackResolution, BattleAction, StatusDelta, resolve_attack};
