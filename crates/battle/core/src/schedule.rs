//! Turn cadence: who acts on a tick and how long to wait before it.
//!
//! The scheduler decides *when* the next tick happens, never *what* happens
//! on it. Waits depend on the average speed of the side about to be struck
//! and on the user's speed multiplier.

use std::time::Duration;

use crate::state::{BattleSpeed, BattleState, CombatantStats};

/// Side acting on a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TickRole {
    /// Odd ticks: the player attacks one enemy.
    Player,
    /// Even ticks: every living enemy attacks the player.
    Enemies,
}

impl TickRole {
    #[inline]
    pub const fn for_tick(tick: u64) -> Self {
        if tick % 2 == 1 {
            Self::Player
        } else {
            Self::Enemies
        }
    }
}

/// Wait-time parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Cadence {
    /// Wait at 1x speed against a side of baseline speed.
    pub base_interval_ms: u64,
    /// Floor applied after speed scaling.
    pub min_interval_ms: u64,
}

impl Cadence {
    pub const DEFAULT_BASE_INTERVAL_MS: u64 = 2_000;
    pub const DEFAULT_MIN_INTERVAL_MS: u64 = 100;

    pub fn new(base_interval_ms: u64, min_interval_ms: u64) -> Self {
        Self {
            base_interval_ms,
            min_interval_ms,
        }
    }

    /// `base * 100 / avg_speed / multiplier`, floored at `min_interval_ms`.
    pub fn interval_ms(&self, avg_speed: u32, speed: BattleSpeed) -> u64 {
        let avg_speed = u64::from(avg_speed.max(1));
        let multiplier = u64::from(speed.multiplier());
        let scaled = self.base_interval_ms.saturating_mul(100) / avg_speed / multiplier;
        scaled.max(self.min_interval_ms)
    }

    /// Average speed of the living side struck on `role`'s tick.
    ///
    /// Falls back to baseline speed when that side has nobody standing.
    pub fn opposing_speed(state: &BattleState, role: TickRole) -> u32 {
        let (sum, count) = match role {
            TickRole::Player => state
                .living_enemies()
                .fold((0u64, 0u64), |(sum, n), e| (sum + u64::from(e.stats.speed), n + 1)),
            TickRole::Enemies if state.player.is_alive() => (u64::from(state.player.stats.speed), 1),
            TickRole::Enemies => (0, 0),
        };
        if count == 0 {
            CombatantStats::BASE_SPEED
        } else {
            (sum / count) as u32
        }
    }

    /// Wait before the tick following `state.tick`, at the given speed.
    pub fn next_wait_ms(&self, state: &BattleState, speed: BattleSpeed) -> u64 {
        let role = TickRole::for_tick(state.tick + 1);
        self.interval_ms(Self::opposing_speed(state, role), speed)
    }

    pub fn next_wait(&self, state: &BattleState, speed: BattleSpeed) -> Duration {
        Duration::from_millis(self.next_wait_ms(state, speed))
    }

    /// Scaled inter-encounter delay.
    pub fn transition_delay(delay_ms: u64, speed: BattleSpeed) -> Duration {
        Duration::from_millis(delay_ms / u64::from(speed.multiplier()))
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_INTERVAL_MS, Self::DEFAULT_MIN_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Combatant, CombatantId};

    #[test]
    fn parity_alternates_roles() {
        assert_eq!(TickRole::for_tick(1), TickRole::Player);
        assert_eq!(TickRole::for_tick(2), TickRole::Enemies);
        assert_eq!(TickRole::for_tick(3), TickRole::Player);
    }

    #[test]
    fn faster_speed_never_waits_longer() {
        let cadence = Cadence::default();
        for avg_speed in [1, 50, 100, 150, 400, 5_000, 100_000] {
            let waits: Vec<u64> = BattleSpeed::ALL
                .iter()
                .map(|&speed| cadence.interval_ms(avg_speed, speed))
                .collect();
            assert!(waits.windows(2).all(|w| w[1] < w[0] || w[1] == cadence.min_interval_ms));
            assert!(waits.iter().all(|&w| w >= cadence.min_interval_ms));
        }
    }

    #[test]
    fn baseline_intervals() {
        let cadence = Cadence::default();
        assert_eq!(cadence.interval_ms(100, BattleSpeed::Normal), 2_000);
        assert_eq!(cadence.interval_ms(100, BattleSpeed::Fast), 1_000);
        assert_eq!(cadence.interval_ms(200, BattleSpeed::Faster), 333);
        assert_eq!(cadence.interval_ms(10_000, BattleSpeed::Normal), 100);
    }

    #[test]
    fn opposing_speed_averages_living_enemies() {
        let player = Combatant::player("Hero", CombatantStats::new(100, 10, 0).with_speed(120));
        let fast = Combatant::new(CombatantId::Enemy(0), "Wolf", CombatantStats::new(20, 5, 0).with_speed(150));
        let slow = Combatant::new(CombatantId::Enemy(0), "Slime", CombatantStats::new(20, 5, 0).with_speed(50));
        let mut state = BattleState::new(player, [fast, slow.clone(), slow]).unwrap();

        assert_eq!(Cadence::opposing_speed(&state, TickRole::Player), 83);
        assert_eq!(Cadence::opposing_speed(&state, TickRole::Enemies), 120);

        state.enemies[1].set_health(0);
        state.enemies[2].set_health(0);
        assert_eq!(Cadence::opposing_speed(&state, TickRole::Player), 150);
    }

    #[test]
    fn transition_delay_scales_with_speed() {
        assert_eq!(Cadence::transition_delay(1_500, BattleSpeed::Normal), Duration::from_millis(1_500));
        assert_eq!(Cadence::transition_delay(1_500, BattleSpeed::Faster), Duration::from_millis(500));
    }
}
