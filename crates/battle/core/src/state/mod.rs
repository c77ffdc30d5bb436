//! Authoritative battle state representation.
//!
//! [`BattleState`] is the aggregate root for one encounter. The runtime holds
//! the current snapshot and replaces it wholesale with the snapshot returned
//! by [`crate::BattleEngine::advance`]; UI collaborators only ever see clones.
mod combatant;
mod log;

use arrayvec::ArrayVec;

pub use combatant::{Bounty, Combatant, CombatantId, CombatantStats, SpecialAbility, StatusFlags};
pub use log::{BattleLogEntry, LogEvent, LogKind};

use crate::error::{ConfigError, InvalidSpeed};

/// Maximum number of simultaneous enemies in one encounter.
pub const MAX_ENEMIES: usize = 3;

/// Terminal flag of an encounter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    #[default]
    Active,
    Victory,
    Defeat,
}

impl BattleOutcome {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// User-selectable pacing multiplier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum BattleSpeed {
    #[default]
    Normal,
    Fast,
    Faster,
}

impl BattleSpeed {
    pub const ALL: [Self; 3] = [Self::Normal, Self::Fast, Self::Faster];

    #[inline]
    pub const fn multiplier(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::Fast => 2,
            Self::Faster => 3,
        }
    }
}

impl TryFrom<u8> for BattleSpeed {
    type Error = InvalidSpeed;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Normal),
            2 => Ok(Self::Fast),
            3 => Ok(Self::Faster),
            other => Err(InvalidSpeed(other)),
        }
    }
}

impl From<BattleSpeed> for u8 {
    fn from(speed: BattleSpeed) -> Self {
        speed.multiplier()
    }
}

/// Canonical snapshot of one encounter: one player against up to
/// [`MAX_ENEMIES`] enemies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub player: Combatant,
    /// Defeated enemies stay here (health 0) so the UI can render them.
    pub enemies: ArrayVec<Combatant, MAX_ENEMIES>,
    pub log: Vec<BattleLogEntry>,
    pub speed: BattleSpeed,
    pub paused: bool,
    pub outcome: BattleOutcome,
    /// Number of resolved ticks.
    pub tick: u64,
    /// Battle clock at 1x speed, in milliseconds.
    pub clock_ms: u64,
    next_seq: u64,
}

impl BattleState {
    /// Creates a fresh encounter, assigning enemy ids by slot.
    ///
    /// Fails if the encounter has no enemies, more than [`MAX_ENEMIES`], or
    /// a player that is already defeated.
    pub fn new(
        player: Combatant,
        enemies: impl IntoIterator<Item = Combatant>,
    ) -> Result<Self, ConfigError> {
        if !player.is_alive() {
            return Err(ConfigError::InvalidPlayer("player starts with zero health".into()));
        }

        let enemies: Vec<Combatant> = enemies.into_iter().collect();
        if enemies.is_empty() || enemies.len() > MAX_ENEMIES {
            return Err(ConfigError::InvalidEnemyCount {
                plan: "encounter".into(),
                index: 0,
                count: enemies.len(),
            });
        }

        let enemies = enemies
            .into_iter()
            .enumerate()
            .map(|(slot, mut enemy)| {
                enemy.id = CombatantId::Enemy(slot as u8);
                enemy
            })
            .collect();

        let mut player = player;
        player.id = CombatantId::Player;

        Ok(Self {
            player,
            enemies,
            log: Vec::new(),
            speed: BattleSpeed::default(),
            paused: false,
            outcome: BattleOutcome::Active,
            tick: 0,
            clock_ms: 0,
            next_seq: 0,
        })
    }

    pub fn with_speed(mut self, speed: BattleSpeed) -> Self {
        self.speed = speed;
        self
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        match id.enemy_index() {
            None => Some(&self.player),
            Some(index) => self.enemies.get(index),
        }
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        match id.enemy_index() {
            None => Some(&mut self.player),
            Some(index) => self.enemies.get_mut(index),
        }
    }

    /// Iterates enemies that can still act and be targeted.
    pub fn living_enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.enemies.iter().filter(|e| e.is_alive())
    }

    pub fn living_enemy_ids(&self) -> Vec<CombatantId> {
        self.living_enemies().map(|e| e.id).collect()
    }

    pub fn all_enemies_defeated(&self) -> bool {
        self.living_enemies().next().is_none()
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Appends a log entry stamped with the next sequence number.
    pub fn push_log(&mut self, event: LogEvent, message: impl Into<String>) -> &BattleLogEntry {
        let entry = BattleLogEntry {
            seq: self.next_seq,
            tick: self.tick,
            clock_ms: self.clock_ms,
            kind: event.kind(),
            event,
            message: message.into(),
        };
        self.next_seq += 1;
        self.log.push(entry);
        &self.log[self.log.len() - 1]
    }

    /// Log entries appended after the entry with sequence number `seq`.
    pub fn entries_since(&self, seq: Option<u64>) -> &[BattleLogEntry] {
        let start = match seq {
            None => 0,
            Some(seq) => self.log.partition_point(|entry| entry.seq <= seq),
        };
        &self.log[start..]
    }

    /// Sequence number of the newest log entry.
    pub fn last_seq(&self) -> Option<u64> {
        self.log.last().map(|entry| entry.seq)
    }
}
