use std::fmt;

use bitflags::bitflags;

/// Identity of a participant within one encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantId {
    Player,
    /// Enemy slot index within the encounter (0-based).
    Enemy(u8),
}

impl CombatantId {
    #[inline]
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player)
    }

    /// Enemy slot index, if this id refers to an enemy.
    #[inline]
    pub const fn enemy_index(self) -> Option<usize> {
        match self {
            Self::Player => None,
            Self::Enemy(index) => Some(index as usize),
        }
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Enemy(index) => write!(f, "enemy-{index}"),
        }
    }
}

/// Secondary effects that may trigger alongside a normal attack.
///
/// Tunable ratios live in [`crate::CombatTables`]; every consumer matches
/// exhaustively so a new ability is compiler-checked everywhere it matters.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SpecialAbility {
    /// Adds a second, smaller damage instance to the same action.
    DoubleStrike,
    /// Heals the attacker by a share of the damage dealt.
    LifeDrain,
    /// Defender skips its next turn.
    Freeze,
    /// Defender accrues damage over time that decays each application.
    Poison,
    /// Defender's next outgoing attack is weakened.
    Curse,
    /// Passive: reflects part of a survived hit back to the attacker.
    Reflect,
}

impl SpecialAbility {
    /// Passive abilities never trigger from the attacker's special roll.
    #[inline]
    pub const fn is_passive(self) -> bool {
        matches!(self, Self::Reflect)
    }
}

bitflags! {
    /// Transient status conditions carried by a combatant.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct StatusFlags: u8 {
        /// Skips the next turn, then clears.
        const FROZEN = 1 << 0;
        /// Next outgoing attack deals reduced damage, then clears.
        const CURSED = 1 << 1;
    }
}

/// Immutable stat snapshot captured when an encounter starts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantStats {
    #[cfg_attr(feature = "serde", serde(default = "default_level"))]
    pub level: u32,
    /// Health at encounter start.
    pub health: u32,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    /// Relative turn-frequency multiplier in percent (100 = 1.0x).
    #[cfg_attr(feature = "serde", serde(default = "default_speed"))]
    pub speed: u32,
    /// Critical hit chance in percent.
    #[cfg_attr(feature = "serde", serde(default = "default_crit_chance"))]
    pub crit_chance: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<SpecialAbility>,
}

#[cfg(feature = "serde")]
fn default_level() -> u32 {
    1
}

#[cfg(feature = "serde")]
fn default_speed() -> u32 {
    CombatantStats::BASE_SPEED
}

#[cfg(feature = "serde")]
fn default_crit_chance() -> u8 {
    CombatantStats::DEFAULT_CRIT_CHANCE
}

impl CombatantStats {
    pub const BASE_SPEED: u32 = 100;
    pub const DEFAULT_CRIT_CHANCE: u8 = 15;

    /// Full-health stats with baseline speed, default crit chance and no abilities.
    pub fn new(max_health: u32, attack: u32, defense: u32) -> Self {
        Self {
            level: 1,
            health: max_health,
            max_health,
            attack,
            defense,
            speed: Self::BASE_SPEED,
            crit_chance: Self::DEFAULT_CRIT_CHANCE,
            abilities: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_crit_chance(mut self, crit_chance: u8) -> Self {
        self.crit_chance = crit_chance;
        self
    }

    pub fn with_ability(mut self, ability: SpecialAbility) -> Self {
        if !self.abilities.contains(&ability) {
            self.abilities.push(ability);
        }
        self
    }

    pub fn has_ability(&self, ability: SpecialAbility) -> bool {
        self.abilities.contains(&ability)
    }

    /// Abilities eligible for the attacker's special roll, in declaration order.
    pub fn offensive_abilities(&self) -> impl Iterator<Item = SpecialAbility> + '_ {
        self.abilities.iter().copied().filter(|a| !a.is_passive())
    }

    /// Scales health, attack and defense by `percent` (100 = unchanged).
    ///
    /// Scaled values never drop below 1 health / 0 attack so a scaled monster
    /// always remains a valid combatant.
    pub fn scaled(&self, percent: u32) -> Self {
        let scale = |value: u32| (u64::from(value) * u64::from(percent) / 100) as u32;
        let max_health = scale(self.max_health).max(1);
        Self {
            level: self.level,
            health: scale(self.health).clamp(1, max_health),
            max_health,
            attack: scale(self.attack),
            defense: scale(self.defense),
            speed: self.speed,
            crit_chance: self.crit_chance,
            abilities: self.abilities.clone(),
        }
    }
}

/// Rewards announced in the battle log when an enemy falls.
///
/// The engine only reports bounties; granting them is up to the reward
/// collaborator consuming the run result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Bounty {
    pub gold: u32,
    pub drops: Vec<String>,
    /// Chance in percent that one item from `drops` is found.
    pub drop_chance: u8,
}

/// A participant in one encounter: base stats plus mutable health and status.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "CombatantRecord"))]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    /// Catalog id of the monster template this combatant was spawned from.
    pub template: Option<String>,
    /// Set on the encounter's boss slot only; other spawns of the same
    /// template stay ordinary monsters.
    pub boss: bool,
    pub stats: CombatantStats,
    pub bounty: Bounty,
    health: u32,
    pub status: StatusFlags,
    /// Remaining poison stacks; each application deals this much damage.
    pub poison: u32,
}

/// Wire shape of [`Combatant`]; health is clamped on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct CombatantRecord {
    id: CombatantId,
    name: String,
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    boss: bool,
    stats: CombatantStats,
    #[serde(default)]
    bounty: Bounty,
    health: u32,
    #[serde(default)]
    status: StatusFlags,
    #[serde(default)]
    poison: u32,
}

#[cfg(feature = "serde")]
impl From<CombatantRecord> for Combatant {
    fn from(record: CombatantRecord) -> Self {
        let mut combatant = Self::new(record.id, record.name, record.stats);
        combatant.template = record.template;
        combatant.boss = record.boss;
        combatant.bounty = record.bounty;
        combatant.status = record.status;
        combatant.poison = record.poison;
        combatant.set_health(record.health);
        combatant
    }
}

impl Combatant {
    pub fn new(id: CombatantId, name: impl Into<String>, stats: CombatantStats) -> Self {
        let health = stats.health.min(stats.max_health);
        Self {
            id,
            name: name.into(),
            template: None,
            boss: false,
            stats,
            bounty: Bounty::default(),
            health,
            status: StatusFlags::empty(),
            poison: 0,
        }
    }

    pub fn player(name: impl Into<String>, stats: CombatantStats) -> Self {
        Self::new(CombatantId::Player, name, stats)
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn as_boss(mut self) -> Self {
        self.boss = true;
        self
    }

    pub fn with_bounty(mut self, bounty: Bounty) -> Self {
        self.bounty = bounty;
        self
    }

    #[inline]
    pub fn health(&self) -> u32 {
        self.health
    }

    #[inline]
    pub fn max_health(&self) -> u32 {
        self.stats.max_health
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.status.contains(StatusFlags::FROZEN)
    }

    #[inline]
    pub fn is_cursed(&self) -> bool {
        self.status.contains(StatusFlags::CURSED)
    }

    /// Sets health directly, clamped to `[0, max_health]`.
    pub fn set_health(&mut self, health: u32) {
        if health > self.stats.max_health {
            tracing::debug!(
                target: "battle::state",
                combatant = %self.id,
                requested = health,
                max = self.stats.max_health,
                "Clamping health to maximum"
            );
        }
        self.health = health.min(self.stats.max_health);
    }

    /// Removes health and returns the amount actually lost.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.health);
        self.health -= lost;
        lost
    }

    /// Restores health up to the maximum and returns the amount gained.
    ///
    /// Defeated combatants cannot be healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let gained = amount.min(self.stats.max_health - self.health.min(self.stats.max_health));
        self.health += gained;
        gained
    }

    /// Applies poison stacks, keeping the stronger of the existing and new stacks.
    pub fn apply_poison(&mut self, stacks: u32) {
        self.poison = self.poison.max(stacks);
    }

    /// Deals one poison application and decays the stacks.
    ///
    /// Returns the health actually lost.
    pub fn tick_poison(&mut self, decay: u32) -> u32 {
        if self.poison == 0 {
            return 0;
        }
        let damage = self.poison;
        self.poison = self.poison.saturating_sub(decay);
        self.apply_damage(damage)
    }

    /// Clears the frozen flag and reports whether it was set.
    pub fn take_frozen(&mut self) -> bool {
        let frozen = self.is_frozen();
        self.status.remove(StatusFlags::FROZEN);
        frozen
    }

    /// Drops transient status so the combatant can enter a fresh encounter.
    pub fn clear_status(&mut self) {
        self.status = StatusFlags::empty();
        self.poison = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_render_as_player_and_enemy_index() {
        assert_eq!(CombatantId::Player.to_string(), "player");
        assert_eq!(CombatantId::Enemy(2).to_string(), "enemy-2");
    }

    #[test]
    fn damage_and_heal_stay_within_bounds() {
        let mut hero = Combatant::player("Hero", CombatantStats::new(50, 10, 0));

        assert_eq!(hero.apply_damage(80), 50);
        assert_eq!(hero.health(), 0);
        assert!(!hero.is_alive());

        // Dead combatants stay dead.
        assert_eq!(hero.heal(20), 0);

        hero.set_health(500);
        assert_eq!(hero.health(), 50);

        hero.set_health(45);
        assert_eq!(hero.heal(20), 5);
        assert_eq!(hero.health(), 50);
    }

    #[test]
    fn poison_decays_until_exhausted() {
        let mut slime = Combatant::new(CombatantId::Enemy(0), "Slime", CombatantStats::new(1_000, 1, 0));
        slime.apply_poison(7);

        let ticks: Vec<u32> = (0..6).map(|_| slime.tick_poison(2)).collect();
        assert_eq!(ticks, vec![7, 5, 3, 1, 0, 0]);
        assert_eq!(slime.poison, 0);
    }

    #[test]
    fn stronger_poison_replaces_weaker() {
        let mut slime = Combatant::new(CombatantId::Enemy(0), "Slime", CombatantStats::new(100, 1, 0));
        slime.apply_poison(4);
        slime.apply_poison(9);
        slime.apply_poison(3);
        assert_eq!(slime.poison, 9);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialized_health_is_clamped() {
        let hero = Combatant::player("Hero", CombatantStats::new(50, 10, 0));
        let mut json = serde_json::to_value(&hero).unwrap();
        json["health"] = serde_json::json!(9_999);

        let loaded: Combatant = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.health(), 50);
        assert_eq!(loaded.max_health(), 50);
        assert!(!loaded.boss);

        let mut wounded = hero.as_boss();
        wounded.set_health(12);
        let text = serde_json::to_string(&wounded).unwrap();
        assert_eq!(serde_json::from_str::<Combatant>(&text).unwrap(), wounded);
    }

    #[test]
    fn scaling_keeps_monster_valid() {
        let stats = CombatantStats::new(80, 10, 5).with_ability(SpecialAbility::Curse);
        let scaled = stats.scaled(150);
        assert_eq!(scaled.max_health, 120);
        assert_eq!(scaled.health, 120);
        assert_eq!(scaled.attack, 15);
        assert_eq!(scaled.defense, 7);
        assert!(scaled.has_ability(SpecialAbility::Curse));

        let tiny = CombatantStats::new(1, 1, 0).scaled(10);
        assert_eq!(tiny.max_health, 1);
        assert_eq!(tiny.health, 1);
    }

    #[test]
    fn reflect_is_not_offensive() {
        let stats = CombatantStats::new(10, 1, 0)
            .with_ability(SpecialAbility::Reflect)
            .with_ability(SpecialAbility::Freeze);
        let offensive: Vec<_> = stats.offensive_abilities().collect();
        assert_eq!(offensive, vec![SpecialAbility::Freeze]);
    }
}
