/// Balance parameters consumed by the attack resolver.
///
/// All ratios and chances are integer percentages so resolution stays exact
/// and replayable. The defaults form the canonical probability table used for
/// both the player and monsters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatTables {
    /// Lower bound of the additive damage variance roll.
    pub variance_min: i32,
    /// Upper bound (inclusive) of the additive damage variance roll.
    pub variance_max: i32,
    /// Defense is divided by this before being subtracted from damage.
    pub defense_divisor: u32,
    /// Damage floor after defense; keeps every battle finite.
    pub min_damage: u32,
    /// Chance that an attack misses outright.
    pub miss_chance: u8,
    /// Damage multiplier applied on a critical hit.
    pub crit_multiplier: u32,
    /// Chance that an attacker with offensive abilities triggers one.
    pub special_chance: u8,
    /// Outgoing damage reduction while cursed.
    pub curse_penalty: u32,
    /// Second strike damage relative to the primary hit.
    pub double_strike_ratio: u32,
    /// Healing relative to damage dealt.
    pub life_drain_ratio: u32,
    /// Initial poison stacks relative to the attacker's attack stat.
    pub poison_ratio: u32,
    /// Stacks lost after each poison application.
    pub poison_decay: u32,
    /// Damage reflected back relative to the hit taken.
    pub reflect_ratio: u32,
}

impl CombatTables {
    pub const DEFAULT_VARIANCE_MIN: i32 = -5;
    pub const DEFAULT_VARIANCE_MAX: i32 = 9;
    pub const DEFAULT_DEFENSE_DIVISOR: u32 = 2;
    pub const DEFAULT_CRIT_MULTIPLIER: u32 = 150;
    pub const DEFAULT_SPECIAL_CHANCE: u8 = 30;

    pub fn new() -> Self {
        Self {
            variance_min: Self::DEFAULT_VARIANCE_MIN,
            variance_max: Self::DEFAULT_VARIANCE_MAX,
            defense_divisor: Self::DEFAULT_DEFENSE_DIVISOR,
            min_damage: 1,
            miss_chance: 0,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            special_chance: Self::DEFAULT_SPECIAL_CHANCE,
            curse_penalty: 30,
            double_strike_ratio: 70,
            life_drain_ratio: 50,
            poison_ratio: 50,
            poison_decay: 2,
            reflect_ratio: 30,
        }
    }

    /// Tables with misses and special abilities disabled.
    ///
    /// Crits still follow each combatant's `crit_chance`.
    pub fn without_procs() -> Self {
        Self {
            miss_chance: 0,
            special_chance: 0,
            ..Self::new()
        }
    }
}

impl Default for CombatTables {
    fn default() -> Self {
        Self::new()
    }
}
