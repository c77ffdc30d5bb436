//! Deterministic random number source for battle resolution.
//!
//! Every random decision in a run (damage variance, crits, ability triggers,
//! target selection, encounter composition, drops) draws from one seeded
//! stream, so replaying a run with the same seed reproduces it exactly.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// RNG used by runs. Xoshiro output is fixed by its algorithm, not by the
/// `rand` release, so recorded seeds stay valid.
pub type BattleRng = Xoshiro256PlusPlus;

/// Creates the battle RNG for a run seed.
pub fn seeded_rng(seed: u64) -> BattleRng {
    BattleRng::seed_from_u64(seed)
}

/// Rolls a percentage check: `true` with probability `chance / 100`.
///
/// Always consumes exactly one draw so roll order stays stable regardless of
/// the chance value.
pub fn roll_percent<R: Rng + ?Sized>(rng: &mut R, chance: u8) -> bool {
    rng.gen_range(0..100u8) < chance
}

/// Picks an index in `0..len`; a single candidate is chosen without a draw.
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    match len {
        0 => None,
        1 => Some(0),
        _ => Some(rng.gen_range(0..len)),
    }
}
