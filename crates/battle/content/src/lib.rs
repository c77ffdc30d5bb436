//! Data-driven battle content and loaders.
//!
//! This crate turns RON/TOML data files into the values battle-core consumes:
//! - Monster catalogs (RON)
//! - Run plans: stages, dungeons and infinite towers, with objectives (RON)
//! - Player profiles (RON)
//! - Combat tables and cadence (TOML)
//!
//! Content never appears in battle state directly; the runtime hands it to the
//! orchestrator through [`battle_core::MonsterOracle`] and plain values.

pub mod profile;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use profile::{PlanDefinition, PlayerProfile};

#[cfg(feature = "loaders")]
pub use loaders::{
    BalanceTables, ContentFactory, MonsterLoader, PlanLoader, PlayerLoader, TablesLoader,
};
