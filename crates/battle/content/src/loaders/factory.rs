//! Content factory for building battle inputs from a data directory.

use std::path::{Path, PathBuf};

use battle_core::MonsterCatalog;

use crate::loaders::{BalanceTables, LoadResult, MonsterLoader, PlanLoader, PlayerLoader, TablesLoader};
use crate::{PlanDefinition, PlayerProfile};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── tables.toml      (optional)
/// ├── monsters.ron
/// ├── player.ron
/// └── plans/
///     ├── meadow.ron
///     └── crypt.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat tables from `tables.toml`, or defaults if the file is absent.
    pub fn load_tables(&self) -> LoadResult<BalanceTables> {
        let path = self.data_dir.join("tables.toml");
        if !path.exists() {
            tracing::debug!(target: "battle::content", path = %path.display(), "No tables file; using defaults");
            return Ok(BalanceTables::default());
        }
        TablesLoader::load(&path)
    }

    /// Load the monster catalog from `monsters.ron`.
    pub fn load_monsters(&self) -> LoadResult<MonsterCatalog> {
        MonsterLoader::load(&self.data_dir.join("monsters.ron"))
    }

    /// Load the player profile from `player.ron`.
    pub fn load_player(&self) -> LoadResult<PlayerProfile> {
        PlayerLoader::load(&self.data_dir.join("player.ron"))
    }

    /// Load a plan from `plans/{plan_name}.ron`.
    pub fn load_plan(&self, plan_name: &str) -> LoadResult<PlanDefinition> {
        let path = self.data_dir.join("plans").join(format!("{}.ron", plan_name));
        PlanLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
