//! Player profile loader.

use std::path::Path;

use crate::PlayerProfile;
use crate::loaders::{LoadResult, read_file};

/// Loader for the player profile from RON files.
pub struct PlayerLoader;

impl PlayerLoader {
    pub fn load(path: &Path) -> LoadResult<PlayerProfile> {
        let content = read_file(path)?;
        let profile: PlayerProfile = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse player profile RON: {}", e))?;

        if profile.stats.max_health == 0 || profile.stats.health == 0 {
            anyhow::bail!("Player profile '{}' has no health", profile.name);
        }
        Ok(profile)
    }
}
