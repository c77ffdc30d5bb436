//! Client configuration read from the environment.
use std::env;
use std::path::PathBuf;

use battle_core::{BattleSpeed, Cadence};
use battle_runtime::RuntimeConfig;

/// Headless client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Directory holding `monsters.ron`, `player.ron`, `tables.toml` and `plans/`.
    pub content_dir: PathBuf,
    /// Plan file name under `plans/`, without extension.
    pub plan: String,
    pub seed: Option<u64>,
    pub speed: BattleSpeed,
    pub base_interval_ms: Option<u64>,
    pub transition_delay_ms: Option<u64>,
    pub carry_player_health: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data")),
            plan: "meadow".to_string(),
            seed: None,
            speed: BattleSpeed::Normal,
            base_interval_ms: None,
            transition_delay_ms: None,
            carry_player_health: true,
        }
    }
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_CONTENT_DIR` - Content directory (default: bundled `data/`)
    /// - `BATTLE_PLAN` - Plan name (default: `meadow`)
    /// - `BATTLE_SEED` - Run seed (default: random)
    /// - `BATTLE_SPEED` - Initial speed 1, 2 or 3 (default: 1)
    /// - `BATTLE_BASE_INTERVAL_MS` - Overrides the tick interval from `tables.toml`
    /// - `BATTLE_TRANSITION_DELAY_MS` - Pause between encounters
    /// - `BATTLE_CARRY_HEALTH` - `false` restores the player between encounters
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("BATTLE_CONTENT_DIR") {
            config.content_dir = PathBuf::from(dir);
        }
        if let Some(plan) = lookup("BATTLE_PLAN").filter(|plan| !plan.is_empty()) {
            config.plan = plan;
        }
        config.seed = read_env(&lookup, "BATTLE_SEED");
        if let Some(speed) = read_env::<u8>(&lookup, "BATTLE_SPEED") {
            match BattleSpeed::try_from(speed) {
                Ok(speed) => config.speed = speed,
                Err(error) => tracing::warn!("Ignoring BATTLE_SPEED: {}", error),
            }
        }
        config.base_interval_ms = read_env(&lookup, "BATTLE_BASE_INTERVAL_MS");
        config.transition_delay_ms = read_env(&lookup, "BATTLE_TRANSITION_DELAY_MS");
        if let Some(carry) = read_env(&lookup, "BATTLE_CARRY_HEALTH") {
            config.carry_player_health = carry;
        }

        config
    }

    /// Runtime configuration with `cadence` loaded from content.
    pub fn runtime_config(&self, mut cadence: Cadence) -> RuntimeConfig {
        if let Some(base) = self.base_interval_ms {
            cadence.base_interval_ms = base.max(cadence.min_interval_ms);
        }

        let defaults = RuntimeConfig::default();
        RuntimeConfig {
            cadence,
            initial_speed: self.speed,
            seed: self.seed,
            transition_delay_ms: self.transition_delay_ms.unwrap_or(defaults.transition_delay_ms),
            carry_player_health: self.carry_player_health,
            ..defaults
        }
    }
}

fn read_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_bundled_content() {
        let config = config(&[]);
        assert_eq!(config, ClientConfig::default());
        assert!(config.content_dir.ends_with("data"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config(&[
            ("BATTLE_PLAN", "crypt"),
            ("BATTLE_SEED", "99"),
            ("BATTLE_SPEED", "3"),
            ("BATTLE_BASE_INTERVAL_MS", "500"),
            ("BATTLE_CARRY_HEALTH", "false"),
        ]);
        assert_eq!(config.plan, "crypt");
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.speed, BattleSpeed::Faster);
        assert!(!config.carry_player_health);

        let runtime = config.runtime_config(Cadence::default());
        assert_eq!(runtime.cadence.base_interval_ms, 500);
        assert_eq!(runtime.initial_speed, BattleSpeed::Faster);
        assert_eq!(runtime.seed, Some(99));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config(&[("BATTLE_SPEED", "4"), ("BATTLE_SEED", "soon"), ("BATTLE_PLAN", "")]);
        assert_eq!(config.speed, BattleSpeed::Normal);
        assert_eq!(config.seed, None);
        assert_eq!(config.plan, "meadow");
    }
}
