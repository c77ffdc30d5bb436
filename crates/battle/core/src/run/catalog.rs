//! Monster templates and the oracle that serves them.
//!
//! Templates are consumed from the content collaborator keyed by id and
//! scaled per encounter. The core never loads files itself; the content
//! crate builds a [`MonsterCatalog`] and the runtime passes it around behind
//! [`MonsterOracle`].

use std::collections::HashMap;

use crate::state::{Bounty, Combatant, CombatantId, CombatantStats};

/// Static description of a monster kind.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterTemplate {
    pub id: String,
    pub name: String,
    pub stats: CombatantStats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bounty: Bounty,
}

impl MonsterTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, stats: CombatantStats) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stats,
            bounty: Bounty::default(),
        }
    }

    pub fn with_bounty(mut self, bounty: Bounty) -> Self {
        self.bounty = bounty;
        self
    }

    /// Creates a combatant with stats scaled by `scale_percent`.
    ///
    /// The slot id is reassigned when the encounter state is built.
    pub fn spawn(&self, scale_percent: u32, level: u32) -> Combatant {
        let mut stats = self.stats.scaled(scale_percent);
        stats.level = stats.level.max(level);
        Combatant::new(CombatantId::Enemy(0), self.name.clone(), stats)
            .with_template(self.id.clone())
            .with_bounty(self.bounty.clone())
    }
}

/// Oracle providing monster templates by id.
pub trait MonsterOracle: Send + Sync {
    /// Returns the template for `id`, if the catalog knows it.
    fn template(&self, id: &str) -> Option<MonsterTemplate>;

    /// All known template ids, sorted.
    fn all_ids(&self) -> Vec<String> {
        Vec::new()
    }
}

/// In-memory [`MonsterOracle`].
#[derive(Clone, Debug, Default)]
pub struct MonsterCatalog {
    templates: HashMap<String, MonsterTemplate>,
}

impl MonsterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a template under its own id.
    pub fn insert(&mut self, template: MonsterTemplate) -> Option<MonsterTemplate> {
        self.templates.insert(template.id.clone(), template)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl FromIterator<MonsterTemplate> for MonsterCatalog {
    fn from_iter<I: IntoIterator<Item = MonsterTemplate>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for template in iter {
            catalog.insert(template);
        }
        catalog
    }
}

impl MonsterOracle for MonsterCatalog {
    fn template(&self, id: &str) -> Option<MonsterTemplate> {
        self.templates.get(id).cloned()
    }

    fn all_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.templates.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_scales_and_tags_template() {
        let template = MonsterTemplate::new("slime", "Slime", CombatantStats::new(40, 6, 2)).with_bounty(Bounty {
            gold: 3,
            ..Bounty::default()
        });

        let slime = template.spawn(150, 4);
        assert_eq!(slime.max_health(), 60);
        assert_eq!(slime.stats.attack, 9);
        assert_eq!(slime.stats.level, 4);
        assert_eq!(slime.template.as_deref(), Some("slime"));
        assert_eq!(slime.bounty.gold, 3);
    }

    #[test]
    fn catalog_lookup_by_id() {
        let catalog: MonsterCatalog = [
            MonsterTemplate::new("bat", "Bat", CombatantStats::new(10, 3, 0)),
            MonsterTemplate::new("orc", "Orc", CombatantStats::new(90, 12, 6)),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.template("orc").map(|t| t.name), Some("Orc".to_string()));
        assert!(catalog.template("dragon").is_none());
        assert_eq!(catalog.all_ids(), vec!["bat", "orc"]);
    }
}
