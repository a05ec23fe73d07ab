//! File layout of a content file

use astral_core::{BuildingDef, EnemyDef, GuildDef, SpellDef};
use serde::{Deserialize, Serialize};

/// One RON content file
///
/// Every table is optional, so content can be split across files by kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentFile {
    pub buildings: Vec<BuildingDef>,
    pub spells: Vec<SpellDef>,
    pub enemies: Vec<EnemyDef>,
    pub guilds: Vec<GuildDef>,
}

impl ContentFile {
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
            && self.spells.is_empty()
            && self.enemies.is_empty()
            && self.guilds.is_empty()
    }
}
