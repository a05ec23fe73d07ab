//! Ownership records: which buildings and spells a character has unlocked

use crate::identity::{BuildingId, CharacterId, SpellId};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnershipKind {
    Building,
    Spell,
}

/// The unlocked entry; buildings carry their current level
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnedEntry {
    Building { id: BuildingId, level: u32 },
    Spell(SpellId),
}

/// Evidence that a character unlocked a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    pub character_id: CharacterId,
    pub entry: OwnedEntry,
    pub acquired_at: DateTime<Utc>,
}

impl OwnershipRecord {
    pub fn building(
        character_id: CharacterId,
        id: BuildingId,
        level: u32,
        acquired_at: DateTime<Utc>,
    ) -> Self {
        Self {
            character_id,
            entry: OwnedEntry::Building { id, level },
            acquired_at,
        }
    }

    pub fn spell(character_id: CharacterId, id: SpellId, acquired_at: DateTime<Utc>) -> Self {
        Self {
            character_id,
            entry: OwnedEntry::Spell(id),
            acquired_at,
        }
    }

    pub fn kind(&self) -> OwnershipKind {
        match self.entry {
            OwnedEntry::Building { .. } => OwnershipKind::Building,
            OwnedEntry::Spell(_) => OwnershipKind::Spell,
        }
    }

    /// Raw id of the unlocked entry
    pub fn entry_id(&self) -> &str {
        match &self.entry {
            OwnedEntry::Building { id, .. } => id.as_str(),
            OwnedEntry::Spell(id) => id.as_str(),
        }
    }
}

/// A character's unlocks, indexed for eligibility checks
///
/// Spells are held at most once; a repeated building record keeps the
/// highest level seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipSet {
    spells: IndexMap<SpellId, DateTime<Utc>>,
    buildings: IndexMap<BuildingId, u32>,
}

impl OwnershipSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a OwnershipRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.insert(record);
        }
        set
    }

    /// Add a record; returns false if a spell was already owned
    pub fn insert(&mut self, record: &OwnershipRecord) -> bool {
        match &record.entry {
            OwnedEntry::Spell(id) => {
                if self.spells.contains_key(id) {
                    return false;
                }
                self.spells.insert(id.clone(), record.acquired_at);
                true
            }
            OwnedEntry::Building { id, level } => {
                let current = self.buildings.entry(id.clone()).or_insert(0);
                *current = (*current).max(*level);
                true
            }
        }
    }

    pub fn owns_spell(&self, id: &SpellId) -> bool {
        self.spells.contains_key(id)
    }

    /// Current level of a building, 0 if never built
    pub fn building_level(&self, id: &BuildingId) -> u32 {
        self.buildings.get(id).copied().unwrap_or(0)
    }

    pub fn spells(&self) -> impl Iterator<Item = &SpellId> {
        self.spells.keys()
    }

    pub fn buildings(&self) -> impl Iterator<Item = (&BuildingId, u32)> {
        self.buildings.iter().map(|(id, level)| (id, *level))
    }
}
