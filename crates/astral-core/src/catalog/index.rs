//! The validated, read-only catalog index

use super::defs::{BuildingDef, EnemyDef, GuildDef, SpellCategory, SpellDef};
use crate::identity::{BuildingId, EnemyId, GuildId, SpellId};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Which table of the catalog an entry lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Building,
    Spell,
    Enemy,
    Guild,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatalogKind::Building => "building",
            CatalogKind::Spell => "spell",
            CatalogKind::Enemy => "enemy",
            CatalogKind::Guild => "guild",
        };
        f.write_str(name)
    }
}

/// A borrowed catalog entry of any kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEntry<'a> {
    Building(&'a BuildingDef),
    Spell(&'a SpellDef),
    Enemy(&'a EnemyDef),
    Guild(&'a GuildDef),
}

/// Catalog construction and lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate {kind} definition: {id}")]
    Duplicate { kind: CatalogKind, id: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: CatalogKind, id: String },

    #[error("spell {spell} requires unknown spell {prerequisite}")]
    UnknownPrerequisite { spell: SpellId, prerequisite: SpellId },

    #[error("prerequisite cycle through spell {0}")]
    PrerequisiteCycle(SpellId),

    #[error("attack spell {0} has no damage range")]
    MissingDamage(SpellId),

    #[error("non-attack spell {0} declares a damage range")]
    UnexpectedDamage(SpellId),

    #[error("spell {0} has a damage range with min above max")]
    InvalidDamageRange(SpellId),

    #[error("enemy {0} has no hit points")]
    InvalidEnemy(EnemyId),
}

/// Accumulates definitions, rejecting duplicates as they arrive
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    buildings: IndexMap<BuildingId, BuildingDef>,
    spells: IndexMap<SpellId, SpellDef>,
    enemies: IndexMap<EnemyId, EnemyDef>,
    guilds: IndexMap<GuildId, GuildDef>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_building(&mut self, def: BuildingDef) -> Result<&mut Self, CatalogError> {
        insert_unique(&mut self.buildings, CatalogKind::Building, def.id.clone(), def)?;
        Ok(self)
    }

    pub fn add_spell(&mut self, def: SpellDef) -> Result<&mut Self, CatalogError> {
        insert_unique(&mut self.spells, CatalogKind::Spell, def.id.clone(), def)?;
        Ok(self)
    }

    pub fn add_enemy(&mut self, def: EnemyDef) -> Result<&mut Self, CatalogError> {
        insert_unique(&mut self.enemies, CatalogKind::Enemy, def.id.clone(), def)?;
        Ok(self)
    }

    pub fn add_guild(&mut self, def: GuildDef) -> Result<&mut Self, CatalogError> {
        insert_unique(&mut self.guilds, CatalogKind::Guild, def.id.clone(), def)?;
        Ok(self)
    }

    /// Validate cross references and freeze the catalog
    pub fn build(self) -> Result<CatalogIndex, CatalogError> {
        for spell in self.spells.values() {
            match (spell.category, spell.damage) {
                (SpellCategory::Attack, None) => {
                    return Err(CatalogError::MissingDamage(spell.id.clone()))
                }
                (SpellCategory::Attack, Some(range)) if range.min > range.max => {
                    return Err(CatalogError::InvalidDamageRange(spell.id.clone()))
                }
                (SpellCategory::Attack, Some(_)) => {}
                (_, Some(_)) => return Err(CatalogError::UnexpectedDamage(spell.id.clone())),
                (_, None) => {}
            }
            if let Some(prerequisite) = &spell.prerequisite {
                if !self.spells.contains_key(prerequisite) {
                    return Err(CatalogError::UnknownPrerequisite {
                        spell: spell.id.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
            }
        }

        for id in self.spells.keys() {
            let mut seen = HashSet::new();
            let mut cursor = Some(id);
            while let Some(current) = cursor {
                if !seen.insert(current) {
                    return Err(CatalogError::PrerequisiteCycle(id.clone()));
                }
                cursor = self.spells.get(current).and_then(|s| s.prerequisite.as_ref());
            }
        }

        if let Some(enemy) = self.enemies.values().find(|e| e.max_hp == 0) {
            return Err(CatalogError::InvalidEnemy(enemy.id.clone()));
        }

        Ok(CatalogIndex {
            buildings: self.buildings,
            spells: self.spells,
            enemies: self.enemies,
            guilds: self.guilds,
        })
    }
}

fn insert_unique<K, V>(
    map: &mut IndexMap<K, V>,
    kind: CatalogKind,
    id: K,
    value: V,
) -> Result<(), CatalogError>
where
    K: std::hash::Hash + Eq + fmt::Display,
{
    if map.contains_key(&id) {
        return Err(CatalogError::Duplicate {
            kind,
            id: id.to_string(),
        });
    }
    map.insert(id, value);
    Ok(())
}

/// Static buildings, spells, enemies and guilds
///
/// Built once through [`CatalogBuilder`] and never mutated afterwards, so it
/// can be shared across threads behind an `Arc` without locking. Iteration
/// follows authoring order.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    buildings: IndexMap<BuildingId, BuildingDef>,
    spells: IndexMap<SpellId, SpellDef>,
    enemies: IndexMap<EnemyId, EnemyDef>,
    guilds: IndexMap<GuildId, GuildDef>,
}

impl CatalogIndex {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Look up any entry by kind and raw id
    pub fn lookup(&self, kind: CatalogKind, id: &str) -> Result<CatalogEntry<'_>, CatalogError> {
        let entry = match kind {
            CatalogKind::Building => BuildingId::new(id)
                .ok()
                .and_then(|id| self.buildings.get(&id))
                .map(CatalogEntry::Building),
            CatalogKind::Spell => SpellId::new(id)
                .ok()
                .and_then(|id| self.spells.get(&id))
                .map(CatalogEntry::Spell),
            CatalogKind::Enemy => EnemyId::new(id)
                .ok()
                .and_then(|id| self.enemies.get(&id))
                .map(CatalogEntry::Enemy),
            CatalogKind::Guild => GuildId::new(id)
                .ok()
                .and_then(|id| self.guilds.get(&id))
                .map(CatalogEntry::Guild),
        };
        entry.ok_or_else(|| CatalogError::NotFound {
            kind,
            id: id.to_string(),
        })
    }

    pub fn building(&self, id: &BuildingId) -> Option<&BuildingDef> {
        self.buildings.get(id)
    }

    pub fn spell(&self, id: &SpellId) -> Option<&SpellDef> {
        self.spells.get(id)
    }

    pub fn enemy(&self, id: &EnemyId) -> Option<&EnemyDef> {
        self.enemies.get(id)
    }

    pub fn guild(&self, id: &GuildId) -> Option<&GuildDef> {
        self.guilds.get(id)
    }

    pub fn buildings(&self) -> impl Iterator<Item = &BuildingDef> {
        self.buildings.values()
    }

    pub fn spells(&self) -> impl Iterator<Item = &SpellDef> {
        self.spells.values()
    }

    /// Spells of one category, in authoring order
    pub fn spells_in(&self, category: SpellCategory) -> impl Iterator<Item = &SpellDef> {
        self.spells.values().filter(move |s| s.category == category)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &EnemyDef> {
        self.enemies.values()
    }

    pub fn guilds(&self) -> impl Iterator<Item = &GuildDef> {
        self.guilds.values()
    }

    /// Number of entries of one kind
    pub fn len(&self, kind: CatalogKind) -> usize {
        match kind {
            CatalogKind::Building => self.buildings.len(),
            CatalogKind::Spell => self.spells.len(),
            CatalogKind::Enemy => self.enemies.len(),
            CatalogKind::Guild => self.guilds.len(),
        }
    }
}
