//! Persistence boundary
//!
//! [`GameStore`] is everything the [`Game`](crate::Game) façade needs from a
//! backing store. [`MemoryStore`] keeps it all behind one `RwLock`; the
//! astral-db crate provides a native_db implementation.

use crate::character::Character;
use crate::identity::{BuildingId, CharacterId};
use crate::guild::GuildMembership;
use crate::ledger::{LedgerError, ResourceDelta, ResourceLedger};
use crate::ownership::{OwnedEntry, OwnershipKind, OwnershipRecord};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Storage operations used by the game façade
///
/// Each method is atomic on its own. Implementations report their own error
/// type; the façade carries it unmodified inside
/// [`Error::Persistence`](crate::Error::Persistence).
pub trait GameStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reserve a fresh character id
    fn allocate_character_id(&self) -> Result<CharacterId, Self::Error>;

    fn get_character(&self, id: CharacterId) -> Result<Option<Character>, Self::Error>;

    /// Store a new character; fails if the id is taken
    fn insert_character(&self, character: &Character) -> Result<(), Self::Error>;

    /// Apply `delta` to the stored ledger and return the result
    fn persist_resource_delta(
        &self,
        id: CharacterId,
        delta: &ResourceDelta,
    ) -> Result<ResourceLedger, Self::Error>;

    fn list_ownership(
        &self,
        id: CharacterId,
        kind: OwnershipKind,
    ) -> Result<Vec<OwnershipRecord>, Self::Error>;

    /// Record an unlock; returns false when the spell was already owned
    fn create_ownership(&self, record: &OwnershipRecord) -> Result<bool, Self::Error>;

    fn update_building_level(
        &self,
        id: CharacterId,
        building: &BuildingId,
        level: u32,
    ) -> Result<(), Self::Error>;

    /// Charge `delta` and record `unlock` for its character in one write
    ///
    /// A building record sets the building's level, creating the row on
    /// first construction. A spell already owned is an error. On any error
    /// neither the ledger nor the unlocks change.
    fn persist_unlock(
        &self,
        delta: &ResourceDelta,
        unlock: &OwnershipRecord,
    ) -> Result<ResourceLedger, Self::Error>;

    fn guild_membership(&self, id: CharacterId) -> Result<Option<GuildMembership>, Self::Error>;

    /// Store a membership; fails if the character already has one
    fn create_membership(&self, membership: &GuildMembership) -> Result<(), Self::Error>;

    /// Drop the character's membership, returning it if there was one
    fn remove_membership(&self, id: CharacterId) -> Result<Option<GuildMembership>, Self::Error>;
}

/// [`MemoryStore`] errors
#[derive(Debug, Error)]
pub enum MemoryStoreError {
    #[error("character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("character already exists: {0}")]
    DuplicateCharacter(CharacterId),

    #[error("{character} does not own building {building}")]
    BuildingNotOwned {
        character: CharacterId,
        building: BuildingId,
    },

    #[error("{character} already owns spell {spell}")]
    SpellAlreadyOwned { character: CharacterId, spell: String },

    #[error("{0} already has a guild membership")]
    DuplicateMembership(CharacterId),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: u64,
    characters: HashMap<CharacterId, Character>,
    ownership: HashMap<CharacterId, Vec<OwnershipRecord>>,
    memberships: HashMap<CharacterId, GuildMembership>,
}

/// In-process [`GameStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, MemoryStoreError> {
        let tables = self.tables.read().map_err(|_| MemoryStoreError::Poisoned)?;
        Ok(f(&tables))
    }

    fn write<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, MemoryStoreError>,
    ) -> Result<T, MemoryStoreError> {
        let mut tables = self.tables.write().map_err(|_| MemoryStoreError::Poisoned)?;
        f(&mut tables)
    }
}

impl GameStore for MemoryStore {
    type Error = MemoryStoreError;

    fn allocate_character_id(&self) -> Result<CharacterId, Self::Error> {
        self.write(|t| {
            t.next_id += 1;
            Ok(CharacterId::new(t.next_id))
        })
    }

    fn get_character(&self, id: CharacterId) -> Result<Option<Character>, Self::Error> {
        self.read(|t| t.characters.get(&id).cloned())
    }

    fn insert_character(&self, character: &Character) -> Result<(), Self::Error> {
        self.write(|t| {
            if t.characters.contains_key(&character.id) {
                return Err(MemoryStoreError::DuplicateCharacter(character.id));
            }
            t.next_id = t.next_id.max(character.id.raw());
            t.characters.insert(character.id, character.clone());
            Ok(())
        })
    }

    fn persist_resource_delta(
        &self,
        id: CharacterId,
        delta: &ResourceDelta,
    ) -> Result<ResourceLedger, Self::Error> {
        self.write(|t| {
            let character = t
                .characters
                .get_mut(&id)
                .ok_or(MemoryStoreError::CharacterNotFound(id))?;
            character.apply_delta(delta)?;
            Ok(character.ledger())
        })
    }

    fn list_ownership(
        &self,
        id: CharacterId,
        kind: OwnershipKind,
    ) -> Result<Vec<OwnershipRecord>, Self::Error> {
        self.read(|t| {
            t.ownership
                .get(&id)
                .map(|records| {
                    records
                        .iter()
                        .filter(|r| r.kind() == kind)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    fn create_ownership(&self, record: &OwnershipRecord) -> Result<bool, Self::Error> {
        self.write(|t| {
            if !t.characters.contains_key(&record.character_id) {
                return Err(MemoryStoreError::CharacterNotFound(record.character_id));
            }
            let records = t.ownership.entry(record.character_id).or_default();
            let exists = records
                .iter()
                .any(|r| r.kind() == record.kind() && r.entry_id() == record.entry_id());
            if exists {
                return Ok(false);
            }
            records.push(record.clone());
            Ok(true)
        })
    }

    fn update_building_level(
        &self,
        id: CharacterId,
        building: &BuildingId,
        level: u32,
    ) -> Result<(), Self::Error> {
        self.write(|t| {
            let slot = t.ownership.get_mut(&id).and_then(|records| {
                records.iter_mut().find_map(|r| match &mut r.entry {
                    OwnedEntry::Building { id: owned, level: current } if owned == building => {
                        Some(current)
                    }
                    _ => None,
                })
            });
            match slot {
                Some(current) => {
                    *current = level;
                    Ok(())
                }
                None => Err(MemoryStoreError::BuildingNotOwned {
                    character: id,
                    building: building.clone(),
                }),
            }
        })
    }

    fn persist_unlock(
        &self,
        delta: &ResourceDelta,
        unlock: &OwnershipRecord,
    ) -> Result<ResourceLedger, Self::Error> {
        self.write(|t| {
            let id = unlock.character_id;
            let character = t
                .characters
                .get_mut(&id)
                .ok_or(MemoryStoreError::CharacterNotFound(id))?;
            let ledger = character.ledger().apply_delta(delta)?;
            let records = t.ownership.entry(id).or_default();
            let existing = records
                .iter()
                .position(|r| r.kind() == unlock.kind() && r.entry_id() == unlock.entry_id());
            match existing {
                Some(_) if unlock.kind() == OwnershipKind::Spell => {
                    return Err(MemoryStoreError::SpellAlreadyOwned {
                        character: id,
                        spell: unlock.entry_id().to_string(),
                    });
                }
                Some(i) => records[i].entry = unlock.entry.clone(),
                None => records.push(unlock.clone()),
            }
            character.apply_delta(delta)?;
            Ok(ledger)
        })
    }

    fn guild_membership(&self, id: CharacterId) -> Result<Option<GuildMembership>, Self::Error> {
        self.read(|t| t.memberships.get(&id).cloned())
    }

    fn create_membership(&self, membership: &GuildMembership) -> Result<(), Self::Error> {
        self.write(|t| {
            let id = membership.character_id;
            if !t.characters.contains_key(&id) {
                return Err(MemoryStoreError::CharacterNotFound(id));
            }
            if t.memberships.contains_key(&id) {
                return Err(MemoryStoreError::DuplicateMembership(id));
            }
            t.memberships.insert(id, membership.clone());
            Ok(())
        })
    }

    fn remove_membership(&self, id: CharacterId) -> Result<Option<GuildMembership>, Self::Error> {
        self.write(|t| Ok(t.memberships.remove(&id)))
    }
}
