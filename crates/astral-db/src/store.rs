//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use astral_core::{
    BuildingId, Character, CharacterId, GameStore, GuildMembership, OwnershipKind,
    OwnershipRecord, ResourceDelta, ResourceLedger,
};
use native_db::*;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredCharacter>().unwrap();
    models.define::<StoredCounter>().unwrap();
    models.define::<StoredOwnership>().unwrap();
    models.define::<StoredMembership>().unwrap();
    models
});

/// native_db-backed [`GameStore`].
///
/// Every trait method runs in a single transaction.
pub struct DbStore {
    db: Database<'static>,
}

impl DbStore {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        debug!(path = %path.as_ref().display(), "Opened database");
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Load every stored character.
    pub fn all_characters(&self) -> Result<Vec<Character>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredCharacter>()?;
        let iter = scan.all()?;
        let stored: std::result::Result<Vec<StoredCharacter>, _> = iter.collect();
        let stored = stored.map_err(|e| Error::Database(e.to_string()))?;
        stored.iter().map(StoredCharacter::to_character).collect()
    }

    /// Members of a guild recorded in this store.
    pub fn guild_members(&self, guild: &str) -> Result<Vec<GuildMembership>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredMembership>(StoredMembershipKey::guild_id)?;
        let iter = scan.start_with(guild)?;
        let stored: std::result::Result<Vec<StoredMembership>, _> = iter.collect();
        let stored = stored.map_err(|e| Error::Database(e.to_string()))?;
        stored
            .iter()
            .filter(|m| m.guild_id == guild)
            .map(StoredMembership::to_membership)
            .collect()
    }
}

impl GameStore for DbStore {
    type Error = Error;

    fn allocate_character_id(&self) -> Result<CharacterId> {
        let rw = self.db.rw_transaction()?;
        let current: Option<StoredCounter> =
            rw.get().primary(StoredCounter::CHARACTER_ID.to_string())?;
        let next = current.map_or(0, |c| c.value) + 1;
        rw.upsert(StoredCounter {
            name: StoredCounter::CHARACTER_ID.to_string(),
            value: next,
        })?;
        rw.commit()?;
        Ok(CharacterId::new(next))
    }

    fn get_character(&self, id: CharacterId) -> Result<Option<Character>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredCharacter> = r.get().primary(id.raw())?;
        stored.map(|s| s.to_character()).transpose()
    }

    fn insert_character(&self, character: &Character) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let existing: Option<StoredCharacter> = rw.get().primary(character.id.raw())?;
        if existing.is_some() {
            return Err(Error::DuplicateKey(character.id.to_string()));
        }
        rw.insert(StoredCharacter::from_character(character))?;
        rw.commit()?;
        debug!(character = %character.id, "Stored character");
        Ok(())
    }

    fn persist_resource_delta(&self, id: CharacterId, delta: &ResourceDelta) -> Result<ResourceLedger> {
        let rw = self.db.rw_transaction()?;
        let mut stored: StoredCharacter = rw
            .get()
            .primary(id.raw())?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let ledger = stored.to_character()?.ledger().apply_delta(delta)?;
        stored.set_ledger(&ledger);
        rw.upsert(stored)?;
        rw.commit()?;
        debug!(character = %id, gold = ledger.gold, mana = ledger.mana, turns = ledger.turns, "Ledger updated");
        Ok(ledger)
    }

    fn list_ownership(&self, id: CharacterId, kind: OwnershipKind) -> Result<Vec<OwnershipRecord>> {
        let r = self.db.r_transaction()?;
        let scan = r
            .scan()
            .secondary::<StoredOwnership>(StoredOwnershipKey::character_id)?;
        let iter = scan.start_with(id.raw())?;
        let stored: std::result::Result<Vec<StoredOwnership>, _> = iter.collect();
        let stored = stored.map_err(|e| Error::Database(e.to_string()))?;
        stored
            .iter()
            .filter(|s| s.character_id == id.raw() && s.is_kind(kind))
            .map(StoredOwnership::to_record)
            .collect()
    }

    fn create_ownership(&self, record: &OwnershipRecord) -> Result<bool> {
        let stored = StoredOwnership::from_record(record);
        let rw = self.db.rw_transaction()?;
        let existing: Option<StoredOwnership> = rw.get().primary(stored.key.clone())?;
        if existing.is_some() {
            return Ok(false);
        }
        let owner: Option<StoredCharacter> = rw.get().primary(record.character_id.raw())?;
        if owner.is_none() {
            return Err(Error::NotFound(record.character_id.to_string()));
        }
        rw.insert(stored)?;
        rw.commit()?;
        debug!(character = %record.character_id, entry = record.entry_id(), "Stored unlock");
        Ok(true)
    }

    fn update_building_level(&self, id: CharacterId, building: &BuildingId, level: u32) -> Result<()> {
        let key = StoredOwnership::key_for(id, OwnershipKind::Building, building.as_str());
        let rw = self.db.rw_transaction()?;
        let mut stored: StoredOwnership = rw
            .get()
            .primary(key.clone())?
            .ok_or(Error::NotFound(key))?;
        stored.level = level;
        rw.upsert(stored)?;
        rw.commit()?;
        Ok(())
    }

    fn persist_unlock(&self, delta: &ResourceDelta, unlock: &OwnershipRecord) -> Result<ResourceLedger> {
        let id = unlock.character_id;
        let record = StoredOwnership::from_record(unlock);
        let rw = self.db.rw_transaction()?;
        let mut owner: StoredCharacter = rw
            .get()
            .primary(id.raw())?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let ledger = owner.to_character()?.ledger().apply_delta(delta)?;

        let existing: Option<StoredOwnership> = rw.get().primary(record.key.clone())?;
        match existing {
            Some(_) if unlock.kind() == OwnershipKind::Spell => {
                return Err(Error::DuplicateKey(record.key));
            }
            Some(mut stored) => {
                stored.level = record.level;
                rw.upsert(stored)?;
            }
            None => {
                rw.insert(record)?;
            }
        }
        owner.set_ledger(&ledger);
        rw.upsert(owner)?;
        rw.commit()?;
        debug!(
            character = %id,
            entry = unlock.entry_id(),
            gold = ledger.gold,
            turns = ledger.turns,
            "Unlock stored"
        );
        Ok(ledger)
    }

    fn guild_membership(&self, id: CharacterId) -> Result<Option<GuildMembership>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredMembership> = r.get().primary(id.raw())?;
        stored.map(|s| s.to_membership()).transpose()
    }

    fn create_membership(&self, membership: &GuildMembership) -> Result<()> {
        let id = membership.character_id;
        let rw = self.db.rw_transaction()?;
        let existing: Option<StoredMembership> = rw.get().primary(id.raw())?;
        if existing.is_some() {
            return Err(Error::DuplicateKey(format!("membership of {}", id)));
        }
        let owner: Option<StoredCharacter> = rw.get().primary(id.raw())?;
        if owner.is_none() {
            return Err(Error::NotFound(id.to_string()));
        }
        rw.insert(StoredMembership::from_membership(membership))?;
        rw.commit()?;
        Ok(())
    }

    fn remove_membership(&self, id: CharacterId) -> Result<Option<GuildMembership>> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredMembership> = rw.get().primary(id.raw())?;
        let Some(stored) = stored else {
            return Ok(None);
        };
        let membership = stored.to_membership()?;
        rw.remove(stored)?;
        rw.commit()?;
        Ok(Some(membership))
    }
}
