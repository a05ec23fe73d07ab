//! Unlock models for database storage.

use crate::error::{Error, Result};
use astral_core::{CharacterId, OwnedEntry, OwnershipKind, OwnershipRecord};
use chrono::{DateTime, Utc};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored building or spell unlock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredOwnership {
    /// Primary key - `"{character}:{kind}:{entry}"`.
    #[primary_key]
    pub key: String,
    /// Owning character.
    #[secondary_key]
    pub character_id: u64,
    /// `"building"` or `"spell"`.
    pub kind: String,
    pub entry_id: String,
    /// Building level; 0 for spells.
    pub level: u32,
    pub acquired_at: DateTime<Utc>,
}

impl StoredOwnership {
    /// Primary key for a character's unlock of `entry_id`.
    pub fn key_for(character_id: CharacterId, kind: OwnershipKind, entry_id: &str) -> String {
        format!("{}:{}:{}", character_id.raw(), kind_name(kind), entry_id)
    }

    pub fn from_record(record: &OwnershipRecord) -> Self {
        let level = match &record.entry {
            OwnedEntry::Building { level, .. } => *level,
            OwnedEntry::Spell(_) => 0,
        };
        Self {
            key: Self::key_for(record.character_id, record.kind(), record.entry_id()),
            character_id: record.character_id.raw(),
            kind: kind_name(record.kind()).to_string(),
            entry_id: record.entry_id().to_string(),
            level,
            acquired_at: record.acquired_at,
        }
    }

    pub fn to_record(&self) -> Result<OwnershipRecord> {
        let corrupt = |e: &dyn std::fmt::Display| Error::Corrupt(format!("{}: {}", self.key, e));
        let entry = match self.kind.as_str() {
            "building" => OwnedEntry::Building {
                id: self.entry_id.parse().map_err(|e| corrupt(&e))?,
                level: self.level,
            },
            "spell" => OwnedEntry::Spell(self.entry_id.parse().map_err(|e| corrupt(&e))?),
            other => {
                return Err(Error::Corrupt(format!("{}: unknown kind {:?}", self.key, other)))
            }
        };
        Ok(OwnershipRecord {
            character_id: CharacterId::new(self.character_id),
            entry,
            acquired_at: self.acquired_at,
        })
    }

    pub fn is_kind(&self, kind: OwnershipKind) -> bool {
        self.kind == kind_name(kind)
    }
}

fn kind_name(kind: OwnershipKind) -> &'static str {
    match kind {
        OwnershipKind::Building => "building",
        OwnershipKind::Spell => "spell",
    }
}
