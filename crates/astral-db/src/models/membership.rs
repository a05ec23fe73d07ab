//! Guild membership models for database storage.

use crate::error::{Error, Result};
use astral_core::{CharacterId, GuildMembership, GuildRole};
use chrono::{DateTime, Utc};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored guild membership, one row per character.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 4, version = 1)]
#[native_db]
pub struct StoredMembership {
    /// Primary key - character ID.
    #[primary_key]
    pub character_id: u64,
    #[secondary_key]
    pub guild_id: String,
    pub role: GuildRole,
    pub joined_at: DateTime<Utc>,
}

impl StoredMembership {
    pub fn from_membership(membership: &GuildMembership) -> Self {
        Self {
            character_id: membership.character_id.raw(),
            guild_id: membership.guild_id.as_str().to_string(),
            role: membership.role,
            joined_at: membership.joined_at,
        }
    }

    pub fn to_membership(&self) -> Result<GuildMembership> {
        let guild_id = self
            .guild_id
            .parse()
            .map_err(|e| Error::Corrupt(format!("membership {}: {}", self.character_id, e)))?;
        Ok(GuildMembership {
            character_id: CharacterId::new(self.character_id),
            guild_id,
            role: self.role,
            joined_at: self.joined_at,
        })
    }
}
