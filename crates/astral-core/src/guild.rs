//! Guild membership rules

use crate::catalog::GuildDef;
use crate::error::Denial;
use crate::identity::{CharacterId, GuildId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuildRole {
    #[default]
    Member,
    Officer,
    Leader,
}

impl fmt::Display for GuildRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GuildRole::Member => "member",
            GuildRole::Officer => "officer",
            GuildRole::Leader => "leader",
        };
        f.write_str(s)
    }
}

/// A character's active guild membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMembership {
    pub character_id: CharacterId,
    pub guild_id: GuildId,
    pub role: GuildRole,
    pub joined_at: DateTime<Utc>,
}

impl GuildMembership {
    /// A plain member joining at `joined_at`
    pub fn member(character_id: CharacterId, guild_id: GuildId, joined_at: DateTime<Utc>) -> Self {
        Self {
            character_id,
            guild_id,
            role: GuildRole::Member,
            joined_at,
        }
    }
}

/// Decide whether a character may join `guild`
///
/// Denials in order: already in a guild, guild full, guild private.
pub fn evaluate_guild_join(guild: &GuildDef, current: Option<&GuildMembership>) -> Option<Denial> {
    if let Some(membership) = current {
        return Some(Denial::AlreadyInGuild(membership.guild_id.clone()));
    }
    if guild.is_full() {
        return Some(Denial::GuildFull);
    }
    if !guild.is_public {
        return Some(Denial::GuildPrivate);
    }
    None
}
