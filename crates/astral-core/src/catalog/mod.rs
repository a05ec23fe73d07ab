//! Static reference data: buildings, spells, enemies and guilds

mod defs;
mod index;

#[cfg(test)]
pub(crate) mod fixtures;

pub use defs::{
    BuildingDef, DamageRange, EnemyDef, GuildDef, ProductionEffect, SpellCategory, SpellDef,
    SpellTier,
};
pub use index::{CatalogBuilder, CatalogEntry, CatalogError, CatalogIndex, CatalogKind};
