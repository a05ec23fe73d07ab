//! Astral Core - rules engine for a mage strategy game
//!
//! This crate holds the game rules, independent of storage and transport:
//! - Resource ledger with atomic, non-negative deltas
//! - Validated catalog of buildings, spells, enemies and guilds
//! - Building and spell-research decisions ([`ProgressionEngine`])
//! - Turn-based battle state machine ([`BattleEngine`])
//! - Guild membership rules
//!
//! ## Layers
//!
//! The engines are pure: they take snapshots and return decisions. The
//! [`Game`] façade reads those snapshots from a [`GameStore`], persists the
//! outcome and keeps one [`BattleSession`] per character. Randomness is
//! always injected through [`RandomSource`].
//!
//! ```
//! use astral_core::{ResourceDelta, StartingResources};
//!
//! let ledger = StartingResources::default().ledger();
//! let after = ledger.apply_delta(&ResourceDelta::spend(10_000, 5)).unwrap();
//! assert_eq!((after.gold, after.turns), (0, 45));
//! assert!(ledger.apply_delta(&ResourceDelta::spend(10_001, 0)).is_err());
//! ```

pub mod battle;
pub mod catalog;
mod character;
mod config;
mod element;
mod error;
mod game;
mod guild;
mod identity;
mod ledger;
mod ownership;
pub mod progression;
mod rng;
pub mod store;

pub use battle::{
    ActionReport, BattleEngine, BattleLog, BattlePhase, BattleSession, BattleStatus, EnemyState,
    RoundOutcome, TurnOwner,
};
pub use catalog::{
    BuildingDef, CatalogBuilder, CatalogEntry, CatalogError, CatalogIndex, CatalogKind,
    DamageRange, EnemyDef, GuildDef, ProductionEffect, SpellCategory, SpellDef, SpellTier,
};
pub use character::Character;
pub use config::{BattleConfig, EngineConfig, StartingResources};
pub use element::{Element, ElementProfile, ParseElementError};
pub use error::{BattleError, Denial, Error, Result};
pub use game::Game;
pub use guild::{evaluate_guild_join, GuildMembership, GuildRole};
pub use identity::{BuildingId, CharacterId, EnemyId, GuildId, IdError, SpellId};
pub use ledger::{LedgerError, ResourceDelta, ResourceKind, ResourceLedger, DEFAULT_MAX_MANA};
pub use ownership::{OwnedEntry, OwnershipKind, OwnershipRecord, OwnershipSet};
pub use progression::{
    evaluate_research, quote_building, scaled_cost, BuildingCost, BuildingQuote, ProgressionEngine,
    ResearchDecision,
};
pub use rng::{roll_variance, GameRng, RandomSource};
pub use store::{GameStore, MemoryStore, MemoryStoreError};
