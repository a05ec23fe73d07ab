//! Engine configuration
//!
//! Tunables for character creation and battle resolution. Every field has a
//! default matching the standard game, so a RON file only needs to name the
//! values it overrides:
//!
//! ```
//! use astral_core::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.starting.gold, 10_000);
//! assert_eq!(config.battle.log_capacity, 5);
//! ```

use crate::ledger::{ResourceLedger, DEFAULT_MAX_MANA};
use serde::{Deserialize, Serialize};

/// Resources a freshly created character starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartingResources {
    pub gold: u64,
    pub mana: u64,
    pub max_mana: u64,
    pub turns: u64,
    pub diamonds: u64,
}

impl StartingResources {
    /// The level-1 ledger these values describe
    pub fn ledger(&self) -> ResourceLedger {
        ResourceLedger {
            level: 1,
            gold: self.gold,
            mana: self.mana.min(self.max_mana),
            max_mana: self.max_mana,
            turns: self.turns,
            diamonds: self.diamonds,
        }
    }
}

impl Default for StartingResources {
    fn default() -> Self {
        Self {
            gold: 10_000,
            mana: 100,
            max_mana: DEFAULT_MAX_MANA,
            turns: 50,
            diamonds: 100,
        }
    }
}

/// Battle tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Player hit points at the start of every battle
    pub player_max_hp: u64,
    /// Flat defense subtracted from enemy attacks
    pub player_defense: u64,
    /// Upper bound of the random damage bonus, as a fraction
    pub damage_variance: f64,
    /// Number of log lines kept
    pub log_capacity: usize,
    /// Gold awarded per enemy level on victory
    pub gold_per_enemy_level: u64,
    /// Mana restored to the character on victory
    pub victory_mana_restore: u64,
    /// Enemy turns before the player retreats; 0 disables the cap
    pub max_rounds: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            player_max_hp: 100,
            player_defense: 20,
            damage_variance: 0.3,
            log_capacity: 5,
            gold_per_enemy_level: 1000,
            victory_mana_restore: 10,
            max_rounds: 100,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub starting: StartingResources,
    pub battle: BattleConfig,
    /// Longest accepted username, in characters
    pub max_username_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting: StartingResources::default(),
            battle: BattleConfig::default(),
            max_username_len: 20,
        }
    }
}

impl EngineConfig {
    pub fn with_battle(mut self, battle: BattleConfig) -> Self {
        self.battle = battle;
        self
    }

    pub fn with_starting(mut self, starting: StartingResources) -> Self {
        self.starting = starting;
        self
    }
}
