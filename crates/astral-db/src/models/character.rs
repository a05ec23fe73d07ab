//! Character models for database storage.

use crate::error::{Error, Result};
use astral_core::{Character, CharacterId, Element, ResourceLedger};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored character with its ledger flattened into columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredCharacter {
    /// Primary key - character ID.
    #[primary_key]
    pub id: u64,
    pub username: String,
    /// Element name, lowercase.
    pub element: String,
    pub level: u32,
    pub gold: u64,
    pub mana: u64,
    pub max_mana: u64,
    pub turns: u64,
    pub diamonds: u64,
}

impl StoredCharacter {
    pub fn from_character(character: &Character) -> Self {
        let ledger = character.ledger();
        Self {
            id: character.id.raw(),
            username: character.username.clone(),
            element: character.element().as_str().to_string(),
            level: ledger.level,
            gold: ledger.gold,
            mana: ledger.mana,
            max_mana: ledger.max_mana,
            turns: ledger.turns,
            diamonds: ledger.diamonds,
        }
    }

    pub fn to_character(&self) -> Result<Character> {
        let element: Element = self
            .element
            .parse()
            .map_err(|e| Error::Corrupt(format!("character {}: {}", self.id, e)))?;
        let ledger = ResourceLedger {
            level: self.level,
            gold: self.gold,
            mana: self.mana,
            max_mana: self.max_mana,
            turns: self.turns,
            diamonds: self.diamonds,
        };
        Ok(Character::from_parts(
            CharacterId::new(self.id),
            self.username.clone(),
            element,
            ledger,
        ))
    }

    /// Overwrite the ledger columns.
    pub fn set_ledger(&mut self, ledger: &ResourceLedger) {
        self.level = ledger.level;
        self.gold = ledger.gold;
        self.mana = ledger.mana;
        self.max_mana = ledger.max_mana;
        self.turns = ledger.turns;
        self.diamonds = ledger.diamonds;
    }
}

/// Named monotonic counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredCounter {
    #[primary_key]
    pub name: String,
    pub value: u64,
}

impl StoredCounter {
    /// Row holding the last issued character ID.
    pub const CHARACTER_ID: &'static str = "character_id";
}
