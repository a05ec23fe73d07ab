//! The character aggregate

use crate::config::EngineConfig;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::identity::CharacterId;
use crate::ledger::{LedgerError, ResourceDelta, ResourceLedger};
use serde::{Deserialize, Serialize};

/// A player's mage
///
/// The element is fixed at creation; balances only change through
/// [`Character::apply_delta`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub username: String,
    element: Element,
    ledger: ResourceLedger,
}

impl Character {
    /// Create a new character with the configured starting resources
    ///
    /// The username is trimmed and must be non-empty and no longer than
    /// `config.max_username_len` characters.
    pub fn create(
        id: CharacterId,
        username: &str,
        element: Element,
        config: &EngineConfig,
    ) -> Result<Self> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidCharacter("username is empty".to_string()));
        }
        let len = username.chars().count();
        if len > config.max_username_len {
            return Err(Error::InvalidCharacter(format!(
                "username is {} characters, limit is {}",
                len, config.max_username_len
            )));
        }
        Ok(Self {
            id,
            username: username.to_string(),
            element,
            ledger: config.starting.ledger(),
        })
    }

    /// Rebuild a character from stored parts
    pub fn from_parts(
        id: CharacterId,
        username: String,
        element: Element,
        ledger: ResourceLedger,
    ) -> Self {
        Self {
            id,
            username,
            element,
            ledger,
        }
    }

    pub fn element(&self) -> Element {
        self.element
    }

    /// Current balances
    pub fn ledger(&self) -> ResourceLedger {
        self.ledger
    }

    pub fn level(&self) -> u32 {
        self.ledger.level
    }

    /// Apply a delta to the ledger, all-or-nothing
    pub fn apply_delta(&mut self, delta: &ResourceDelta) -> std::result::Result<(), LedgerError> {
        self.ledger = self.ledger.apply_delta(delta)?;
        Ok(())
    }
}
