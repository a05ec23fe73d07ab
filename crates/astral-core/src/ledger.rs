//! Resource ledger: gold, mana, turns and diamonds
//!
//! A [`ResourceLedger`] is a snapshot of a character's balances. Changes are
//! expressed as a [`ResourceDelta`] and applied with
//! [`ResourceLedger::apply_delta`], which either applies every field or none.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Default mana ceiling for a fresh character
pub const DEFAULT_MAX_MANA: u64 = 100;

/// The four spendable resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Gold,
    Mana,
    Turns,
    Diamonds,
}

impl ResourceKind {
    /// Check order used when reporting shortfalls
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Gold,
        ResourceKind::Mana,
        ResourceKind::Turns,
        ResourceKind::Diamonds,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Gold => "gold",
            ResourceKind::Mana => "mana",
            ResourceKind::Turns => "turns",
            ResourceKind::Diamonds => "diamonds",
        };
        f.write_str(name)
    }
}

/// A delta would drive a resource below zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient {kind}: have {available}, need {required}")]
pub struct LedgerError {
    pub kind: ResourceKind,
    pub available: u64,
    pub required: u64,
}

/// Signed adjustment to each resource
///
/// Fields are `i128` so a debit can carry any `u64` amount exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceDelta {
    #[serde(default)]
    pub gold: i128,
    #[serde(default)]
    pub mana: i128,
    #[serde(default)]
    pub turns: i128,
    #[serde(default)]
    pub diamonds: i128,
}

impl ResourceDelta {
    /// The empty delta
    pub fn zero() -> Self {
        Self::default()
    }

    /// Spend gold and turns, as building and research do
    pub fn spend(gold: u64, turns: u64) -> Self {
        Self {
            gold: -i128::from(gold),
            turns: -i128::from(turns),
            ..Self::default()
        }
    }

    pub fn with_gold(mut self, gold: i64) -> Self {
        self.gold = gold.into();
        self
    }

    pub fn with_mana(mut self, mana: i64) -> Self {
        self.mana = mana.into();
        self
    }

    pub fn with_turns(mut self, turns: i64) -> Self {
        self.turns = turns.into();
        self
    }

    pub fn with_diamonds(mut self, diamonds: i64) -> Self {
        self.diamonds = diamonds.into();
        self
    }

    /// Adjustment for one resource
    pub fn get(&self, kind: ResourceKind) -> i128 {
        match kind {
            ResourceKind::Gold => self.gold,
            ResourceKind::Mana => self.mana,
            ResourceKind::Turns => self.turns,
            ResourceKind::Diamonds => self.diamonds,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// A character's resource balances and level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    pub level: u32,
    pub gold: u64,
    pub mana: u64,
    pub max_mana: u64,
    pub turns: u64,
    pub diamonds: u64,
}

impl ResourceLedger {
    /// Balance of one resource
    pub fn get(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Gold => self.gold,
            ResourceKind::Mana => self.mana,
            ResourceKind::Turns => self.turns,
            ResourceKind::Diamonds => self.diamonds,
        }
    }

    /// Whether `amount` of `kind` is available
    pub fn can_afford(&self, kind: ResourceKind, amount: u64) -> bool {
        self.get(kind) >= amount
    }

    /// Apply a delta, returning the new ledger
    ///
    /// Fails without touching `self` if any resource would go negative.
    /// Mana is clamped to `max_mana` after a successful apply.
    pub fn apply_delta(&self, delta: &ResourceDelta) -> Result<ResourceLedger, LedgerError> {
        let mut next = *self;
        for kind in ResourceKind::ALL {
            let value = adjust(self.get(kind), delta.get(kind)).ok_or(LedgerError {
                kind,
                available: self.get(kind),
                required: magnitude(delta.get(kind)),
            })?;
            match kind {
                ResourceKind::Gold => next.gold = value,
                ResourceKind::Mana => next.mana = value.min(self.max_mana),
                ResourceKind::Turns => next.turns = value,
                ResourceKind::Diamonds => next.diamonds = value,
            }
        }
        Ok(next)
    }
}

fn magnitude(change: i128) -> u64 {
    u64::try_from(change.unsigned_abs()).unwrap_or(u64::MAX)
}

fn adjust(balance: u64, change: i128) -> Option<u64> {
    let amount = u64::try_from(change.unsigned_abs()).ok();
    if change >= 0 {
        Some(amount.map_or(u64::MAX, |a| balance.saturating_add(a)))
    } else {
        amount.and_then(|a| balance.checked_sub(a))
    }
}
