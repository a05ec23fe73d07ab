//! Error types for astral-core
//!
//! Three families, kept apart so callers can react differently:
//! - [`Denial`]: the player may not do this right now (not enough gold,
//!   missing prerequisite). Expected and user-facing.
//! - [`BattleError`]: the battle state machine was driven out of order, or
//!   the player lacks mana for a cast.
//! - [`Error::Persistence`]: the store failed; its error is carried as-is.

use crate::battle::TurnOwner;
use crate::catalog::{CatalogError, CatalogKind};
use crate::element::Element;
use crate::identity::{GuildId, SpellId};
use crate::ledger::{LedgerError, ResourceKind};
use thiserror::Error;

/// Why an action is not allowed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("not enough {kind}: have {available}, need {required}")]
    InsufficientResource {
        kind: ResourceKind,
        available: u64,
        required: u64,
    },

    #[error("spell already researched")]
    AlreadyOwned,

    #[error("requires the {required} element, character is {actual}")]
    ElementLocked { required: Element, actual: Element },

    #[error("requires {0} to be researched first")]
    PrerequisiteMissing(SpellId),

    #[error("spell {0} has not been researched")]
    SpellNotOwned(SpellId),

    #[error("already a member of guild {0}")]
    AlreadyInGuild(GuildId),

    #[error("guild is full")]
    GuildFull,

    #[error("guild is not open to new members")]
    GuildPrivate,

    #[error("not a member of any guild")]
    NotInGuild,
}

impl From<LedgerError> for Denial {
    fn from(err: LedgerError) -> Self {
        Denial::InsufficientResource {
            kind: err.kind,
            available: err.available,
            required: err.required,
        }
    }
}

/// Battle state machine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("not enough mana: have {available}, need {required}")]
    InsufficientMana { available: u64, required: u64 },

    #[error("battle is already over")]
    BattleAlreadyResolved,

    #[error("it is the {actual}'s turn, not the {expected}'s")]
    WrongTurnOwner { expected: TurnOwner, actual: TurnOwner },

    #[error("spell {0} cannot be cast in battle")]
    SpellNotCastable(SpellId),

    #[error("no battle in progress")]
    NoActiveBattle,
}

impl BattleError {
    /// Whether the error is a caller bug rather than a player mistake
    pub fn is_protocol_misuse(&self) -> bool {
        !matches!(self, BattleError::InsufficientMana { .. })
    }
}

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("denied: {0}")]
    Denied(#[from] Denial),

    #[error("battle error: {0}")]
    Battle(#[from] BattleError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: CatalogKind, id: String },

    #[error("character not found: {0}")]
    CharacterNotFound(crate::CharacterId),

    #[error("invalid character: {0}")]
    InvalidCharacter(String),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("persistence failure: {0}")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a store error without altering it
    pub fn persistence<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Persistence(Box::new(err))
    }

    pub fn not_found(kind: CatalogKind, id: impl std::fmt::Display) -> Self {
        Error::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// The denial, if this is a user-facing refusal
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Error::Denied(d) => Some(d),
            _ => None,
        }
    }
}

impl From<LedgerError> for Error {
    fn from(err: LedgerError) -> Self {
        Error::Denied(err.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}
