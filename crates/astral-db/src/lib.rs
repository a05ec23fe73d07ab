//! Astral DB - Database layer using native_db
//!
//! Provides persistent storage for:
//! - Characters and their resource ledgers
//! - Building and spell unlocks
//! - Guild memberships
//!
//! [`DbStore`] implements [`astral_core::GameStore`], so it drops straight
//! into an [`astral_core::Game`].

mod error;
mod models;
mod store;

pub use error::{Error, Result};
pub use store::DbStore;
