//! Database models for persistent storage.

mod character;
mod membership;
mod ownership;

pub use character::*;
pub use membership::*;
pub use ownership::*;
