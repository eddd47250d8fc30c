//! Domain layer types and invariants.

pub mod error;
pub mod gifts;
pub mod users;
