//! Application services orchestrating domain logic and repositories.

pub mod auth;
pub mod error;
pub mod gifts;
pub mod passwords;
pub mod repos;
pub mod search;
pub mod seed;
pub mod tokens;
