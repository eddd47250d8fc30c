//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::gifts::GiftRecord;
use crate::domain::users::UserRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Conjunction of optional gift predicates. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GiftQueryFilter {
    /// Case-insensitive substring of the gift name.
    pub name: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    /// Inclusive upper bound on `age_years`.
    pub max_age_years: Option<f64>,
}

#[async_trait]
pub trait GiftsRepo: Send + Sync {
    async fn list_gifts(&self) -> Result<Vec<GiftRecord>, RepoError>;

    async fn find_gift(&self, id: &str) -> Result<Option<GiftRecord>, RepoError>;

    async fn search_gifts(&self, filter: &GiftQueryFilter) -> Result<Vec<GiftRecord>, RepoError>;

    async fn create_gift(&self, gift: GiftRecord) -> Result<GiftRecord, RepoError>;

    async fn count_gifts(&self) -> Result<u64, RepoError>;

    /// Insert all gifts atomically, returning the number written.
    async fn insert_gifts(&self, gifts: &[GiftRecord]) -> Result<u64, RepoError>;
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError>;

    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError>;

    /// Returns `None` when no user has the given email.
    async fn update_first_name(
        &self,
        email: &str,
        first_name: &str,
        updated_at: OffsetDateTime,
    ) -> Result<Option<UserRecord>, RepoError>;
}
