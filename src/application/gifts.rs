use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;

use crate::application::repos::{GiftsRepo, RepoError};
use crate::application::search::{SearchParams, SearchPlan};
use crate::domain::error::DomainError;
use crate::domain::gifts::{GiftRecord, NewGift};

#[derive(Debug, Error)]
pub enum GiftError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("gift `{id}` already exists")]
    Duplicate { id: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct GiftService {
    repo: Arc<dyn GiftsRepo>,
}

impl GiftService {
    pub fn new(repo: Arc<dyn GiftsRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<GiftRecord>, GiftError> {
        Ok(self.repo.list_gifts().await?)
    }

    pub async fn find(&self, id: &str) -> Result<Option<GiftRecord>, GiftError> {
        Ok(self.repo.find_gift(id).await?)
    }

    pub async fn search(&self, params: &SearchParams) -> Result<Vec<GiftRecord>, GiftError> {
        match params.plan() {
            SearchPlan::Filter(filter) => Ok(self.repo.search_gifts(&filter).await?),
            SearchPlan::MatchNothing => Ok(Vec::new()),
        }
    }

    pub async fn create(&self, gift: NewGift) -> Result<GiftRecord, GiftError> {
        gift.validate()?;
        let record = gift.into_record(OffsetDateTime::now_utc());
        let id = record.id.clone();

        let created = self.repo.create_gift(record).await.map_err(|err| match err {
            RepoError::Duplicate { .. } => GiftError::Duplicate { id: id.clone() },
            other => GiftError::Repo(other),
        })?;

        info!(target = "giftlink::gifts", gift_id = %created.id, "gift created");
        Ok(created)
    }
}
