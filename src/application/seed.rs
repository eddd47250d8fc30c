//! Initial gift import from a JSON document.
//!
//! The document is either a bare array of gifts or an object with a `docs`
//! array. Nothing is written when the collection already holds gifts.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;

use crate::application::repos::{GiftsRepo, RepoError};
use crate::domain::error::DomainError;
use crate::domain::gifts::{GiftRecord, NewGift};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("seed file is not a valid gift document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted(u64),
    SkippedNonEmpty(u64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeedDocument {
    List(Vec<NewGift>),
    Wrapped { docs: Vec<NewGift> },
}

pub fn parse_seed(raw: &[u8]) -> Result<Vec<NewGift>, SeedError> {
    let document: SeedDocument = serde_json::from_slice(raw)?;
    Ok(match document {
        SeedDocument::List(gifts) => gifts,
        SeedDocument::Wrapped { docs } => docs,
    })
}

pub async fn read_seed_file(path: &Path) -> Result<Vec<NewGift>, SeedError> {
    let raw = tokio::fs::read(path).await.map_err(|source| SeedError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_seed(&raw)
}

#[derive(Clone)]
pub struct GiftSeeder {
    repo: Arc<dyn GiftsRepo>,
}

impl GiftSeeder {
    pub fn new(repo: Arc<dyn GiftsRepo>) -> Self {
        Self { repo }
    }

    pub async fn seed_from_file(&self, path: &Path) -> Result<SeedOutcome, SeedError> {
        let gifts = read_seed_file(path).await?;
        self.seed_if_empty(gifts).await
    }

    pub async fn seed_if_empty(&self, gifts: Vec<NewGift>) -> Result<SeedOutcome, SeedError> {
        let existing = self.repo.count_gifts().await?;
        if existing > 0 {
            info!(
                target = "giftlink::seed",
                existing, "gift collection already populated; skipping import"
            );
            return Ok(SeedOutcome::SkippedNonEmpty(existing));
        }

        let records = prepare(gifts, OffsetDateTime::now_utc())?;
        let inserted = self.repo.insert_gifts(&records).await?;
        info!(target = "giftlink::seed", inserted, "gifts imported");
        Ok(SeedOutcome::Inserted(inserted))
    }
}

fn prepare(gifts: Vec<NewGift>, now: OffsetDateTime) -> Result<Vec<GiftRecord>, DomainError> {
    let mut seen = HashSet::with_capacity(gifts.len());
    let mut records = Vec::with_capacity(gifts.len());
    for gift in gifts {
        gift.validate()?;
        let record = gift.into_record(now);
        if !seen.insert(record.id.clone()) {
            return Err(DomainError::DuplicateGiftId(record.id));
        }
        records.push(record);
    }
    Ok(records)
}
