//! Background database bootstrap run once at startup.
//!
//! The HTTP listener never waits on this: an unreachable database is logged
//! and requests that need it fail individually.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::application::seed::{GiftSeeder, SeedError, SeedOutcome};
use crate::infra::error::InfraError;
use crate::infra::telemetry::DB_CONNECT_FAILURES_TOTAL;

use super::PostgresRepositories;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Connect(#[from] InfraError),
    #[error("seeding failed: {0}")]
    Seed(#[from] SeedError),
}

/// Ping the database, apply migrations, then import `seed_file` into an empty
/// gift collection when one is configured.
pub async fn bootstrap(
    repos: Arc<PostgresRepositories>,
    seed_file: Option<&Path>,
) -> Result<Option<SeedOutcome>, BootstrapError> {
    repos.health_check().await.map_err(InfraError::from)?;

    PostgresRepositories::run_migrations(repos.pool())
        .await
        .map_err(InfraError::from)?;

    info!(target = "giftlink::db", "Connected to DB");

    let Some(path) = seed_file else {
        return Ok(None);
    };

    let outcome = GiftSeeder::new(repos).seed_from_file(path).await?;
    Ok(Some(outcome))
}

pub fn spawn_bootstrap(
    repos: Arc<PostgresRepositories>,
    seed_file: Option<PathBuf>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match bootstrap(repos, seed_file.as_deref()).await {
            Ok(_) => {}
            Err(BootstrapError::Connect(err)) => {
                counter!(DB_CONNECT_FAILURES_TOTAL).increment(1);
                error!(target = "giftlink::db", error = %err, "Failed to connect to DB");
            }
            Err(err @ BootstrapError::Seed(_)) => {
                error!(target = "giftlink::db", error = %err, "Failed to import gifts");
            }
        }
    })
}
