use thiserror::Error;

/// Failures of the process-level plumbing: listener, pool, schema, logging.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),
    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migrations failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("server stopped: {0}")]
    Serve(#[source] std::io::Error),
}
