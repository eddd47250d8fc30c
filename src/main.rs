use std::{process, sync::Arc};

use giftlink::{
    application::{
        error::AppError,
        seed::{GiftSeeder, SeedOutcome},
        tokens::TokenSigner,
    },
    config,
    infra::{
        db::{self, PostgresRepositories},
        error::InfraError,
        http::{self, AppState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Seed(args) => run_seed(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let pool = PostgresRepositories::connect_lazy(&settings.database)
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let repositories = Arc::new(PostgresRepositories::new(pool));

    let bootstrap_handle =
        db::spawn_bootstrap(repositories.clone(), settings.database.seed_file.clone());

    let tokens = match settings.auth.jwt_secret.as_deref() {
        Some(secret) => TokenSigner::new(secret),
        None => {
            warn!(
                target = "giftlink::auth",
                "JWT secret is not configured; issued tokens will not survive a restart"
            );
            TokenSigner::ephemeral()
        }
    };

    let state = AppState::new(repositories.clone(), repositories, tokens);
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::Bind(err)))?;

    info!(
        target = "giftlink::server",
        addr = %settings.server.addr,
        "Server running on port {}",
        settings.server.addr.port()
    );

    let result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::from(InfraError::Serve(err)));

    bootstrap_handle.abort();
    let _ = bootstrap_handle.await;

    result
}

async fn run_seed(settings: config::Settings, args: config::SeedArgs) -> Result<(), AppError> {
    let pool = PostgresRepositories::connect(&settings.database)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    let repositories = Arc::new(PostgresRepositories::new(pool));
    let outcome = GiftSeeder::new(repositories)
        .seed_from_file(&args.file)
        .await
        .map_err(|err| AppError::unexpected(err.to_string()))?;

    match outcome {
        SeedOutcome::Inserted(count) => info!(
            target = "giftlink::seed",
            count,
            file = %args.file.display(),
            "Inserted gifts"
        ),
        SeedOutcome::SkippedNonEmpty(existing) => info!(
            target = "giftlink::seed",
            existing,
            "Gifts collection already populated; nothing imported"
        ),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(target = "giftlink::server", "shutdown signal received");
}
