//! Stratologia API server entry point.

use std::sync::Arc;

use stratologia_api::config::Settings;
use stratologia_api::error::AppError;
use stratologia_api::state::AppState;
use stratologia_api::{build_router, cors_layer, telemetry};
use stratologia_core::clock::SystemClock;
use stratologia_mailer::SmtpNotifier;
use stratologia_store::PgEnlistmentRepository;
use tower_http::trace::TraceLayer;

const MAX_DB_CONNECTIONS: u32 = 10;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // A missing .env file is fine; real deployments set the environment.
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let tracer_provider = telemetry::init(settings.otlp_endpoint.as_deref())?;

    tracing::info!("Starting Stratologia API server");

    let pool = stratologia_store::connect(&settings.database_url, MAX_DB_CONNECTIONS).await?;
    stratologia_store::run_migrations(&pool).await?;

    let repository = Arc::new(PgEnlistmentRepository::new(pool));
    let notifier = Arc::new(SmtpNotifier::new(&settings.mailer));
    let app_state = AppState::new(
        Arc::new(SystemClock),
        repository.clone(),
        repository,
        notifier,
        settings.allow_origins.clone(),
    );

    let app = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings.allow_origins));

    tracing::info!(
        addr = %settings.bind_addr,
        origins = ?settings.allow_origins,
        smtp_host = %settings.mailer.host,
        "Listening"
    );

    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(provider) = tracer_provider {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "failed to flush trace exporter");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
