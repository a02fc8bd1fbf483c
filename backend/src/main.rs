//! Calorie Tracker Backend
//!
//! REST service for users, meals, dishes and daily nutrition reports.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: calorie intake and report logic
//! - Repositories: store traits over PostgreSQL (SQLx) or process memory

use anyhow::Result;
use calorie_tracker_backend::config::{AppConfig, StorageBackend};
use calorie_tracker_backend::{db, metrics, routes, state::AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if AppConfig::is_production() { "production" } else { "development" },
        backend = ?config.database.backend,
        "Starting Calorie Tracker Backend"
    );

    if AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let mut state = match config.database.backend {
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let db_pool = db::create_pool(&config.database).await?;

            // Production deployments run migrations as a separate job
            if !AppConfig::is_production() {
                info!("Running database migrations...");
                db::run_migrations(&db_pool).await?;
            }

            AppState::new(db_pool, config.clone())
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            AppState::in_memory(config.clone())
        }
    };

    if config.metrics.enabled {
        state = state.with_metrics(metrics::install_recorder()?);
        info!("Prometheus metrics exposed at /metrics");
    }

    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if AppConfig::is_production() {
            "calorie_tracker_backend=info,tower_http=info".into()
        } else {
            "calorie_tracker_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &AppConfig) -> Result<()> {
    if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
        warn!("Database URL contains localhost - ensure this is intentional for production");
    }

    let issues = config.production_issues();
    if !issues.is_empty() {
        for issue in &issues {
            error!("Configuration error: {}", issue);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
