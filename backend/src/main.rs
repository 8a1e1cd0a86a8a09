//! MacroTrack Backend
//!
//! Nutrition goal calculation and daily meal logging.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling and routing
//! - Services: Mutation sequencing and recomputation over the shared domain crate
//! - Store: Postgres or in-memory adapters behind async traits

use anyhow::Result;
use macrotrack_backend::{
    config::{self, StoreBackend},
    routes,
    state::{AppState, Stores},
    store::{MemoryStore, PgStore},
};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let production = config::AppConfig::is_production();
    init_tracing(production);

    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if production { "production" } else { "development" },
        store = ?config.store.backend,
        "Starting MacroTrack Backend"
    );

    if production {
        let problems = config.production_problems();
        if !problems.is_empty() {
            for problem in &problems {
                error!(%problem, "Configuration error");
            }
            anyhow::bail!("Invalid production configuration");
        }
        if config.database.url.contains("localhost") {
            warn!("Database URL points at localhost");
        }
    }

    let stores = connect_stores(&config).await?;
    let state = AppState::new(stores, config.clone());
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

/// Build the store adapter named in configuration
async fn connect_stores(config: &config::AppConfig) -> Result<Stores> {
    match config.store.backend {
        StoreBackend::Postgres => {
            info!("Connecting to database...");
            let store = PgStore::connect(&config.database).await?;

            // Production runs migrations as a separate job
            if !config::AppConfig::is_production() {
                store.migrate().await?;
            }

            Ok(Stores::postgres(store))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; data is lost on restart");
            Ok(Stores::memory(MemoryStore::new()))
        }
    }
}

/// JSON logs in production, pretty logs otherwise; `RUST_LOG` overrides the filter
fn init_tracing(production: bool) {
    let default_filter = if production {
        "macrotrack_backend=info,tower_http=info"
    } else {
        "macrotrack_backend=debug,tower_http=debug,sqlx=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if production {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
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
