use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pms_api_rust::config::config;
use pms_api_rust::database::{BuildingRepository, DatabaseManager, MemoryBuildingRepository, PgBuildingRepository};
use pms_api_rust::services::BuildingService;

#[derive(Parser, Debug)]
#[command(name = "pms-api", version, about = "Storied building registry API")]
struct Args {
    /// Port to listen on (defaults to PMS_API_PORT, then PORT, then 3000)
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep buildings in process memory instead of PostgreSQL
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting PMS API in {:?} mode", config.environment);

    let mut pool_handle = None;
    let repository: Arc<dyn BuildingRepository> = if args.memory {
        tracing::warn!("Using in-memory building store; data is lost on exit");
        Arc::new(MemoryBuildingRepository::new())
    } else {
        let pool = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        DatabaseManager::register_schema(&pool)
            .await
            .context("failed to register building schema")?;
        pool_handle = Some(pool.clone());
        Arc::new(PgBuildingRepository::new(pool))
    };

    let app = pms_api_rust::app(Arc::new(BuildingService::new(repository)));

    // Allow tests or deployments to override port via env
    let port = args
        .port
        .or_else(|| {
            std::env::var("PMS_API_PORT")
                .ok()
                .or_else(|| std::env::var("PORT").ok())
                .and_then(|s| s.parse::<u16>().ok())
        })
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("PMS API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pool) = pool_handle {
        DatabaseManager::close(pool).await;
    }
    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
    tracing::info!("Shutdown signal received");
}
