use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use project_dashboard::auth::provider::HttpIdentityProvider;
use project_dashboard::config;
use project_dashboard::database::{DatabaseManager, PgPostStore};
use project_dashboard::state::AppState;

#[derive(Parser)]
#[command(name = "project-dashboard")]
#[command(about = "Project dashboard web server")]
#[command(version)]
struct Args {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Apply schema/schema.sql before serving")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = config::config().clone();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting project dashboard in {:?} mode", config.environment);

    let pool = DatabaseManager::connect_lazy(&config.database).context("failed to configure database pool")?;
    if args.migrate || config.database.auto_migrate {
        DatabaseManager::ensure_schema(&pool).await.context("failed to apply schema")?;
    }

    let posts = PgPostStore::new(
        pool.clone(),
        Duration::from_millis(config.database.slow_query_threshold_ms),
    );
    let provider = HttpIdentityProvider::new(&config.auth).context("failed to configure identity provider")?;

    let port = args.port.unwrap_or(config.server.port);
    let state = AppState::new(config, Arc::new(posts), Arc::new(provider))?;
    let app = project_dashboard::app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Project dashboard listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
