//! # kanban-board
//!
//! Assembles the store selected by configuration, the services and the HTTP
//! router, then serves until SIGTERM or Ctrl+C.

mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use api_adapters::{build_router, serve, AppState};
use configs::{DatabaseSettings, Settings, StorageBackend};
use services::Services;
use storage_adapters::{InMemoryStore, PoolStats};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("loading configuration")?;
    telemetry::init(&settings.log)?;

    let (services, pool, storage) = open_store(&settings.database).await?;
    tracing::info!(storage, "store ready");

    let app = build_router(
        AppState::new(services, pool, storage),
        settings.server.cors_permissive,
    );
    serve(app, &settings.server.bind_addr()).await?;
    Ok(())
}

async fn open_store(db: &DatabaseSettings) -> Result<(Services, PoolStats, &'static str)> {
    match db.backend {
        StorageBackend::Memory => {
            tracing::warn!("using the in-memory store; data is lost on exit");
            let store = Arc::new(InMemoryStore::new());
            Ok((Services::new(store.clone()), store.stats(), "memory"))
        }
        StorageBackend::Postgres => open_postgres(db).await,
    }
}

#[cfg(feature = "db-postgres")]
async fn open_postgres(db: &DatabaseSettings) -> Result<(Services, PoolStats, &'static str)> {
    use secrecy::ExposeSecret;
    use storage_adapters::{PgStore, PoolConfig};

    let config = PoolConfig::new(db.url.expose_secret())
        .with_max_connections(db.max_connections)
        .with_acquire_timeout(db.acquire_timeout)
        .with_statement_timeout(db.statement_timeout);
    let store = Arc::new(
        PgStore::connect(&config)
            .await
            .context("connecting to PostgreSQL")?,
    );
    Ok((Services::new(store.clone()), store.stats(), "postgres"))
}

#[cfg(not(feature = "db-postgres"))]
async fn open_postgres(_db: &DatabaseSettings) -> Result<(Services, PoolStats, &'static str)> {
    anyhow::bail!("database.backend = postgres requires the `db-postgres` feature")
}
