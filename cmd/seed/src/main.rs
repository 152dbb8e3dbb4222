//! # seed
//!
//! Applies `sql/schema.sql` to the configured PostgreSQL database and fills
//! it with a small demo board. Everything goes through the service layer, so
//! the data obeys the same validation as API writes.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use configs::Settings;
use secrecy::ExposeSecret;
use serde_json::json;
use services::Services;
use storage_adapters::{PgStore, PoolConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("loading configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter)),
        )
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))?;

    let db = &settings.database;
    let config = PoolConfig::new(db.url.expose_secret())
        .with_max_connections(2)
        .with_acquire_timeout(db.acquire_timeout)
        .with_statement_timeout(db.statement_timeout);
    let store = Arc::new(PgStore::connect(&config).await.context("connecting to PostgreSQL")?);

    store.apply_schema().await.context("applying schema")?;
    tracing::info!("schema applied");

    let services = Services::new(store.clone());
    seed(&services).await?;

    let snapshot = store.stats().snapshot();
    tracing::info!(
        checked_out = snapshot.checked_out,
        released = snapshot.released,
        "seeding complete"
    );
    Ok(())
}

async fn seed(services: &Services) -> Result<()> {
    let ada = services
        .users
        .create(&json!({ "name": "Ada Lovelace", "email": "ada@example.com" }))
        .await?;
    let grace = services
        .users
        .create(&json!({ "name": "Grace Hopper", "email": "grace@example.com" }))
        .await?;

    let board = services
        .boards
        .create(&json!({ "name": "Launch plan", "adminUserId": ada.id }))
        .await?;
    let list = services
        .lists
        .create(&json!({ "name": "To do", "boardId": board.id }))
        .await?;

    let card = services
        .cards
        .create(
            &list.id.to_string(),
            &json!({
                "title": "Write the release notes",
                "description": "Summarise every change since the last tag",
                "due_date": "2026-12-01",
                "ownerUserId": ada.id,
            }),
        )
        .await?;
    services
        .cards
        .assign(&card.id.to_string(), &grace.id.to_string(), &json!({}))
        .await?;

    tracing::info!(
        board_id = %board.id,
        list_id = %list.id,
        card_id = %card.id,
        "demo board created"
    );
    Ok(())
}
