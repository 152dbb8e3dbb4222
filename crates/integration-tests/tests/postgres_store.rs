//! Port contracts against a real PostgreSQL database.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -p integration-tests
//! --test postgres_store -- --ignored`. The schema is applied on start.

use std::time::Duration;

use integration_tests::contracts;
use storage_adapters::{PgStore, PoolConfig};

async fn connect() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let config = PoolConfig::new(url)
        .with_max_connections(4)
        .with_acquire_timeout(Duration::from_secs(5));
    let store = PgStore::connect(&config).await.expect("connect");
    store.apply_schema().await.expect("apply schema");
    store
}

#[tokio::test]
#[ignore = "requires database"]
async fn postgres_store_honours_port_contracts() {
    let store = connect().await;

    contracts::board_creation_links_its_admin(&store).await;
    contracts::failed_board_creation_leaves_no_board(&store).await;
    contracts::card_owner_is_written_with_the_card(&store).await;
    contracts::failed_owner_insert_leaves_no_card(&store).await;
    contracts::assignments_are_unique_and_ordered(&store).await;
    contracts::unknown_ids_read_as_absent(&store).await;

    let snapshot = store.stats().snapshot();
    assert!(snapshot.checked_out > 0);
    assert_eq!(snapshot.in_use(), 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn schema_can_be_applied_twice() {
    let store = connect().await;
    store.apply_schema().await.expect("second apply");
}
