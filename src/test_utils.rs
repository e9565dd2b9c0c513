use crate::*;
use crate::auth::{TokenManager, TokenSettings};
use chrono::Duration;
use proptest::prelude::*;
use std::sync::Arc;

/// Sets up a test database with migrations applied
///
/// Every pooled connection must see the same in-memory database, hence the
/// uniquely named shared-cache URL.
pub fn setup_test_db() -> Arc<db::DbPool> {
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = db::init_pool(&database_url).expect("Failed to create pool");

    let mut conn = pool.get().expect("Failed to get connection");
    run_migrations(&mut conn).expect("Failed to run migrations");

    Arc::new(pool)
}

/// Token manager with the default lifetimes and admin identity 1
pub fn test_token_manager() -> Arc<TokenManager> {
    Arc::new(TokenManager::new(TokenSettings {
        secret: "test-secret".to_string(),
        access_ttl: Duration::minutes(15),
        refresh_ttl: Duration::days(30),
        admin_identity: 1,
    }))
}

/// Application state over a fresh test database
pub fn test_state() -> AppState {
    AppState::new(setup_test_db(), test_token_manager())
}

#[test]
fn test_setup_test_db_creates_tables() {
    use diesel::RunQueryDsl;
    use diesel::sql_types::Text;

    #[derive(diesel::QueryableByName, Debug)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let pool = setup_test_db();
    let mut conn = pool.get().unwrap();
    let table_names: Vec<TableName> = diesel::sql_query("SELECT name FROM sqlite_master WHERE type='table'")
        .load(&mut conn)
        .expect("Failed to load table names");

    for table in ["stores", "items", "tags", "items_tags", "users", "__diesel_schema_migrations"] {
        assert!(
            table_names.iter().any(|t| t.name == table),
            "Table '{}' not found in database",
            table
        );
    }
}

/// Generates a valid entity name of 1 to 80 characters
pub fn arb_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ]{1,80}"
}

/// Generates a valid price in [0.0, 10000.0] with cent precision
pub fn arb_price() -> impl Strategy<Value = f64> {
    (0u32..=1_000_000u32).prop_map(|cents| cents as f64 / 100.0)
}

/// Generates a negative price
pub fn arb_invalid_price() -> impl Strategy<Value = f64> {
    -10_000.0f64..-0.001f64
}
