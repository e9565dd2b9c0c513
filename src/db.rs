use anyhow::Context;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Error as PoolError, Pool};
use diesel::sqlite::SqliteConnection;
use r2d2::CustomizeConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Per-connection SQLite settings applied whenever the pool opens a connection
///
/// SQLite keeps `foreign_keys` off unless asked, and the cascades on
/// `items`, `tags` and `items_tags` depend on it.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, PoolError> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), PoolError> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(PoolError::QueryError)
    }
}

/// Strips a `sqlite://` scheme so both `sqlite:///data.db` and `data.db` work
pub fn normalize_database_url(database_url: &str) -> &str {
    database_url
        .strip_prefix("sqlite:///")
        .or_else(|| database_url.strip_prefix("sqlite://"))
        .unwrap_or(database_url)
}

pub fn init_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(normalize_database_url(database_url));
    Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .with_context(|| format!("Failed to create pool for {database_url}"))
}
