/// Database handle
use sqlx::SqlitePool;

/// Handle over the connection pool, constructed once at startup and injected
/// into the application state. Query functions in the vertical slices take
/// the pool explicitly so there is no hidden global client.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
