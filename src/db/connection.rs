use std::path::Path;

use tokio::sync::OnceCell;

use crate::config::DatabaseConfig;
use crate::state::DbPool;

/// Environment variable holding the database connection string.
pub const DATABASE_URL_ENV: &str = "STRANDS_DATABASE_URL";

/// Owns the process-wide database handle.
///
/// The pool is opened on the first `connect()` and memoized; later calls hand
/// back the same pool. A missing connection string is not an error: `connect()`
/// logs a warning and yields `None` so the caller can decide what to do.
pub struct ConnectionManager {
    url: Option<String>,
    pool_size: u32,
    pool: OnceCell<DbPool>,
}

impl ConnectionManager {
    pub fn new(url: Option<String>, pool_size: u32) -> Self {
        Self {
            url: url.filter(|u| !u.trim().is_empty()),
            pool_size,
            pool: OnceCell::new(),
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(config.url.clone(), config.pool_size)
    }

    pub fn is_connected(&self) -> bool {
        self.pool.initialized()
    }

    pub async fn connect(&self) -> anyhow::Result<Option<DbPool>> {
        if let Some(pool) = self.pool.get() {
            tracing::info!("Already connected to database");
            return Ok(Some(pool.clone()));
        }

        let Some(url) = self.url.as_deref() else {
            tracing::warn!("{} not set; database connection skipped", DATABASE_URL_ENV);
            return Ok(None);
        };

        let pool = self
            .pool
            .get_or_try_init(|| async {
                let pool = open(url, self.pool_size)?;
                super::run_migrations(&pool)?;
                tracing::info!("Connected to database");
                Ok::<_, anyhow::Error>(pool)
            })
            .await?;

        Ok(Some(pool.clone()))
    }

    /// Release the pool. Connections already checked out stay valid until dropped.
    pub fn close(self) {
        if self.pool.into_inner().is_some() {
            tracing::info!("Database connection closed");
        }
    }
}

fn open(url: &str, pool_size: u32) -> anyhow::Result<DbPool> {
    let target = url.strip_prefix("sqlite://").unwrap_or(url);
    if target == ":memory:" {
        super::create_memory_pool()
    } else {
        super::create_pool_sized(Path::new(target), pool_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_without_url_is_a_noop() {
        let manager = ConnectionManager::new(None, 4);
        assert!(manager.connect().await.unwrap().is_none());
        assert!(!manager.is_connected());
    }

    #[tokio::test]
    async fn blank_url_counts_as_absent() {
        let manager = ConnectionManager::new(Some("   ".into()), 4);
        assert!(manager.connect().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn connect_memoizes_the_pool() {
        let tmp = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", tmp.path().join("strands.db").display());
        let manager = ConnectionManager::new(Some(url), 2);

        let first = manager.connect().await.unwrap().unwrap();
        {
            let conn = first.get().unwrap();
            conn.execute(
                "INSERT INTO users (id, external_id, username, name, created_at)
                 VALUES ('u1', 'ext-1', 'alice', 'Alice', '2025-01-01T00:00:00.000000Z')",
                [],
            )
            .unwrap();
        }

        let second = manager.connect().await.unwrap().unwrap();
        let conn = second.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert!(manager.is_connected());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_connects_share_one_pool() {
        // Each in-memory pool is its own database, so a second pool would not see the row.
        let manager = ConnectionManager::new(Some(":memory:".into()), 1);

        let (first, second) = tokio::join!(manager.connect(), manager.connect());
        let first = first.unwrap().unwrap();
        let second = second.unwrap().unwrap();

        {
            let conn = first.get().unwrap();
            conn.execute(
                "INSERT INTO users (id, external_id, username, name, created_at)
                 VALUES ('u1', 'ext-1', 'alice', 'Alice', '2025-01-01T00:00:00.000000Z')",
                [],
            )
            .unwrap();
        }

        let conn = second.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert!(manager.is_connected());
    }

    #[tokio::test]
    async fn memory_url_runs_migrations() {
        let manager = ConnectionManager::new(Some(":memory:".into()), 8);
        let pool = manager.connect().await.unwrap().unwrap();
        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM threads", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn close_after_connect() {
        let manager = ConnectionManager::new(Some(":memory:".into()), 1);
        manager.connect().await.unwrap();
        manager.close();
    }
}
