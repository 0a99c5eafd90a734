use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Open a pool for `database_url`, creating the database file (and its parent
/// directory) when missing.
///
/// In-memory databases live and die with their connection, so they get a
/// single connection that is never recycled.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let in_memory = is_in_memory(database_url);
    let mut opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    if in_memory {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;
        return Ok(pool);
    }

    if let Some(parent) = file_path(database_url).and_then(|p| p.parent().map(Path::to_path_buf)) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(&parent)?;
        }
    }

    // WAL lets readers proceed while the single writer holds the lock.
    opts = opts.journal_mode(SqliteJournalMode::Wal);
    let pool = SqlitePoolOptions::new()
        .max_connections(16)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(opts)
        .await?;
    Ok(pool)
}

/// Create the `profiles` table and its indexes if absent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next()?;
    if path.is_empty() {
        None
    } else {
        Some(Path::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_urls_are_detected() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:salaries?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://data/salaries.db"));
    }

    #[test]
    fn file_path_strips_scheme_and_query() {
        assert_eq!(
            file_path("sqlite://data/salaries.db?mode=rwc"),
            Some(Path::new("data/salaries.db"))
        );
        assert_eq!(file_path("sqlite:local.db"), Some(Path::new("local.db")));
        assert_eq!(file_path("postgres://elsewhere"), None);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = create_pool("sqlite::memory:").await.expect("pool");
        run_migrations(&pool).await.expect("first run");
        run_migrations(&pool).await.expect("second run");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 0);
    }
}
