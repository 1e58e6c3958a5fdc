//! SQLite connection pooling.
//!
//! Campus runs against a single SQLite file per deployment, so the pool
//! exists to let concurrent request handlers share connections, not to
//! spread load. Every connection enables foreign keys (the one-avatar-
//! per-student invariant hangs off the `student_id` constraints);
//! file-backed databases additionally get WAL mode and a busy timeout so
//! avatar uploads do not block catalog reads.

use campus_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Open the database file at `db_path` and run any pending migrations.
///
/// `max_size` comes from `ServerConfig::pool_size`. SQLite allows one
/// writer at a time, so a handful of connections is enough.
pub fn init_pool(db_path: &str, max_size: u32) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
    });
    build(manager, max_size)
}

/// Open a fresh in-memory database, primarily for tests.
///
/// Each call takes a unique shared-cache URI: connections within one
/// pool see the same data, while separate pools stay isolated from each
/// other even when tests run in parallel.
pub fn init_memory_pool() -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static NEXT_DB: AtomicU64 = AtomicU64::new(0);
    let uri = format!(
        "file:campus_test_{}?mode=memory&cache=shared",
        NEXT_DB.fetch_add(1, Ordering::Relaxed)
    );

    let manager = SqliteConnectionManager::file(uri)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    build(manager, 4)
}

fn build(manager: SqliteConnectionManager, max_size: u32) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| Error::database(format!("cannot build connection pool: {e}")))?;

    migrations::run_migrations(&*get_conn(&pool)?)?;

    Ok(pool)
}

/// Check a connection out of the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("connection pool unavailable: {e}")))
}
