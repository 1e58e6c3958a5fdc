//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a temporary
//! avatar directory, and a full [`AppContext`]. The [`with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

use std::net::SocketAddr;
use std::sync::Arc;

use campus_core::config::Config;
use campus_core::StudentId;
use campus_db::pool::{init_memory_pool, DbPool};
use campus_db::queries::students;
use campus_server::avatars::{AvatarCatalog, AvatarService, AvatarStore};
use campus_server::context::AppContext;
use campus_server::router::build_router;
use tempfile::TempDir;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database and a temporary avatar directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    // Held so the avatar directory outlives the harness.
    _avatar_dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let avatar_dir = tempfile::tempdir().expect("failed to create avatar dir");

        let mut config = Config::default();
        config.avatars.dir = avatar_dir.path().to_path_buf();

        let store = AvatarStore::new(config.avatars.dir.clone());
        let avatars = Arc::new(AvatarService::new(store, db.clone()));
        let catalog = Arc::new(AvatarCatalog::new(db.clone()));

        let ctx = AppContext {
            db: db.clone(),
            config: Arc::new(config),
            avatars,
            catalog,
        };

        Self {
            ctx,
            db,
            _avatar_dir: avatar_dir,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> campus_db::pool::PooledConnection {
        campus_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    /// Insert a student directly and return its ID.
    pub fn enroll(&self, name: &str, age: i32) -> StudentId {
        let conn = self.conn();
        students::create_student(&conn, name, age, None)
            .expect("failed to create student")
            .id
    }
}
