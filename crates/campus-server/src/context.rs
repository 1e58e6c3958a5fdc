//! Shared application context.
//!
//! [`AppContext`] is the central struct shared across all route handlers via
//! Axum state. It is cheaply cloneable because it only holds `Arc`s and the
//! pool handle (which is itself an `Arc` internally).

use std::sync::Arc;

use campus_core::config::Config;
use campus_db::pool::DbPool;

use crate::avatars::{AvatarCatalog, AvatarService};

/// Application context shared by all request handlers (via Axum state).
#[derive(Clone)]
pub struct AppContext {
    /// Database connection pool.
    pub db: DbPool,
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Avatar upload orchestration.
    pub avatars: Arc<AvatarService>,
    /// Avatar read path.
    pub catalog: Arc<AvatarCatalog>,
}
