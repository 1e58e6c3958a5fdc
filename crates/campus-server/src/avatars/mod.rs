//! Avatar storage subsystem.
//!
//! Keeps two copies of each student's avatar: a file on disk under the
//! configured root ([`store`]) and a database row with metadata plus the
//! same bytes ([`campus_db::queries::avatars`]). [`service`] orchestrates
//! the dual write; [`catalog`] is the read path.

pub mod catalog;
pub mod service;
pub mod store;

pub use catalog::AvatarCatalog;
pub use service::AvatarService;
pub use store::AvatarStore;
