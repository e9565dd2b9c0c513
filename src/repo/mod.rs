/// Repository module
///
/// This module provides the data access layer for the application.
/// Each function takes the connection pool, performs one unit of work
/// against the database and returns an `anyhow::Result`, leaving the
/// translation into HTTP errors to the handlers.

mod store_repo;
mod item_repo;
mod tag_repo;
mod user_repo;

// Re-export all repository functions
pub use store_repo::*;
pub use item_repo::*;
pub use tag_repo::*;
pub use user_repo::*;
