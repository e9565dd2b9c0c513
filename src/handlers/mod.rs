/// Web API Handlers
///
/// This module contains the handlers for the RESTful API endpoints.
/// Each handler extracts what it needs from the request (state, path,
/// validated body, bearer token), calls the repository functions and turns
/// the outcome into a response or an `ApiError`.

pub(crate) mod store_handlers;
pub(crate) mod item_handlers;
pub(crate) mod tag_handlers;
pub(crate) mod user_handlers;

// Re-export all handlers
pub use store_handlers::*;
pub use item_handlers::*;
pub use tag_handlers::*;
pub use user_handlers::*;
