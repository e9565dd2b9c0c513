/// Stores REST API
///
/// This library provides a small inventory service: stores own items and
/// tags, items and tags in the same store can be linked, and users register
/// and log in to obtain JWTs that guard the item and user endpoints.
///
/// ### Modules
///
/// - `auth`: Token issuing, verification, revocation and password hashing
/// - `config`: Layered configuration (defaults, file, environment, CLI)
/// - `db`: Database connection management
/// - `dto`: Request and response bodies
/// - `errors`: Error taxonomy and its HTTP rendering
/// - `handlers`: HTTP request handlers
/// - `models`: Data structures mapped to the database tables
/// - `openapi`: OpenAPI document and Swagger UI page
/// - `repo`: Repository layer for database operations
/// - `schema`: Database schema definitions
/// - `validation`: Validating JSON extractor
///
/// ### Web API
///
/// - `GET|POST /store`, `GET|PUT|DELETE /store/{store_id}`
/// - `GET|POST /item`, `GET|PUT|DELETE /item/{item_id}` (bearer token)
/// - `GET /tag`, `GET|POST /store/{store_id}/tag`, `GET|PUT|DELETE /tag/{tag_id}`
/// - `POST|DELETE /item/{item_id}/tag/{tag_id}`
/// - `POST /register`, `POST /login`, `POST /refresh`, `POST /logout`
/// - `GET /user`, `GET|DELETE /user/{user_id}` (bearer token)
/// - `GET /openapi.json`, `GET /swagger-ui`

/// Authentication and authorization
pub mod auth;

/// Configuration module
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects
pub mod dto;

/// Error types
pub mod errors;

/// HTTP handlers
pub mod handlers;

/// Data models module
pub mod models;

/// API documentation
pub mod openapi;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Request validation
pub mod validation;

#[cfg(test)]
mod test_utils;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use auth::TokenManager;
use handlers::*;

/// State shared by every handler
///
/// Handlers extract only the part they need (`State<Arc<DbPool>>` or
/// `State<Arc<TokenManager>>`) through the `FromRef` impls below.
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub tokens: Arc<TokenManager>,
}

impl AppState {
    pub fn new(pool: Arc<db::DbPool>, tokens: Arc<TokenManager>) -> Self {
        Self { pool, tokens }
    }
}

impl FromRef<AppState> for Arc<db::DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<TokenManager> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Creates the application router with all routes configured
///
/// ### Arguments
///
/// * `state` - The database pool and token manager shared with all handlers
///
/// ### Returns
///
/// An Axum Router with every API route, the documentation routes, request
/// tracing and CORS
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Stores
        .route("/store", get(list_stores_handler).post(create_store_handler))
        .route(
            "/store/{store_id}",
            get(get_store_handler).put(update_store_handler).delete(delete_store_handler),
        )
        // Items
        .route("/item", get(list_items_handler).post(create_item_handler))
        .route(
            "/item/{item_id}",
            get(get_item_handler).put(update_item_handler).delete(delete_item_handler),
        )
        // Tags
        .route("/tag", get(list_tags_handler))
        .route(
            "/store/{store_id}/tag",
            get(list_tags_in_store_handler).post(create_tag_in_store_handler),
        )
        .route(
            "/tag/{tag_id}",
            get(get_tag_handler).put(update_tag_handler).delete(delete_tag_handler),
        )
        .route(
            "/item/{item_id}/tag/{tag_id}",
            post(link_tag_to_item_handler).delete(unlink_tag_from_item_handler),
        )
        // Users and tokens
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/refresh", post(refresh_handler))
        .route("/logout", post(logout_handler))
        .route("/user", get(list_users_handler))
        .route("/user/{user_id}", get(get_user_handler).delete(delete_user_handler))
        .merge(openapi::docs_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the embedded migrations
///
/// Applies every pending migration under `migrations/`; already-applied
/// migrations are skipped, so this is safe to call on every start.
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    tracing::debug!("Applied {} migrations", applied.len());

    Ok(())
}
