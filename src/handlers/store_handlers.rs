use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::db::DbPool;
use crate::dto::{CreateStoreDto, MessageResponse, StoreResponse, UpdateStoreDto};
use crate::errors::{ApiError, ErrorBody};
use crate::models::Store;
use crate::repo;
use crate::validation::{ValidatedJson, ValidatedPath};

const DUPLICATE_STORE: &str = "A store with that name already exists.";

/// Loads the items and tags owned by a store
pub(crate) fn store_response(pool: &DbPool, store: Store) -> Result<StoreResponse, ApiError> {
    let items = repo::list_items_for_store(pool, &store)?;
    let tags = repo::list_tags_for_store(pool, &store)?;
    Ok(StoreResponse::new(store, items, tags))
}

/// Fetches a store or fails with 404
pub(crate) fn find_store(pool: &DbPool, store_id: i32) -> Result<Store, ApiError> {
    repo::get_store(pool, store_id)?.ok_or_else(|| ApiError::not_found("Store not found."))
}

/// Handler for creating a new store
///
/// This function handles POST requests to `/store`.
///
/// ### Returns
///
/// 201 with the new store, or 400 if the name is missing or already taken
#[utoipa::path(
    post,
    path = "/store",
    tag = "stores",
    request_body = CreateStoreDto,
    responses(
        (status = 201, description = "Store created", body = StoreResponse),
        (status = 400, description = "Invalid payload or duplicate name", body = ErrorBody)
    )
)]
#[instrument(skip(pool, payload), fields(name = %payload.name))]
pub async fn create_store_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedJson(payload): ValidatedJson<CreateStoreDto>,
) -> Result<(StatusCode, Json<StoreResponse>), ApiError> {
    info!("Creating new store");

    let store = repo::create_store(&pool, &payload.name)
        .map_err(|e| ApiError::conflict_or_internal(e, DUPLICATE_STORE))?;

    info!("Successfully created store with id: {}", store.get_id());

    Ok((StatusCode::CREATED, Json(StoreResponse::new(store, Vec::new(), Vec::new()))))
}

/// Handler for listing all stores
///
/// This function handles GET requests to `/store`.
#[utoipa::path(
    get,
    path = "/store",
    tag = "stores",
    responses((status = 200, description = "All stores", body = Vec<StoreResponse>))
)]
#[instrument(skip(pool))]
pub async fn list_stores_handler(
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<StoreResponse>>, ApiError> {
    debug!("Listing all stores");

    let stores = repo::list_stores(&pool)?
        .into_iter()
        .map(|store| store_response(&pool, store))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Retrieved {} stores", stores.len());

    Ok(Json(stores))
}

/// Handler for retrieving a specific store
///
/// This function handles GET requests to `/store/{store_id}`.
#[utoipa::path(
    get,
    path = "/store/{store_id}",
    tag = "stores",
    params(("store_id" = i32, Path, description = "Store ID")),
    responses(
        (status = 200, description = "The store with its items and tags", body = StoreResponse),
        (status = 404, description = "Store not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool))]
pub async fn get_store_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedPath(store_id): ValidatedPath<i32>,
) -> Result<Json<StoreResponse>, ApiError> {
    debug!("Retrieving store");

    let store = find_store(&pool, store_id)?;

    Ok(Json(store_response(&pool, store)?))
}

/// Handler for renaming a store
///
/// This function handles PUT requests to `/store/{store_id}`.
#[utoipa::path(
    put,
    path = "/store/{store_id}",
    tag = "stores",
    params(("store_id" = i32, Path, description = "Store ID")),
    request_body = UpdateStoreDto,
    responses(
        (status = 200, description = "Store renamed", body = StoreResponse),
        (status = 400, description = "Invalid payload or duplicate name", body = ErrorBody),
        (status = 404, description = "Store not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool, payload), fields(name = %payload.name))]
pub async fn update_store_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedPath(store_id): ValidatedPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateStoreDto>,
) -> Result<Json<StoreResponse>, ApiError> {
    info!("Updating store");

    let store = repo::update_store(&pool, store_id, &payload.name)
        .map_err(|e| ApiError::conflict_or_internal(e, DUPLICATE_STORE))?
        .ok_or_else(|| ApiError::not_found("Store not found."))?;

    Ok(Json(store_response(&pool, store)?))
}

/// Handler for deleting a store along with its items and tags
///
/// This function handles DELETE requests to `/store/{store_id}`.
#[utoipa::path(
    delete,
    path = "/store/{store_id}",
    tag = "stores",
    params(("store_id" = i32, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store deleted", body = MessageResponse),
        (status = 404, description = "Store not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool))]
pub async fn delete_store_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedPath(store_id): ValidatedPath<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("Deleting store with id: {}", store_id);

    if !repo::delete_store(&pool, store_id)? {
        debug!("Store not found");
        return Err(ApiError::not_found("Store not found."));
    }

    info!("Successfully deleted store with id: {}", store_id);

    Ok(Json(MessageResponse::new("Store deleted.")))
}
