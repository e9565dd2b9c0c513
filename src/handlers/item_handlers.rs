use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug, info, warn};

use crate::auth::{AccessToken, FreshAccessToken};
use crate::db::DbPool;
use crate::dto::{CreateItemDto, ItemResponse, MessageResponse, UpdateItemDto};
use crate::errors::{is_foreign_key_violation, ApiError, AuthErrorBody, ErrorBody};
use crate::handlers::store_handlers::find_store;
use crate::models::{Item, ItemChanges, NewItem};
use crate::repo;
use crate::validation::{ValidatedJson, ValidatedPath};

const DUPLICATE_ITEM: &str = "An item with that name already exists in that store.";

/// Resolves the store and tags of an item
pub(crate) fn item_response(pool: &DbPool, item: Item) -> Result<ItemResponse, ApiError> {
    let store = repo::get_store(pool, item.get_store_id())?.ok_or_else(|| {
        ApiError::Internal(anyhow::anyhow!(
            "Item {} references missing store {}",
            item.get_id(),
            item.get_store_id()
        ))
    })?;
    let tags = repo::list_tags_for_item(pool, &item)?;
    Ok(ItemResponse::new(item, store, tags))
}

/// Fetches an item or fails with 404
pub(crate) fn find_item(pool: &DbPool, item_id: i32) -> Result<Item, ApiError> {
    repo::get_item(pool, item_id)?.ok_or_else(|| ApiError::not_found("Item not found."))
}

/// Handler for creating a new item
///
/// This function handles POST requests to `/item` and requires a fresh
/// access token.
///
/// ### Returns
///
/// 201 with the new item, 404 if the store does not exist, or 400 if the
/// store already sells an item with that name
#[utoipa::path(
    post,
    path = "/item",
    tag = "items",
    request_body = CreateItemDto,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid payload or duplicate name", body = ErrorBody),
        (status = 401, description = "Missing, invalid or non-fresh token", body = AuthErrorBody),
        (status = 404, description = "Store not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool, _claims, payload), fields(name = %payload.name, store_id = payload.store_id))]
pub async fn create_item_handler(
    State(pool): State<Arc<DbPool>>,
    FreshAccessToken(_claims): FreshAccessToken,
    ValidatedJson(payload): ValidatedJson<CreateItemDto>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    info!("Creating new item");

    let store = find_store(&pool, payload.store_id)?;

    let new_item = NewItem {
        name: &payload.name,
        description: payload.description.as_deref(),
        price: payload.price,
        store_id: store.get_id(),
    };
    let item = repo::create_item(&pool, &new_item).map_err(|e| {
        if is_foreign_key_violation(&e) {
            ApiError::not_found("Store not found.")
        } else {
            ApiError::conflict_or_internal(e, DUPLICATE_ITEM)
        }
    })?;

    info!("Successfully created item with id: {}", item.get_id());

    Ok((StatusCode::CREATED, Json(ItemResponse::new(item, store, Vec::new()))))
}

/// Handler for listing all items
///
/// This function handles GET requests to `/item`.
#[utoipa::path(
    get,
    path = "/item",
    tag = "items",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All items", body = Vec<ItemResponse>),
        (status = 401, description = "Missing or invalid token", body = AuthErrorBody)
    )
)]
#[instrument(skip(pool, _claims))]
pub async fn list_items_handler(
    State(pool): State<Arc<DbPool>>,
    AccessToken(_claims): AccessToken,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    debug!("Listing all items");

    let items = repo::list_items(&pool)?
        .into_iter()
        .map(|item| item_response(&pool, item))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Retrieved {} items", items.len());

    Ok(Json(items))
}

/// Handler for retrieving a specific item
///
/// This function handles GET requests to `/item/{item_id}`.
#[utoipa::path(
    get,
    path = "/item/{item_id}",
    tag = "items",
    params(("item_id" = i32, Path, description = "Item ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The item with its store and tags", body = ItemResponse),
        (status = 401, description = "Missing or invalid token", body = AuthErrorBody),
        (status = 404, description = "Item not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool, _claims))]
pub async fn get_item_handler(
    State(pool): State<Arc<DbPool>>,
    AccessToken(_claims): AccessToken,
    ValidatedPath(item_id): ValidatedPath<i32>,
) -> Result<Json<ItemResponse>, ApiError> {
    debug!("Retrieving item");

    let item = find_item(&pool, item_id)?;

    Ok(Json(item_response(&pool, item)?))
}

/// Handler for updating an item
///
/// This function handles PUT requests to `/item/{item_id}`. `name` and
/// `price` are always replaced; `description` and `store_id` only when
/// present. An item that still carries tags cannot move to another store.
#[utoipa::path(
    put,
    path = "/item/{item_id}",
    tag = "items",
    params(("item_id" = i32, Path, description = "Item ID")),
    request_body = UpdateItemDto,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Invalid payload or duplicate name", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = AuthErrorBody),
        (status = 404, description = "Item or target store not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool, _claims, payload), fields(name = %payload.name))]
pub async fn update_item_handler(
    State(pool): State<Arc<DbPool>>,
    AccessToken(_claims): AccessToken,
    ValidatedPath(item_id): ValidatedPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateItemDto>,
) -> Result<Json<ItemResponse>, ApiError> {
    info!("Updating item");

    let item = find_item(&pool, item_id)?;

    if let Some(store_id) = payload.store_id.filter(|&id| id != item.get_store_id()) {
        find_store(&pool, store_id)?;
        if !repo::list_tags_for_item(&pool, &item)?.is_empty() {
            warn!("Refusing to move a tagged item to store {}", store_id);
            return Err(ApiError::Validation(
                "Remove the item's tags before moving it to another store.".to_string(),
            ));
        }
    }

    let changes = ItemChanges {
        name: Some(payload.name),
        description: payload.description,
        price: Some(payload.price),
        store_id: payload.store_id,
    };
    let updated = repo::update_item(&pool, item_id, &changes)
        .map_err(|e| ApiError::conflict_or_internal(e, DUPLICATE_ITEM))?
        .ok_or_else(|| ApiError::not_found("Item not found."))?;

    Ok(Json(item_response(&pool, updated)?))
}

/// Handler for deleting an item
///
/// This function handles DELETE requests to `/item/{item_id}` and is
/// restricted to the admin identity.
#[utoipa::path(
    delete,
    path = "/item/{item_id}",
    tag = "items",
    params(("item_id" = i32, Path, description = "Item ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 401, description = "Missing token or admin privilege required", body = AuthErrorBody),
        (status = 404, description = "Item not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool, claims), fields(sub = %claims.sub))]
pub async fn delete_item_handler(
    State(pool): State<Arc<DbPool>>,
    AccessToken(claims): AccessToken,
    ValidatedPath(item_id): ValidatedPath<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    claims.require_admin()?;

    info!("Deleting item with id: {}", item_id);

    if !repo::delete_item(&pool, item_id)? {
        debug!("Item not found");
        return Err(ApiError::not_found("Item not found."));
    }

    Ok(Json(MessageResponse::new("Item deleted.")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Claims, TokenKind};
    use crate::errors::AuthError;
    use crate::test_utils::{setup_test_db, test_token_manager};

    fn claims(identity: i32) -> Claims {
        test_token_manager().claims_for(identity, TokenKind::Access, true)
    }

    fn create_payload(name: &str, store_id: i32) -> ValidatedJson<CreateItemDto> {
        ValidatedJson(CreateItemDto {
            name: name.to_string(),
            price: 15.99,
            store_id,
            description: None,
        })
    }

    #[tokio::test]
    async fn test_create_item_handler() {
        let pool = setup_test_db();
        let store = repo::create_store(&pool, "Store").unwrap();

        let (status, Json(item)) = create_item_handler(
            State(pool.clone()),
            FreshAccessToken(claims(2)),
            create_payload("Chair", store.get_id()),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(item.name, "Chair");
        assert_eq!(item.price, 15.99);
        assert_eq!(item.store, store);
        assert!(item.tags.is_empty());
    }

    #[tokio::test]
    async fn test_create_item_in_missing_store() {
        let pool = setup_test_db();

        let result = create_item_handler(
            State(pool.clone()),
            FreshAccessToken(claims(2)),
            create_payload("Chair", 99),
        )
        .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert!(repo::list_items(&pool).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_item_in_same_store() {
        let pool = setup_test_db();
        let store = repo::create_store(&pool, "Store").unwrap();
        let (status, _) = create_item_handler(
            State(pool.clone()),
            FreshAccessToken(claims(2)),
            create_payload("Chair", store.get_id()),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let result = create_item_handler(
            State(pool.clone()),
            FreshAccessToken(claims(2)),
            create_payload("Chair", store.get_id()),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Conflict(msg)) if msg == DUPLICATE_ITEM));
    }

    #[tokio::test]
    async fn test_update_item_keeps_description_when_absent() {
        let pool = setup_test_db();
        let store = repo::create_store(&pool, "Store").unwrap();
        let item = repo::create_item(&pool, &NewItem {
            name: "Chair",
            description: Some("Oak"),
            price: 10.0,
            store_id: store.get_id(),
        })
        .unwrap();

        let Json(updated) = update_item_handler(
            State(pool.clone()),
            AccessToken(claims(2)),
            ValidatedPath(item.get_id()),
            ValidatedJson(UpdateItemDto {
                name: "Stool".to_string(),
                price: 12.5,
                description: None,
                store_id: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Stool");
        assert_eq!(updated.price, 12.5);
        assert_eq!(updated.description.as_deref(), Some("Oak"));
        assert_eq!(updated.store_id, store.get_id());
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let pool = setup_test_db();

        let result = update_item_handler(
            State(pool),
            AccessToken(claims(2)),
            ValidatedPath(5),
            ValidatedJson(UpdateItemDto {
                name: "Stool".to_string(),
                price: 1.0,
                description: None,
                store_id: None,
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_tagged_item_cannot_change_store() {
        let pool = setup_test_db();
        let first = repo::create_store(&pool, "First").unwrap();
        let second = repo::create_store(&pool, "Second").unwrap();
        let item = repo::create_item(&pool, &NewItem {
            name: "Chair",
            description: None,
            price: 10.0,
            store_id: first.get_id(),
        })
        .unwrap();
        let tag = repo::create_tag(&pool, first.get_id(), "Sale").unwrap();
        repo::add_tag_to_item(&pool, item.get_id(), tag.get_id()).unwrap();

        let result = update_item_handler(
            State(pool.clone()),
            AccessToken(claims(2)),
            ValidatedPath(item.get_id()),
            ValidatedJson(UpdateItemDto {
                name: "Chair".to_string(),
                price: 10.0,
                description: None,
                store_id: Some(second.get_id()),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(repo::get_item(&pool, item.get_id()).unwrap().unwrap().get_store_id(), first.get_id());
    }

    #[tokio::test]
    async fn test_delete_item_requires_admin() {
        let pool = setup_test_db();
        let store = repo::create_store(&pool, "Store").unwrap();
        let item = repo::create_item(&pool, &NewItem {
            name: "Chair",
            description: None,
            price: 10.0,
            store_id: store.get_id(),
        })
        .unwrap();

        let denied = delete_item_handler(State(pool.clone()), AccessToken(claims(2)), ValidatedPath(item.get_id())).await;
        assert!(matches!(denied, Err(ApiError::Auth(AuthError::AdminRequired))));
        assert!(repo::get_item(&pool, item.get_id()).unwrap().is_some());

        let Json(message) = delete_item_handler(State(pool.clone()), AccessToken(claims(1)), ValidatedPath(item.get_id()))
            .await
            .unwrap();
        assert_eq!(message.message, "Item deleted.");
        assert!(repo::get_item(&pool, item.get_id()).unwrap().is_none());
    }
}
