use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{instrument, debug, info};

use crate::db::DbPool;
use crate::dto::{CreateTagDto, ItemTagResponse, MessageResponse, TagResponse, UpdateTagDto};
use crate::errors::{ApiError, ErrorBody};
use crate::handlers::item_handlers::find_item;
use crate::handlers::store_handlers::find_store;
use crate::models::Tag;
use crate::repo::{self, TagDeletion};
use crate::validation::{ValidatedJson, ValidatedPath};

const DUPLICATE_TAG: &str = "A tag with that name already exists in that store.";

/// Resolves the store and linked items of a tag
fn tag_response(pool: &DbPool, tag: Tag) -> Result<TagResponse, ApiError> {
    let store = repo::get_store(pool, tag.get_store_id())?.ok_or_else(|| {
        ApiError::Internal(anyhow::anyhow!(
            "Tag {} references missing store {}",
            tag.get_id(),
            tag.get_store_id()
        ))
    })?;
    let items = repo::list_items_for_tag(pool, &tag)?;
    Ok(TagResponse::new(tag, store, items))
}

fn find_tag(pool: &DbPool, tag_id: i32) -> Result<Tag, ApiError> {
    repo::get_tag(pool, tag_id)?.ok_or_else(|| ApiError::not_found("Tag not found."))
}

/// Handler for listing every tag across all stores
///
/// This function handles GET requests to `/tag`.
#[utoipa::path(
    get,
    path = "/tag",
    tag = "tags",
    responses((status = 200, description = "All tags", body = Vec<TagResponse>))
)]
#[instrument(skip(pool))]
pub async fn list_tags_handler(
    State(pool): State<Arc<DbPool>>,
) -> Result<Json<Vec<TagResponse>>, ApiError> {
    debug!("Listing all tags");

    let tags = repo::list_tags(&pool)?
        .into_iter()
        .map(|tag| tag_response(&pool, tag))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Retrieved {} tags", tags.len());

    Ok(Json(tags))
}

/// Handler for listing the tags of one store
///
/// This function handles GET requests to `/store/{store_id}/tag`.
#[utoipa::path(
    get,
    path = "/store/{store_id}/tag",
    tag = "tags",
    params(("store_id" = i32, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Tags of the store", body = Vec<TagResponse>),
        (status = 404, description = "Store not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool))]
pub async fn list_tags_in_store_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedPath(store_id): ValidatedPath<i32>,
) -> Result<Json<Vec<TagResponse>>, ApiError> {
    debug!("Listing tags of store");

    let store = find_store(&pool, store_id)?;
    let tags = repo::list_tags_for_store(&pool, &store)?
        .into_iter()
        .map(|tag| tag_response(&pool, tag))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(tags))
}

/// Handler for creating a tag inside a store
///
/// This function handles POST requests to `/store/{store_id}/tag`.
///
/// ### Returns
///
/// 201 with the new tag, 404 if the store does not exist, or 400 if the
/// store already has a tag with that name
#[utoipa::path(
    post,
    path = "/store/{store_id}/tag",
    tag = "tags",
    params(("store_id" = i32, Path, description = "Store ID")),
    request_body = CreateTagDto,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Invalid payload or duplicate name", body = ErrorBody),
        (status = 404, description = "Store not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool, payload), fields(name = %payload.name))]
pub async fn create_tag_in_store_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedPath(store_id): ValidatedPath<i32>,
    ValidatedJson(payload): ValidatedJson<CreateTagDto>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    info!("Creating new tag");

    let store = find_store(&pool, store_id)?;
    let tag = repo::create_tag(&pool, store.get_id(), &payload.name)
        .map_err(|e| ApiError::conflict_or_internal(e, DUPLICATE_TAG))?;

    info!("Successfully created tag with id: {}", tag.get_id());

    Ok((StatusCode::CREATED, Json(TagResponse::new(tag, store, Vec::new()))))
}

/// Handler for retrieving a specific tag
///
/// This function handles GET requests to `/tag/{tag_id}`.
#[utoipa::path(
    get,
    path = "/tag/{tag_id}",
    tag = "tags",
    params(("tag_id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "The tag with its store and items", body = TagResponse),
        (status = 404, description = "Tag not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool))]
pub async fn get_tag_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedPath(tag_id): ValidatedPath<i32>,
) -> Result<Json<TagResponse>, ApiError> {
    let tag = find_tag(&pool, tag_id)?;
    Ok(Json(tag_response(&pool, tag)?))
}

/// Handler for renaming a tag
///
/// This function handles PUT requests to `/tag/{tag_id}`.
#[utoipa::path(
    put,
    path = "/tag/{tag_id}",
    tag = "tags",
    params(("tag_id" = i32, Path, description = "Tag ID")),
    request_body = UpdateTagDto,
    responses(
        (status = 200, description = "Tag renamed", body = TagResponse),
        (status = 400, description = "Invalid payload or duplicate name", body = ErrorBody),
        (status = 404, description = "Tag not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool, payload), fields(name = %payload.name))]
pub async fn update_tag_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedPath(tag_id): ValidatedPath<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateTagDto>,
) -> Result<Json<TagResponse>, ApiError> {
    info!("Updating tag");

    let tag = repo::update_tag(&pool, tag_id, &payload.name)
        .map_err(|e| ApiError::conflict_or_internal(e, DUPLICATE_TAG))?
        .ok_or_else(|| ApiError::not_found("Tag not found."))?;

    Ok(Json(tag_response(&pool, tag)?))
}

/// Handler for deleting a tag
///
/// This function handles DELETE requests to `/tag/{tag_id}`. A tag that is
/// still attached to an item is left in place and answered with 400.
#[utoipa::path(
    delete,
    path = "/tag/{tag_id}",
    tag = "tags",
    params(("tag_id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag deleted", body = MessageResponse),
        (status = 400, description = "Tag still attached to items", body = ErrorBody),
        (status = 404, description = "Tag not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool))]
pub async fn delete_tag_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedPath(tag_id): ValidatedPath<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("Deleting tag with id: {}", tag_id);

    match repo::delete_tag(&pool, tag_id)? {
        TagDeletion::Deleted => Ok(Json(MessageResponse::new("Tag deleted."))),
        TagDeletion::NotFound => Err(ApiError::not_found("Tag not found.")),
        TagDeletion::StillLinked(links) => {
            debug!("Tag is still linked to {} items", links);
            Err(ApiError::Validation(
                "Could not delete tag. Make sure tag is not associated with any items, then try again."
                    .to_string(),
            ))
        }
    }
}

/// Handler for attaching a tag to an item
///
/// This function handles POST requests to `/item/{item_id}/tag/{tag_id}`.
/// Both must belong to the same store.
#[utoipa::path(
    post,
    path = "/item/{item_id}/tag/{tag_id}",
    tag = "tags",
    params(
        ("item_id" = i32, Path, description = "Item ID"),
        ("tag_id" = i32, Path, description = "Tag ID")
    ),
    responses(
        (status = 201, description = "Tag attached", body = TagResponse),
        (status = 400, description = "Different stores or already attached", body = ErrorBody),
        (status = 404, description = "Item or tag not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool))]
pub async fn link_tag_to_item_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedPath((item_id, tag_id)): ValidatedPath<(i32, i32)>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    info!("Adding tag to item");

    let item = find_item(&pool, item_id)?;
    let tag = find_tag(&pool, tag_id)?;

    if item.get_store_id() != tag.get_store_id() {
        return Err(ApiError::Validation(
            "Item and tag must belong to the same store.".to_string(),
        ));
    }

    repo::add_tag_to_item(&pool, item_id, tag_id)
        .map_err(|e| ApiError::conflict_or_internal(e, "The item already has that tag."))?;

    info!("Successfully added tag {} to item {}", tag_id, item_id);

    Ok((StatusCode::CREATED, Json(tag_response(&pool, tag)?)))
}

/// Handler for detaching a tag from an item
///
/// This function handles DELETE requests to `/item/{item_id}/tag/{tag_id}`.
#[utoipa::path(
    delete,
    path = "/item/{item_id}/tag/{tag_id}",
    tag = "tags",
    params(
        ("item_id" = i32, Path, description = "Item ID"),
        ("tag_id" = i32, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "Tag detached", body = ItemTagResponse),
        (status = 404, description = "Item, tag or link not found", body = ErrorBody)
    )
)]
#[instrument(skip(pool))]
pub async fn unlink_tag_from_item_handler(
    State(pool): State<Arc<DbPool>>,
    ValidatedPath((item_id, tag_id)): ValidatedPath<(i32, i32)>,
) -> Result<Json<ItemTagResponse>, ApiError> {
    info!("Removing tag from item");

    let item = find_item(&pool, item_id)?;
    let tag = find_tag(&pool, tag_id)?;

    if !repo::remove_tag_from_item(&pool, item_id, tag_id)? {
        debug!("Item was not tagged");
        return Err(ApiError::not_found("The item does not have that tag."));
    }

    Ok(Json(ItemTagResponse {
        message: "Item removed from tag".to_string(),
        item,
        tag,
    }))
}
