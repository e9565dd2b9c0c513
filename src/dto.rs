use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Item, Store, Tag, User};

/// Data transfer object for creating a store
#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct CreateStoreDto {
    /// The store's name, unique across stores
    #[validate(length(min = 1, max = 80))]
    pub name: String,
}

/// Data transfer object for renaming a store
#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct UpdateStoreDto {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
}

/// Data transfer object for creating an item
///
/// `name`, `price` and `store_id` are required; a body missing any of them
/// is rejected before the handler runs.
#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct CreateItemDto {
    #[validate(length(min = 1, max = 80))]
    pub name: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    /// The store the item belongs to; must exist
    pub store_id: i32,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Data transfer object for updating an item
///
/// `name` and `price` are required, the other fields are merged only when
/// present. An explicit `"description": null` clears the description.
#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct UpdateItemDto {
    #[validate(length(min = 1, max = 80))]
    pub name: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[serde(default, deserialize_with = "present_field")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 500))]
    pub description: Option<Option<String>>,

    /// Moves the item to another store; must exist
    #[serde(default)]
    pub store_id: Option<i32>,
}

/// Wraps any present value, `null` included, in `Some`
///
/// Paired with `#[serde(default)]` so an absent field stays `None`.
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Data transfer object for creating a tag inside a store
#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct CreateTagDto {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
}

/// Data transfer object for renaming a tag
#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct UpdateTagDto {
    #[validate(length(min = 1, max = 80))]
    pub name: String,
}

/// Username and password, used by both `/register` and `/login`
#[derive(Deserialize, Validate, ToSchema)]
pub struct UserCredentialsDto {
    #[validate(length(min = 3, max = 80))]
    pub username: String,

    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

impl fmt::Debug for UserCredentialsDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentialsDto")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A store with everything it owns
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct StoreResponse {
    pub id: i32,
    pub name: String,
    pub items: Vec<Item>,
    pub tags: Vec<Tag>,
}

impl StoreResponse {
    pub fn new(store: Store, items: Vec<Item>, tags: Vec<Tag>) -> Self {
        Self {
            id: store.get_id(),
            name: store.get_name(),
            items,
            tags,
        }
    }
}

/// An item with its store and tags
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ItemResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub store_id: i32,
    pub store: Store,
    pub tags: Vec<Tag>,
}

impl ItemResponse {
    pub fn new(item: Item, store: Store, tags: Vec<Tag>) -> Self {
        Self {
            id: item.get_id(),
            name: item.get_name(),
            description: item.get_description(),
            price: item.get_price(),
            store_id: item.get_store_id(),
            store,
            tags,
        }
    }
}

/// A tag with its store and the items it is attached to
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub store_id: i32,
    pub store: Store,
    pub items: Vec<Item>,
}

impl TagResponse {
    pub fn new(tag: Tag, store: Store, items: Vec<Item>) -> Self {
        Self {
            id: tag.get_id(),
            name: tag.get_name(),
            store_id: tag.get_store_id(),
            store,
            items,
        }
    }
}

/// Confirmation returned when a tag is detached from an item
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct ItemTagResponse {
    pub message: String,
    pub item: Item,
    pub tag: Tag,
}

/// Public view of a user; never includes the password hash
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.get_id(),
            username: user.get_username(),
        }
    }
}

/// Generic confirmation body
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Tokens returned by `/login`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct TokenPairResponse {
    /// Fresh access token
    pub access_token: String,
    pub refresh_token: String,
}

/// Token returned by `/refresh`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct AccessTokenResponse {
    /// Non-fresh access token
    pub access_token: String,
}
