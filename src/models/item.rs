use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Store;

/// Represents an item sold by a store
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[diesel(belongs_to(Store))]
#[diesel(table_name = crate::schema::items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Item {
    /// Database-generated identifier
    id: i32,

    /// The item's name, unique within its store
    name: String,

    /// Optional free-text description
    description: Option<String>,

    /// Unit price
    price: f64,

    /// The store that owns this item
    store_id: i32,
}

/// Insertable row for a new item
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::items)]
pub struct NewItem<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: f64,
    pub store_id: i32,
}

/// Field changes for an existing item
///
/// `None` leaves the stored column untouched; `Some(None)` on the
/// description sets it to NULL.
#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = crate::schema::items)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub store_id: Option<i32>,
}

impl Item {
    pub fn new_with_fields(
        id: i32,
        name: String,
        description: Option<String>,
        price: f64,
        store_id: i32,
    ) -> Self {
        Self {
            id,
            name,
            description,
            price,
            store_id,
        }
    }

    /// Gets the item's ID
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the item's name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Gets the item's description, if any
    pub fn get_description(&self) -> Option<String> {
        self.description.clone()
    }

    /// Gets the item's price
    pub fn get_price(&self) -> f64 {
        self.price
    }

    /// Gets the ID of the owning store
    pub fn get_store_id(&self) -> i32 {
        self.store_id
    }
}
