use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Store;

/// Represents a tag defined by a store
#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[diesel(belongs_to(Store))]
#[diesel(table_name = crate::schema::tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Tag {
    /// Database-generated identifier
    id: i32,

    /// The tag's name, unique within its store
    name: String,

    /// The store this tag belongs to
    store_id: i32,
}

/// Insertable row for a new tag
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::tags)]
pub struct NewTag<'a> {
    pub name: &'a str,
    pub store_id: i32,
}

impl Tag {
    pub fn new_with_fields(id: i32, name: String, store_id: i32) -> Self {
        Self { id, name, store_id }
    }

    /// Gets the tag's ID
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the tag's name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    /// Gets the ID of the store the tag belongs to
    pub fn get_store_id(&self) -> i32 {
        self.store_id
    }
}
