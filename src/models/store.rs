use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Represents a store, the owner of items and tags
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::stores)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Store {
    /// Database-generated identifier
    id: i32,

    /// The store's name, unique across all stores
    name: String,
}

/// Insertable row for a store that has not been assigned an id yet
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::stores)]
pub struct NewStore<'a> {
    pub name: &'a str,
}

impl Store {
    /// Creates a store value with all fields specified
    pub fn new_with_fields(id: i32, name: String) -> Self {
        Self { id, name }
    }

    /// Gets the store's ID
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the store's name
    pub fn get_name(&self) -> String {
        self.name.clone()
    }
}
