use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{Item, Tag};

/// Represents an association between an item and a tag
#[derive(Queryable, Selectable, Insertable, Identifiable, Associations, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(belongs_to(Item))]
#[diesel(belongs_to(Tag))]
#[diesel(primary_key(item_id, tag_id))]
#[diesel(table_name = crate::schema::items_tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ItemTag {
    /// The ID of the item
    item_id: i32,

    /// The ID of the tag
    tag_id: i32,
}

impl ItemTag {
    /// Creates a new item tag association
    pub fn new(item_id: i32, tag_id: i32) -> Self {
        Self { item_id, tag_id }
    }

    /// Gets the item ID
    pub fn get_item_id(&self) -> i32 {
        self.item_id
    }

    /// Gets the tag ID
    pub fn get_tag_id(&self) -> i32 {
        self.tag_id
    }
}
