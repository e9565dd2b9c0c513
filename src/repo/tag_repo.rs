use crate::db::DbPool;
use crate::models::{Item, ItemTag, NewTag, Store, Tag};
use crate::schema::{items_tags, tags};
use anyhow::Result;
use diesel::prelude::*;

/// Outcome of trying to delete a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagDeletion {
    Deleted,
    NotFound,
    /// The tag is still linked to this many items and was left in place
    StillLinked(i64),
}

/// Creates a new tag in a store
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The store does not exist (foreign-key violation)
/// - The store already has a tag with this name (unique violation)
pub fn create_tag(pool: &DbPool, store_id: i32, name: &str) -> Result<Tag> {
    let conn = &mut pool.get()?;

    let tag = diesel::insert_into(tags::table)
        .values(&NewTag { name, store_id })
        .returning(Tag::as_returning())
        .get_result(conn)?;

    Ok(tag)
}

/// Retrieves a tag by its ID, `None` if it does not exist
pub fn get_tag(pool: &DbPool, tag_id: i32) -> Result<Option<Tag>> {
    let conn = &mut pool.get()?;
    let result = tags::table
        .find(tag_id)
        .select(Tag::as_select())
        .first(conn)
        .optional()?;
    Ok(result)
}

/// Lists all tags ordered by ID
pub fn list_tags(pool: &DbPool) -> Result<Vec<Tag>> {
    let conn = &mut pool.get()?;
    let result = tags::table
        .order(tags::id)
        .select(Tag::as_select())
        .load(conn)?;
    Ok(result)
}

/// Lists the tags defined by a store
pub fn list_tags_for_store(pool: &DbPool, store: &Store) -> Result<Vec<Tag>> {
    let conn = &mut pool.get()?;
    let result = Tag::belonging_to(store)
        .order(tags::id)
        .select(Tag::as_select())
        .load(conn)?;
    Ok(result)
}

/// Lists the tags attached to an item
pub fn list_tags_for_item(pool: &DbPool, item: &Item) -> Result<Vec<Tag>> {
    let conn = &mut pool.get()?;
    let result = ItemTag::belonging_to(item)
        .inner_join(tags::table)
        .order(tags::id)
        .select(Tag::as_select())
        .load(conn)?;
    Ok(result)
}

/// Renames a tag, returning `None` if it does not exist
pub fn update_tag(pool: &DbPool, tag_id: i32, name: &str) -> Result<Option<Tag>> {
    let conn = &mut pool.get()?;
    let result = diesel::update(tags::table.find(tag_id))
        .set(tags::name.eq(name))
        .returning(Tag::as_returning())
        .get_result(conn)
        .optional()?;
    Ok(result)
}

/// Deletes a tag unless it is still attached to an item
///
/// The link count and the delete run in one transaction.
pub fn delete_tag(pool: &DbPool, tag_id: i32) -> Result<TagDeletion> {
    let conn = &mut pool.get()?;

    conn.transaction(|conn| {
        let links: i64 = items_tags::table
            .filter(items_tags::tag_id.eq(tag_id))
            .count()
            .get_result(conn)?;
        if links > 0 {
            return Ok(TagDeletion::StillLinked(links));
        }

        let deleted = diesel::delete(tags::table.find(tag_id)).execute(conn)?;
        Ok(if deleted > 0 {
            TagDeletion::Deleted
        } else {
            TagDeletion::NotFound
        })
    })
}

/// Attaches a tag to an item
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - Either side does not exist (foreign-key violation)
/// - The link already exists (unique violation)
pub fn add_tag_to_item(pool: &DbPool, item_id: i32, tag_id: i32) -> Result<ItemTag> {
    let conn = &mut pool.get()?;

    let link = ItemTag::new(item_id, tag_id);
    diesel::insert_into(items_tags::table)
        .values(&link)
        .execute(conn)?;

    Ok(link)
}

/// Detaches a tag from an item
///
/// Returns `false` when the item was not tagged with the tag.
pub fn remove_tag_from_item(pool: &DbPool, item_id: i32, tag_id: i32) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(items_tags::table.find((item_id, tag_id))).execute(conn)?;

    Ok(deleted > 0)
}

#[cfg(test)]
mod tests;
