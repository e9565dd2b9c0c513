use crate::db::DbPool;
use crate::models::{Item, ItemChanges, NewItem, Store, Tag};
use crate::schema::{items, items_tags};
use anyhow::Result;
use diesel::prelude::*;

/// Creates a new item in the database
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The store does not exist (foreign-key violation)
/// - The store already has an item with this name (unique violation)
pub fn create_item(pool: &DbPool, new_item: &NewItem<'_>) -> Result<Item> {
    let conn = &mut pool.get()?;

    let item = diesel::insert_into(items::table)
        .values(new_item)
        .returning(Item::as_returning())
        .get_result(conn)?;

    Ok(item)
}

/// Retrieves an item by its ID, `None` if it does not exist
pub fn get_item(pool: &DbPool, item_id: i32) -> Result<Option<Item>> {
    let conn = &mut pool.get()?;
    let result = items::table
        .find(item_id)
        .select(Item::as_select())
        .first(conn)
        .optional()?;
    Ok(result)
}

/// Lists all items ordered by ID
pub fn list_items(pool: &DbPool) -> Result<Vec<Item>> {
    let conn = &mut pool.get()?;
    let result = items::table
        .order(items::id)
        .select(Item::as_select())
        .load(conn)?;
    Ok(result)
}

/// Lists the items owned by a store
pub fn list_items_for_store(pool: &DbPool, store: &Store) -> Result<Vec<Item>> {
    let conn = &mut pool.get()?;
    let result = Item::belonging_to(store)
        .order(items::id)
        .select(Item::as_select())
        .load(conn)?;
    Ok(result)
}

/// Lists the items a tag is attached to
pub fn list_items_for_tag(pool: &DbPool, tag: &Tag) -> Result<Vec<Item>> {
    let conn = &mut pool.get()?;
    let result = items_tags::table
        .inner_join(items::table)
        .filter(items_tags::tag_id.eq(tag.get_id()))
        .order(items::id)
        .select(Item::as_select())
        .load(conn)?;
    Ok(result)
}

/// Applies `changes` to an item, returning `None` if it does not exist
pub fn update_item(pool: &DbPool, item_id: i32, changes: &ItemChanges) -> Result<Option<Item>> {
    let conn = &mut pool.get()?;
    let result = diesel::update(items::table.find(item_id))
        .set(changes)
        .returning(Item::as_returning())
        .get_result(conn)
        .optional()?;
    Ok(result)
}

/// Deletes an item together with its tag links
///
/// ### Returns
///
/// `true` if a row was deleted
pub fn delete_item(pool: &DbPool, item_id: i32) -> Result<bool> {
    let conn = &mut pool.get()?;
    let deleted = diesel::delete(items::table.find(item_id)).execute(conn)?;
    Ok(deleted > 0)
}
