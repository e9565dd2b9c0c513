use crate::db::DbPool;
use crate::models::{NewStore, Store};
use crate::schema::stores;
use anyhow::Result;
use diesel::prelude::*;

/// Creates a new store in the database
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - A store with the same name already exists (unique violation)
pub fn create_store(pool: &DbPool, name: &str) -> Result<Store> {
    let conn = &mut pool.get()?;

    let store = diesel::insert_into(stores::table)
        .values(&NewStore { name })
        .returning(Store::as_returning())
        .get_result(conn)?;

    Ok(store)
}

/// Retrieves a store by its ID, `None` if it does not exist
pub fn get_store(pool: &DbPool, store_id: i32) -> Result<Option<Store>> {
    let conn = &mut pool.get()?;
    let result = stores::table
        .find(store_id)
        .select(Store::as_select())
        .first(conn)
        .optional()?;
    Ok(result)
}

/// Lists all stores ordered by ID
pub fn list_stores(pool: &DbPool) -> Result<Vec<Store>> {
    let conn = &mut pool.get()?;
    let result = stores::table
        .order(stores::id)
        .select(Store::as_select())
        .load(conn)?;
    Ok(result)
}

/// Renames a store, returning `None` if it does not exist
pub fn update_store(pool: &DbPool, store_id: i32, name: &str) -> Result<Option<Store>> {
    let conn = &mut pool.get()?;
    let result = diesel::update(stores::table.find(store_id))
        .set(stores::name.eq(name))
        .returning(Store::as_returning())
        .get_result(conn)
        .optional()?;
    Ok(result)
}

/// Deletes a store and, through the foreign-key cascades, its items and tags
///
/// ### Returns
///
/// `true` if a row was deleted
pub fn delete_store(pool: &DbPool, store_id: i32) -> Result<bool> {
    let conn = &mut pool.get()?;
    let deleted = diesel::delete(stores::table.find(store_id)).execute(conn)?;
    Ok(deleted > 0)
}
