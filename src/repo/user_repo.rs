use crate::db::DbPool;
use crate::models::{NewUser, User};
use crate::schema::users;
use anyhow::Result;
use diesel::prelude::*;

/// Creates a user from a username and an already-hashed password
///
/// ### Errors
///
/// Returns an error if the username is taken (unique violation) or the
/// database is unavailable
pub fn create_user(pool: &DbPool, username: &str, password_hash: &str) -> Result<User> {
    let conn = &mut pool.get()?;

    let user = diesel::insert_into(users::table)
        .values(&NewUser {
            username,
            password: password_hash,
        })
        .returning(User::as_returning())
        .get_result(conn)?;

    Ok(user)
}

pub fn get_user(pool: &DbPool, user_id: i32) -> Result<Option<User>> {
    let conn = &mut pool.get()?;
    let result = users::table
        .find(user_id)
        .select(User::as_select())
        .first(conn)
        .optional()?;
    Ok(result)
}

pub fn get_user_by_username(pool: &DbPool, username: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;
    let result = users::table
        .filter(users::username.eq(username))
        .select(User::as_select())
        .first(conn)
        .optional()?;
    Ok(result)
}

pub fn list_users(pool: &DbPool) -> Result<Vec<User>> {
    let conn = &mut pool.get()?;
    let result = users::table
        .order(users::id)
        .select(User::as_select())
        .load(conn)?;
    Ok(result)
}

/// Deletes a user, returning `true` if a row was deleted
pub fn delete_user(pool: &DbPool, user_id: i32) -> Result<bool> {
    let conn = &mut pool.get()?;
    let deleted = diesel::delete(users::table.find(user_id)).execute(conn)?;
    Ok(deleted > 0)
}
