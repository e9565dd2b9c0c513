use diesel::prelude::*;

/// Represents a registered user
///
/// `password` holds an Argon2 PHC string, never the plaintext. Not
/// `Serialize`: responses go through `UserResponse`.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    id: i32,
    username: String,
    password: String,
}

/// Insertable row for a new user
#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl User {
    pub fn new_with_fields(id: i32, username: String, password: String) -> Self {
        Self { id, username, password }
    }

    /// Gets the user's ID, which is also the token identity
    pub fn get_id(&self) -> i32 {
        self.id
    }

    /// Gets the username
    pub fn get_username(&self) -> String {
        self.username.clone()
    }

    /// Gets the stored password hash
    pub fn get_password_hash(&self) -> &str {
        &self.password
    }
}
