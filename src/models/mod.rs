/// Data models module
///
/// Database models for stores, items, tags, their associations and users,
/// together with the insertable and changeset rows used to write them.

mod store;
pub use store::{NewStore, Store};

mod item;
pub use item::{Item, ItemChanges, NewItem};

mod tag;
pub use tag::{NewTag, Tag};

mod item_tag;
pub use item_tag::ItemTag;

mod user;
pub use user::{NewUser, User};
