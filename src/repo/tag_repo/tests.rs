use super::*;
use crate::errors::is_unique_violation;
use crate::models::NewItem;
use crate::repo::{create_item, create_store, get_item};
use crate::test_utils::setup_test_db;

fn create_test_item(pool: &DbPool, store_id: i32, name: &str) -> Item {
    create_item(
        pool,
        &NewItem {
            name,
            description: None,
            price: 1.0,
            store_id,
        },
    )
    .unwrap()
}

#[test]
fn test_create_tag() {
    let pool = setup_test_db();
    let store = create_store(&pool, "Store").unwrap();

    let tag = create_tag(&pool, store.get_id(), "Sale").unwrap();

    assert_eq!(tag.get_name(), "Sale");
    assert_eq!(tag.get_store_id(), store.get_id());
}

#[test]
fn test_tag_names_are_unique_per_store() {
    let pool = setup_test_db();
    let store = create_store(&pool, "Store").unwrap();
    let other = create_store(&pool, "Other").unwrap();
    create_tag(&pool, store.get_id(), "Sale").unwrap();

    let err = create_tag(&pool, store.get_id(), "Sale").unwrap_err();
    assert!(is_unique_violation(&err));

    create_tag(&pool, other.get_id(), "Sale").unwrap();
}

#[test]
fn test_get_and_list_tags() {
    let pool = setup_test_db();
    let store = create_store(&pool, "Store").unwrap();
    let other = create_store(&pool, "Other").unwrap();
    let sale = create_tag(&pool, store.get_id(), "Sale").unwrap();
    let new = create_tag(&pool, other.get_id(), "New").unwrap();

    assert_eq!(get_tag(&pool, sale.get_id()).unwrap(), Some(sale.clone()));
    assert_eq!(get_tag(&pool, 9999).unwrap(), None);
    assert_eq!(list_tags(&pool).unwrap(), vec![sale.clone(), new]);
    assert_eq!(list_tags_for_store(&pool, &store).unwrap(), vec![sale]);
}

#[test]
fn test_add_and_remove_tag_from_item() {
    let pool = setup_test_db();
    let store = create_store(&pool, "Store").unwrap();
    let item = create_test_item(&pool, store.get_id(), "Chair");
    let tag = create_tag(&pool, store.get_id(), "Sale").unwrap();

    let link = add_tag_to_item(&pool, item.get_id(), tag.get_id()).unwrap();
    assert_eq!(link.get_item_id(), item.get_id());
    assert_eq!(link.get_tag_id(), tag.get_id());
    assert_eq!(list_tags_for_item(&pool, &item).unwrap(), vec![tag.clone()]);

    assert!(remove_tag_from_item(&pool, item.get_id(), tag.get_id()).unwrap());
    assert!(list_tags_for_item(&pool, &item).unwrap().is_empty());
}

#[test]
fn test_add_tag_twice_is_unique_violation() {
    let pool = setup_test_db();
    let store = create_store(&pool, "Store").unwrap();
    let item = create_test_item(&pool, store.get_id(), "Chair");
    let tag = create_tag(&pool, store.get_id(), "Sale").unwrap();
    add_tag_to_item(&pool, item.get_id(), tag.get_id()).unwrap();

    let err = add_tag_to_item(&pool, item.get_id(), tag.get_id()).unwrap_err();

    assert!(is_unique_violation(&err));
}

#[test]
fn test_remove_missing_link_reports_false() {
    let pool = setup_test_db();

    assert!(!remove_tag_from_item(&pool, 1, 1).unwrap());
}

#[test]
fn test_delete_tag_refuses_while_linked() {
    let pool = setup_test_db();
    let store = create_store(&pool, "Store").unwrap();
    let item = create_test_item(&pool, store.get_id(), "Chair");
    let tag = create_tag(&pool, store.get_id(), "Sale").unwrap();
    add_tag_to_item(&pool, item.get_id(), tag.get_id()).unwrap();

    assert_eq!(delete_tag(&pool, tag.get_id()).unwrap(), TagDeletion::StillLinked(1));
    assert!(get_tag(&pool, tag.get_id()).unwrap().is_some());

    assert!(remove_tag_from_item(&pool, item.get_id(), tag.get_id()).unwrap());
    assert_eq!(delete_tag(&pool, tag.get_id()).unwrap(), TagDeletion::Deleted);
    assert_eq!(delete_tag(&pool, tag.get_id()).unwrap(), TagDeletion::NotFound);
}

#[test]
fn test_deleting_item_drops_its_links() {
    let pool = setup_test_db();
    let store = create_store(&pool, "Store").unwrap();
    let item = create_test_item(&pool, store.get_id(), "Chair");
    let tag = create_tag(&pool, store.get_id(), "Sale").unwrap();
    add_tag_to_item(&pool, item.get_id(), tag.get_id()).unwrap();

    crate::repo::delete_item(&pool, item.get_id()).unwrap();

    assert_eq!(get_item(&pool, item.get_id()).unwrap(), None);
    assert_eq!(delete_tag(&pool, tag.get_id()).unwrap(), TagDeletion::Deleted);
}

#[test]
fn test_update_tag() {
    let pool = setup_test_db();
    let store = create_store(&pool, "Store").unwrap();
    let tag = create_tag(&pool, store.get_id(), "Sale").unwrap();

    let updated = update_tag(&pool, tag.get_id(), "Clearance").unwrap().unwrap();

    assert_eq!(updated.get_name(), "Clearance");
    assert_eq!(update_tag(&pool, 9999, "Nothing").unwrap(), None);
}
