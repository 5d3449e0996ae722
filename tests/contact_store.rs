use contact_store::{Contact, ContactStore, StoreError};
use tempfile::NamedTempFile;

#[test]
fn insert_and_get() {
    let contacts = ContactStore::open_in_memory().unwrap();
    contacts.insert(&Contact::new(1, "Ray")).unwrap();

    let found = contacts.get(1).unwrap();
    assert_eq!(found, Some(Contact::new(1, "Ray")));
    assert_eq!(contacts.get(99).unwrap(), None);
}

#[test]
fn insert_many_reuses_one_statement() {
    let contacts = ContactStore::open_in_memory().unwrap();
    let inserted = contacts
        .insert_many(&[
            Contact::new(1, "Ray"),
            Contact::new(2, "Chris"),
            Contact::new(3, "Martha"),
            Contact::new(4, "Danielle"),
        ])
        .unwrap();
    assert_eq!(inserted, 4);
    assert_eq!(contacts.count().unwrap(), 4);

    let all = contacts.all().unwrap();
    let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Ray", "Chris", "Martha", "Danielle"]);
}

#[test]
fn duplicate_id_violates_primary_key() {
    let contacts = ContactStore::open_in_memory().unwrap();
    contacts.insert(&Contact::new(1, "Ray")).unwrap();

    let err = contacts.insert(&Contact::new(1, "Chris")).unwrap_err();
    assert!(matches!(err, StoreError::Sqlite(_)));
    // the first row is untouched
    assert_eq!(contacts.get(1).unwrap().unwrap().name, "Ray");
}

#[test]
fn rename_updates_matching_row_only() {
    let contacts = ContactStore::open_in_memory().unwrap();
    contacts.insert(&Contact::new(1, "Ray")).unwrap();
    contacts.insert(&Contact::new(2, "Martha")).unwrap();

    assert!(contacts.rename(1, "Chris").unwrap());
    assert_eq!(contacts.get(1).unwrap().unwrap().name, "Chris");
    assert_eq!(contacts.get(2).unwrap().unwrap().name, "Martha");

    // no row with that id, nothing changes
    assert!(!contacts.rename(99, "Nobody").unwrap());
}

#[test]
fn remove_reports_whether_a_row_was_deleted() {
    let contacts = ContactStore::open_in_memory().unwrap();
    contacts.insert(&Contact::new(1, "Ray")).unwrap();

    assert!(contacts.remove(1).unwrap());
    assert!(!contacts.remove(1).unwrap());
    assert_eq!(contacts.count().unwrap(), 0);
    assert!(contacts.all().unwrap().is_empty());
}

#[test]
fn closed_store_rejects_operations() {
    let mut contacts = ContactStore::open_in_memory().unwrap();
    contacts.close().unwrap();

    let err = contacts.insert(&Contact::new(1, "Ray")).unwrap_err();
    assert!(matches!(err, StoreError::Closed));
}

#[test]
fn contacts_survive_reopen() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path().to_str().unwrap();

    let mut contacts = ContactStore::open(path).unwrap();
    contacts.insert(&Contact::new(1, "Ray")).unwrap();
    contacts.close().unwrap();

    let contacts = ContactStore::open(path).unwrap();
    assert_eq!(contacts.get(1).unwrap(), Some(Contact::new(1, "Ray")));
}
