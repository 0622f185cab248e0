use roster_core::db::{open_db, open_db_in_memory};
use roster_core::{
    DocumentFields, ManualClock, RecordDraft, RecordRepository, RemoteStore, SqliteDocumentStore,
    StoreError,
};
use serde_json::json;

fn fields(value: serde_json::Value) -> DocumentFields {
    value.as_object().cloned().unwrap()
}

#[test]
fn insert_then_list_preserves_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    let first = store.insert("users", &fields(json!({"name": "Zed"}))).unwrap();
    let second = store.insert("users", &fields(json!({"name": "Amy"}))).unwrap();
    store.insert("admins", &fields(json!({"name": "Root"}))).unwrap();

    let listed = store.list_all("users").unwrap();
    let ids = listed.iter().map(|doc| doc.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids, vec![first, second]);
    assert!(!listed[0].fields.contains_key("id"));
}

#[test]
fn insert_drops_null_fields() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    store
        .insert("users", &fields(json!({"name": "Ann", "email": null})))
        .unwrap();

    let listed = store.list_all("users").unwrap();
    assert_eq!(listed[0].fields, fields(json!({"name": "Ann"})));
}

#[test]
fn update_merges_and_removes_null_fields() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();
    let id = store
        .insert(
            "users",
            &fields(json!({"name": "Ann", "email": "a@b.co", "createdAt": "t0"})),
        )
        .unwrap();

    store
        .update_by_id("users", &id, &fields(json!({"name": "Anne", "email": null})))
        .unwrap();

    let listed = store.list_all("users").unwrap();
    assert_eq!(
        listed[0].fields,
        fields(json!({"name": "Anne", "createdAt": "t0"}))
    );
}

#[test]
fn update_missing_document_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    let err = store
        .update_by_id("users", "nope", &fields(json!({"name": "Ann"})))
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(id) if id == "nope"));
}

#[test]
fn delete_missing_document_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    store.delete_by_id("users", "nope").unwrap();
    assert!(store.list_all("users").unwrap().is_empty());
}

#[test]
fn corrupt_body_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO documents (collection, doc_id, body) VALUES ('users', 'x', '{\"name\": 1}');",
        [],
    )
    .unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();
    let mut repo = RecordRepository::with_clock(&store, "users", ManualClock::from_epoch());

    let err = repo.refresh().unwrap_err();
    assert!(err.to_string().contains("invalid document data"));
}

#[test]
fn repository_crud_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.db");
    let draft = RecordDraft {
        name: "Ann".to_string(),
        age: "30".to_string(),
        address: "X".to_string(),
        email: "a@b.co".to_string(),
        phone: String::new(),
    };

    let id = {
        let conn = open_db(&path).unwrap();
        let store = SqliteDocumentStore::try_new(&conn).unwrap();
        let mut repo = RecordRepository::with_clock(&store, "users", ManualClock::from_epoch());
        repo.create(&draft).unwrap()
    };

    let conn = open_db(&path).unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();
    let mut repo = RecordRepository::with_clock(&store, "users", ManualClock::from_epoch());
    repo.refresh().unwrap();
    let record = repo.find(&id).unwrap();
    assert_eq!(record.name, "Ann");
    assert_eq!(record.email.as_deref(), Some("a@b.co"));
    assert_eq!(record.phone, None);
    assert_eq!(record.created_at, "1970-01-01T00:00:00.000Z");

    repo.delete(&id).unwrap();
    assert!(repo.records().is_empty());
}
