use chrono::NaiveDate;
use scholarslate_core::db::open_db_in_memory;
use scholarslate_core::{
    ContentStore, InMemoryContentStore, InMemoryItemCatalog, ItemCatalog, ItemId, ItemKind,
    MetadataPatch, NewItem, RepoError, SqliteContentStore, SqliteItemCatalog,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
}

fn new_item(kind: ItemKind, title: &str, highlights: &[&str]) -> NewItem {
    NewItem {
        kind,
        title: title.to_string(),
        subject: "Physics".to_string(),
        last_modified: date(1),
        excerpt: format!("{title} excerpt"),
        highlights: highlights.iter().map(|phrase| phrase.to_string()).collect(),
    }
}

fn exercise_catalog(catalog: &mut impl ItemCatalog) {
    let first_note = catalog
        .append(new_item(ItemKind::Note, "Forces", &["Newton"]))
        .unwrap();
    let first_doc = catalog
        .append(new_item(ItemKind::Document, "Lab report", &[]))
        .unwrap();
    let second_note = catalog
        .append(new_item(ItemKind::Note, "Energy", &[]))
        .unwrap();

    assert_eq!(first_note.as_str(), "n1");
    assert_eq!(first_doc.as_str(), "d1");
    assert_eq!(second_note.as_str(), "n2");

    let titles = catalog
        .list()
        .unwrap()
        .into_iter()
        .map(|item| item.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Forces", "Lab report", "Energy"]);

    let loaded = catalog.get(&first_note).unwrap().unwrap();
    assert_eq!(loaded.kind, ItemKind::Note);
    assert_eq!(loaded.highlights, vec!["Newton"]);
    assert!(catalog.get(&ItemId::from("n99")).unwrap().is_none());

    let patch = MetadataPatch {
        last_modified: Some(date(20)),
        highlights: Some(vec!["second law".to_string(), "inertia".to_string()]),
        ..MetadataPatch::default()
    };
    catalog.update(&first_note, &patch).unwrap();
    let updated = catalog.get(&first_note).unwrap().unwrap();
    assert_eq!(updated.title, "Forces");
    assert_eq!(updated.last_modified, date(20));
    assert_eq!(updated.highlights, vec!["second law", "inertia"]);

    let clear = MetadataPatch {
        highlights: Some(Vec::new()),
        ..MetadataPatch::default()
    };
    catalog.update(&first_note, &clear).unwrap();
    assert!(catalog.get(&first_note).unwrap().unwrap().highlights.is_empty());

    let err = catalog
        .update(&ItemId::from("d42"), &MetadataPatch::default())
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id.as_str() == "d42"));
    assert_eq!(catalog.list().unwrap().len(), 3);
}

fn exercise_contents(store: &mut impl ContentStore) {
    let id = ItemId::from("n1");
    assert_eq!(store.get(&id).unwrap(), None);

    store.set(&id, "first draft").unwrap();
    store.set(&id, "second draft").unwrap();
    assert_eq!(store.get(&id).unwrap().as_deref(), Some("second draft"));

    // Keys need not exist in any catalog.
    let orphan = ItemId::from("d77");
    store.set(&orphan, "").unwrap();
    assert_eq!(store.get(&orphan).unwrap().as_deref(), Some(""));
}

#[test]
fn in_memory_catalog_follows_contract() {
    exercise_catalog(&mut InMemoryItemCatalog::new());
}

#[test]
fn sqlite_catalog_follows_contract() {
    let conn = open_db_in_memory().unwrap();
    exercise_catalog(&mut SqliteItemCatalog::try_new(&conn).unwrap());
}

#[test]
fn in_memory_content_store_follows_contract() {
    exercise_contents(&mut InMemoryContentStore::new());
}

#[test]
fn sqlite_content_store_follows_contract() {
    let conn = open_db_in_memory().unwrap();
    exercise_contents(&mut SqliteContentStore::try_new(&conn).unwrap());
}

#[test]
fn sqlite_catalog_skips_ids_that_are_already_taken() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO items (id, kind, title, subject, last_modified, excerpt)
         VALUES ('n1', 'note', 'Imported', 'Physics', '2024-07-01', '');",
        [],
    )
    .unwrap();
    conn.execute("UPDATE items SET id = 'n2' WHERE id = 'n1';", [])
        .unwrap();

    let mut catalog = SqliteItemCatalog::try_new(&conn).unwrap();
    let id = catalog
        .append(new_item(ItemKind::Note, "Waves", &[]))
        .unwrap();
    assert_eq!(id.as_str(), "n3");
}

#[test]
fn sqlite_catalog_rejects_connection_without_schema() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    assert!(SqliteItemCatalog::try_new(&conn).is_err());
    assert!(SqliteContentStore::try_new(&conn).is_err());
}

#[test]
fn sqlite_catalog_reports_corrupt_dates() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO items (id, kind, title, subject, last_modified, excerpt)
         VALUES ('n1', 'note', 'Broken', 'Physics', 'yesterday', '');",
        [],
    )
    .unwrap();

    let catalog = SqliteItemCatalog::try_new(&conn).unwrap();
    let err = catalog.get(&ItemId::from("n1")).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
