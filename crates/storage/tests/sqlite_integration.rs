use storage::repository::LocalStore;
use storage::sqlite::SqliteRepository;
use storage::Storage;

#[tokio::test]
async fn sqlite_local_storage_round_trip() {
    let repo =
        SqliteRepository::connect("sqlite:file:memdb_local_round_trip?mode=memory&cache=shared")
            .await
            .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get_item("take-test-form").await.unwrap(), None);

    repo.set_item("take-test-form", r#"{"secondsLeft":10}"#)
        .await
        .unwrap();
    repo.set_item("take-test-form", r#"{"secondsLeft":9}"#)
        .await
        .unwrap();
    assert_eq!(
        repo.get_item("take-test-form").await.unwrap().as_deref(),
        Some(r#"{"secondsLeft":9}"#)
    );

    repo.remove_item("take-test-form").await.unwrap();
    assert_eq!(repo.get_item("take-test-form").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    repo.set_item("test", "{}").await.unwrap();
    assert_eq!(repo.get_item("test").await.unwrap().as_deref(), Some("{}"));
}

#[tokio::test]
async fn storage_sqlite_exposes_local_store() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage_facade?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage.local.set_item("testResults", "[]").await.unwrap();
    assert_eq!(
        storage.local.get_item("testResults").await.unwrap().as_deref(),
        Some("[]")
    );
}
