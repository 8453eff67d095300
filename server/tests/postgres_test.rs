//! Tests for the PostgreSQL row store.
//!
//! These need a reachable database and are skipped when `DATABASE_URL` is
//! not set. Each test only touches rows it created.

use roster_engine::{NewUser, UserField, UserPatch};
use roster_server::db::{PgUserStore, StoreError, UserStore};

async fn store() -> Option<PgUserStore> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let store = PgUserStore::connect(&url).await.unwrap();
    store.migrate().await.unwrap();
    Some(store)
}

fn unique(prefix: &str) -> String {
    format!("{prefix}_{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test]
async fn insert_returns_assigned_row_for_duplicate_names() {
    let Some(store) = store().await else { return };
    let name = unique("twin");

    let first = store
        .insert(&NewUser::new(name.clone(), 30, "a@example.com"))
        .await
        .unwrap();
    let second = store
        .insert(&NewUser::new(name.clone(), 31, "b@example.com"))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.age, 30);
    assert_eq!(second.age, 31);
    assert_eq!(second.email, "b@example.com");

    store.delete(first.id).await.unwrap();
    store.delete(second.id).await.unwrap();
}

#[tokio::test]
async fn update_sets_only_present_fields() {
    let Some(store) = store().await else { return };
    let name = unique("john");
    let john = store
        .insert(&NewUser::new(name.clone(), 28, "john@example.com"))
        .await
        .unwrap();

    let patch = UserPatch::single(john.id, UserField::Age, &UserField::Age.parse("29").unwrap());
    store.update(&patch).await.unwrap();

    let mut both = UserPatch::new(john.id);
    both.name = Some(format!("{name}_renamed"));
    both.email = Some("johnny@example.com".into());
    store.update(&both).await.unwrap();

    let stored = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.id == john.id)
        .unwrap();
    assert_eq!(stored.age, 29);
    assert_eq!(stored.name, format!("{name}_renamed"));
    assert_eq!(stored.email, "johnny@example.com");
    assert!(stored.last_updated >= john.last_updated);

    assert_eq!(store.delete(john.id).await.unwrap(), 1);
    assert_eq!(store.delete(john.id).await.unwrap(), 0);
}

#[tokio::test]
async fn update_of_missing_row_is_not_found() {
    let Some(store) = store().await else { return };
    let mut patch = UserPatch::new(i64::MAX);
    patch.age = Some(40);

    assert!(matches!(
        store.update(&patch).await,
        Err(StoreError::NotFound(id)) if id == i64::MAX
    ));
}
