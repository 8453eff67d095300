//! End-to-end tests: grid session against a live in-memory record service.

use roster_client::{ClientError, GridSession, RecordClient};
use roster_engine::{NewUser, NoticeKind, SnapshotOutcome, UserField};
use roster_server::db::MemoryUserStore;
use roster_server::{build_router, AppState};
use std::sync::Arc;
use std::time::Duration;

async fn spawn_server() -> (String, Arc<MemoryUserStore>) {
    let store = Arc::new(MemoryUserStore::new());
    let app = build_router(AppState::new(store.clone()), Duration::from_secs(5));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), store)
}

fn client(base_url: &str) -> RecordClient {
    RecordClient::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn john_scenario() {
    let (url, _) = spawn_server().await;
    let mut session = GridSession::new(client(&url));
    assert_eq!(session.refresh().await.unwrap(), SnapshotOutcome::Applied);

    session
        .create_row(NewUser::new("John", 28, "john@example.com"))
        .await
        .unwrap();
    let id = session.grid().rows()[0].id;
    assert!(id > 0);

    let listed = client(&url).list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].name, "John");

    session.edit_cell(id, UserField::Age, "29").await.unwrap();
    let listed = client(&url).list().await.unwrap();
    assert_eq!(listed[0].age, 29);
    assert_eq!(listed[0].name, "John");
    assert_eq!(listed[0].email, "john@example.com");
    assert_eq!(session.grid().snapshot()[0].age, 29);

    session.delete_row(id).await.unwrap();
    assert!(client(&url).list().await.unwrap().is_empty());
    assert!(session.grid().rows().is_empty());
    assert!(session.take_notices().is_empty());
}

#[tokio::test]
async fn update_rolls_back_when_store_fails() {
    let (url, store) = spawn_server().await;
    let mut session = GridSession::new(client(&url));
    session
        .create_row(NewUser::new("John", 28, "john@example.com"))
        .await
        .unwrap();
    let id = session.grid().rows()[0].id;

    store.set_failing(true);
    session.edit_cell(id, UserField::Age, "29").await.unwrap();

    assert_eq!(session.grid().row(id).unwrap().age, 28);
    assert!(session.grid().is_idle());

    let notices = session.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::UpdateFailed);
    assert!(notices[0].detail.contains("Failed to update user"));
}

#[tokio::test]
async fn delete_failure_restores_rows() {
    let (url, store) = spawn_server().await;
    let mut session = GridSession::new(client(&url));
    session
        .create_row(NewUser::new("Jane", 32, "jane@example.com"))
        .await
        .unwrap();
    session.refresh().await.unwrap();
    let id = session.grid().rows()[0].id;

    store.set_failing(true);
    session.delete_row(id).await.unwrap();

    assert!(session.grid().row(id).is_some());
    assert_eq!(session.take_notices()[0].kind, NoticeKind::DeleteFailed);
}

#[tokio::test]
async fn create_failure_drops_placeholder() {
    let (url, store) = spawn_server().await;
    store.set_failing(true);

    let mut session = GridSession::new(client(&url));
    session
        .create_row(NewUser::placeholder(1706745600000))
        .await
        .unwrap();

    assert!(session.grid().rows().is_empty());
    assert_eq!(session.take_notices()[0].kind, NoticeKind::CreateFailed);
}

#[tokio::test]
async fn client_surfaces_error_body() {
    let (url, store) = spawn_server().await;
    store.set_failing(true);

    let err = client(&url).list().await.unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to fetch users");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn editing_unknown_row_is_an_error() {
    let (url, _) = spawn_server().await;
    let mut session = GridSession::new(client(&url));

    let err = session
        .edit_cell(7, UserField::Name, "Nobody")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Grid(_)));
}
