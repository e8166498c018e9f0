// ABOUTME: Integration tests for session bootstrap against a mock HTTP backend.
// ABOUTME: Covers create-on-miss, reuse-on-hit, and every fail-stop response shape.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use supportchat::session::{
    FileSessionStore, HttpSessionApi, SessionBootstrapper, SessionError, SessionId, SessionStore,
};

fn bootstrapper(server: &MockServer, store: FileSessionStore) -> SessionBootstrapper {
    SessionBootstrapper::new(Box::new(store), Arc::new(HttpSessionApi::new(&server.uri())))
}

#[tokio::test]
async fn empty_storage_creates_session_once_and_persists_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "abc123" })))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let storage = tmp.path().join("storage.json");
    let mut bootstrapper =
        bootstrapper(&server, FileSessionStore::open(&storage, "chatSessionId"));

    let id = bootstrapper.ensure_session().await.unwrap();
    assert_eq!(id, SessionId::new("abc123"));

    // A later run reads the same id back from disk.
    let reopened = FileSessionStore::open(&storage, "chatSessionId");
    assert_eq!(reopened.get(), Some(SessionId::new("abc123")));
}

#[tokio::test]
async fn cached_session_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "other" })))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let storage = tmp.path().join("storage.json");
    let mut store = FileSessionStore::open(&storage, "chatSessionId");
    store.set(SessionId::new("cached-42")).unwrap();

    let mut bootstrapper = bootstrapper(&server, store);
    let id = bootstrapper.ensure_session().await.unwrap();
    assert_eq!(id, SessionId::new("cached-42"));
}

#[tokio::test]
async fn numeric_id_from_backend_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 17 })))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let mut bootstrapper = bootstrapper(
        &server,
        FileSessionStore::open(tmp.path().join("storage.json"), "chatSessionId"),
    );

    assert_eq!(
        bootstrapper.ensure_session().await.unwrap(),
        SessionId::new("17")
    );
}

#[tokio::test]
async fn server_error_is_fail_stop() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/session"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let storage = tmp.path().join("storage.json");
    let mut bootstrapper =
        bootstrapper(&server, FileSessionStore::open(&storage, "chatSessionId"));

    let err = bootstrapper.ensure_session().await.unwrap_err();
    match err {
        SessionError::Status(status) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected Status, got {:?}", other),
    }
    assert!(bootstrapper.store().get().is_none());
    assert!(!storage.exists(), "nothing should be written on failure");
}

#[tokio::test]
async fn malformed_body_is_fail_stop() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/session"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let mut bootstrapper = bootstrapper(
        &server,
        FileSessionStore::open(tmp.path().join("storage.json"), "chatSessionId"),
    );

    let err = bootstrapper.ensure_session().await.unwrap_err();
    assert!(matches!(err, SessionError::MalformedResponse(_)));
    assert!(bootstrapper.store().get().is_none());
}

#[tokio::test]
async fn unreachable_backend_is_request_error() {
    // Reserve a port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let tmp = tempfile::tempdir().unwrap();
    let mut bootstrapper = SessionBootstrapper::new(
        Box::new(FileSessionStore::open(
            tmp.path().join("storage.json"),
            "chatSessionId",
        )),
        Arc::new(HttpSessionApi::new(&format!("http://{}", addr))),
    );

    let err = bootstrapper.ensure_session().await.unwrap_err();
    assert!(matches!(err, SessionError::Request(_)));
}
