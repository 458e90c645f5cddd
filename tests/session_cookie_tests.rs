// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::time::Duration;

use cushion::{ClientConfig, CouchClient, Error, GetDocument, Operation, SessionState};
use serde_json::{json, Value};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_ok(cookie: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("set-cookie", format!("{}; Version=1; Path=/; HttpOnly", cookie).as_str())
        .set_body_json(json!({"ok": true, "name": "admin", "roles": ["_admin"]}))
}

fn document() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"_id": "doc", "_rev": "1-abc"}))
}

fn client(server: &MockServer, password: &str) -> CouchClient {
    CouchClient::with_config(ClientConfig::new(server.uri()).credentials("admin", password)).unwrap()
}

#[tokio::test]
async fn test_cookie_obtained_once_and_reused() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_session"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("name=admin&password=p%40ss+w%26rd"))
        .respond_with(session_ok("AuthSession=abc"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/doc"))
        .and(header("cookie", "AuthSession=abc"))
        .respond_with(document())
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server, "p@ss w&rd");
    for _ in 0..2 {
        let doc: Value = client.get_document("db", "doc").await.unwrap();
        assert_eq!(doc["_id"], "doc");
    }

    assert_eq!(client.session_state(), Some(SessionState::HasCookie));
    assert_eq!(client.metrics().session_requests, 1);
}

#[tokio::test]
async fn test_unauthorized_response_renews_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_session"))
        .respond_with(session_ok("AuthSession=first"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/_session"))
        .respond_with(session_ok("AuthSession=second"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/doc"))
        .and(header("cookie", "AuthSession=first"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "unauthorized",
            "reason": "Session expired"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/doc"))
        .and(header("cookie", "AuthSession=second"))
        .respond_with(document())
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, "secret");
    let doc: Value = client.get_document("db", "doc").await.unwrap();
    assert_eq!(doc["_rev"], "1-abc");

    let report = client.metrics();
    assert_eq!(report.session_requests, 2);
    assert_eq!(report.retries, 1);
    assert_eq!(report.exchanges, 2);
}

#[tokio::test]
async fn test_forbidden_response_renews_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_session"))
        .respond_with(session_ok("AuthSession=abc"))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/db"))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/db"))
        .and(header("cookie", "AuthSession=abc"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, "secret");
    client.create_database("db").await.unwrap();
}

#[tokio::test]
async fn test_rejected_credentials_disable_authentication() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_session"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "unauthorized",
            "reason": "Name or password is incorrect."
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Any request still carrying a cookie would fail to match
    Mock::given(method("GET"))
        .and(path("/db/doc"))
        .respond_with(ResponseTemplate::new(401))
        .expect(3)
        .mount(&server)
        .await;

    let client = client(&server, "wrong");
    for _ in 0..3 {
        let err = client.get_document::<Value>("db", "doc").await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));
        assert!(err.is_unauthorized());
    }

    assert_eq!(client.session_state(), Some(SessionState::AuthDisabled));
    let report = client.metrics();
    assert_eq!(report.session_requests, 1);
    assert_eq!(report.retries, 0);
}

#[tokio::test]
async fn test_client_error_on_session_disables_authentication() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_session"))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/doc"))
        .respond_with(document())
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server, "secret");
    for _ in 0..2 {
        client.get_document::<Value>("db", "doc").await.unwrap();
    }
    assert_eq!(client.session_state(), Some(SessionState::AuthDisabled));
}

#[tokio::test]
async fn test_server_error_on_session_is_transient() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_session"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/_session"))
        .respond_with(session_ok("AuthSession=abc"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/doc"))
        .and(header("cookie", "AuthSession=abc"))
        .respond_with(document())
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/doc"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, "secret");
    client.get_document::<Value>("db", "doc").await.unwrap();

    assert_eq!(client.session_state(), Some(SessionState::HasCookie));
    assert_eq!(client.metrics().session_requests, 2);
}

#[tokio::test]
async fn test_set_cookie_on_response_replaces_cached_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_session"))
        .respond_with(session_ok("AuthSession=old"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/doc"))
        .and(header("cookie", "AuthSession=old"))
        .respond_with(document().insert_header("set-cookie", "AuthSession=refreshed; Path=/; HttpOnly"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/doc"))
        .and(header("cookie", "AuthSession=refreshed"))
        .respond_with(document())
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, "secret");
    client.get_document::<Value>("db", "doc").await.unwrap();
    client.get_document::<Value>("db", "doc").await.unwrap();
}

#[tokio::test]
async fn test_session_timeout_proceeds_without_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_session"))
        .respond_with(session_ok("AuthSession=late").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/doc"))
        .respond_with(document())
        .expect(1)
        .mount(&server)
        .await;

    let client = CouchClient::with_config(
        ClientConfig::new(server.uri())
            .credentials("admin", "secret")
            .session_timeout(Duration::from_millis(100)),
    )
    .unwrap();

    client.get_document::<Value>("db", "doc").await.unwrap();
    assert_eq!(client.session_state(), Some(SessionState::NoCookie));
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_session"))
        .respond_with(session_ok("AuthSession=abc"))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/doc"))
        .respond_with(ResponseTemplate::new(401))
        .expect(3)
        .mount(&server)
        .await;

    let client = CouchClient::with_config(
        ClientConfig::new(server.uri())
            .credentials("admin", "secret")
            .max_retries(2),
    )
    .unwrap();

    let err = client.get_document::<Value>("db", "doc").await.unwrap_err();
    assert!(matches!(err, Error::Operation { status: 401, .. }));
    assert_eq!(client.metrics().retries, 2);
}

#[tokio::test]
async fn test_session_endpoint_follows_base_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/couch/_session"))
        .respond_with(session_ok("AuthSession=prefixed"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/couch/db/doc"))
        .and(header("cookie", "AuthSession=prefixed"))
        .respond_with(document())
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(format!("{}/couch/", server.uri())).credentials("admin", "secret");
    let client = CouchClient::with_config(config).unwrap();

    let doc: Value = client.get_document("db", "doc").await.unwrap();
    assert_eq!(doc["_id"], "doc");
    assert_eq!(client.session_state(), Some(SessionState::HasCookie));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_operations_share_session() {
    const OPERATIONS: usize = 32;
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_session"))
        .respond_with(session_ok("AuthSession=shared").set_delay(Duration::from_millis(100)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/db/doc"))
        .and(header("cookie", "AuthSession=shared"))
        .respond_with(document())
        .expect(OPERATIONS as u64)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri())
        .credentials("admin", "secret")
        .max_concurrent_operations(16);
    let client = CouchClient::with_config(config).unwrap();

    let operations: Vec<Operation> = (0..OPERATIONS)
        .map(|_| GetDocument::new().database("db").doc_id("doc").into())
        .collect();
    let results = client.execute_all(operations).await;

    assert_eq!(results.len(), OPERATIONS);
    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(client.session_state(), Some(SessionState::HasCookie));

    let session_requests = client.metrics().session_requests;
    assert!(
        (1..=OPERATIONS as u64).contains(&session_requests),
        "session requests: {}",
        session_requests
    );
}
