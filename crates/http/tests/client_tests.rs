//! Integration tests for the courier HTTP client

use courier_core::testing::{MemoryStore, RecordingNavigator};
use courier_core::{ClientConfig, ClientProfile, SessionContext};
use courier_http::{AuthenticatedClient, ClientError, RequestOptions};
use reqwest::Method;
use serde_json::json;
use std::rc::Rc;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    client: AuthenticatedClient,
    store: Rc<MemoryStore>,
    navigator: Rc<RecordingNavigator>,
}

fn harness(server: &MockServer, profile: ClientProfile, token: Option<&str>) -> Harness {
    let store = match token {
        Some(token) => MemoryStore::default().with_item("token", token),
        None => MemoryStore::default(),
    };
    let store = Rc::new(store);
    let navigator = Rc::new(RecordingNavigator::at("/chats"));
    let session = SessionContext::new(store.clone(), profile);
    let client = AuthenticatedClient::builder()
        .base_url(server.uri())
        .build(session, navigator.clone())
        .unwrap();

    Harness {
        client,
        store,
        navigator,
    }
}

async fn mount_refresh(server: &MockServer, old: &str, status: u16, body: serde_json::Value, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(header("authorization", format!("Bearer {old}").as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_builder_requires_base_url() {
    let session = SessionContext::new(Rc::new(MemoryStore::default()), ClientProfile::default());
    let result = AuthenticatedClient::builder().build(session, Rc::new(RecordingNavigator::at("/")));
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

fn client_at(base_url: &str) -> AuthenticatedClient {
    let config = ClientConfig {
        base_url: base_url.to_string(),
        ..ClientConfig::default()
    };
    let session = SessionContext::new(Rc::new(MemoryStore::default()), config.profile);
    AuthenticatedClient::from_config(&config, session, Rc::new(RecordingNavigator::at("/")))
        .unwrap()
}

#[tokio::test]
async fn test_url_resolves_like_fetch() {
    let client = client_at("http://localhost:8080");
    let url = |path: &str| client.url(path).unwrap().to_string();

    assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
    assert_eq!(url("/api/x"), "http://localhost:8080/api/x");
    assert_eq!(url("api/x"), "http://localhost:8080/api/x");
    assert_eq!(url("https://other.example/y"), "https://other.example/y");
    assert_eq!(url("HTTPS://other.example/y"), "https://other.example/y");
    assert_eq!(url("//cdn.example/x"), "http://cdn.example/x");
}

#[tokio::test]
async fn test_url_resolves_against_page_path() {
    let client = client_at("http://localhost:8080/chats/7");
    let url = |path: &str| client.url(path).unwrap().to_string();

    assert_eq!(url("api/x"), "http://localhost:8080/chats/api/x");
    assert_eq!(url("/api/x"), "http://localhost:8080/api/x");
}

#[tokio::test]
async fn test_builder_rejects_invalid_base_url() {
    let session = SessionContext::new(Rc::new(MemoryStore::default()), ClientProfile::default());
    let result = AuthenticatedClient::builder()
        .base_url("not a url")
        .build(session, Rc::new(RecordingNavigator::at("/")));
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_relative_url_without_leading_slash() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/x"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"v": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, ClientProfile::local_only(), Some("abc"));
    let result = h.client.api_request("api/x", RequestOptions::new()).await;
    assert_eq!(result, Some(json!({"v": 1})));
}

#[tokio::test]
async fn test_no_token_skips_network_and_redirects() {
    let server = MockServer::start().await;
    Mock::given(path("/api/x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"v": 1})))
        .expect(0)
        .mount(&server)
        .await;

    for profile in [ClientProfile::local_only(), ClientProfile::server_redirect()] {
        let h = harness(&server, profile, None);
        let result = h.client.api_request("/api/x", RequestOptions::new()).await;
        assert_eq!(result, None);
        assert_eq!(h.navigator.visits(), vec!["/login".to_string()]);

        let err = h
            .client
            .send_authorized::<serde_json::Value>("/api/x", &RequestOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingToken));
        assert!(err.is_auth_expired());
    }
}

#[tokio::test]
async fn test_success_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/x"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"v": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, ClientProfile::local_only(), Some("abc"));
    let result = h.client.api_request("/api/x", RequestOptions::new()).await;
    assert_eq!(result, Some(json!({"v": 1})));
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_unauthorized_refreshes_once_and_retries() {
    let server = MockServer::start().await;
    Mock::given(path("/api/x"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/api/x"))
        .and(header("authorization", "Bearer xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"v": 2})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "abc", 200, json!({"access_token": "xyz"}), 1).await;

    let h = harness(&server, ClientProfile::server_redirect(), Some("abc"));
    let result = h.client.api_request("/api/x", RequestOptions::new()).await;

    assert_eq!(result, Some(json!({"v": 2})));
    assert_eq!(h.store.stored_token().as_deref(), Some("xyz"));
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_retry_uses_refreshed_token_over_stale_cookie() {
    let server = MockServer::start().await;
    Mock::given(path("/api/x"))
        .and(header("authorization", "Bearer from-cookie"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/api/x"))
        .and(header("authorization", "Bearer xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "from-cookie", 200, json!({"access_token": "xyz"}), 1).await;

    let h = harness(&server, ClientProfile::server_redirect(), None);
    h.store.set_cookie(Some("token=from-cookie"));

    let result = h.client.api_request("/api/x", RequestOptions::new()).await;
    assert_eq!(result, Some(json!({"ok": true})));
    assert_eq!(h.store.stored_token().as_deref(), Some("xyz"));
}

#[tokio::test]
async fn test_failed_refresh_ends_session() {
    let server = MockServer::start().await;
    Mock::given(path("/api/x"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "abc", 401, json!({"detail": "expired"}), 1).await;

    let h = harness(&server, ClientProfile::server_redirect(), Some("abc"));
    let result = h.client.api_request("/api/x", RequestOptions::new()).await;

    assert_eq!(result, None);
    assert_eq!(h.store.stored_token(), None);
    assert_eq!(h.navigator.visits(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_second_unauthorized_does_not_refresh_again() {
    let server = MockServer::start().await;
    Mock::given(path("/api/x"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(&server, "abc", 200, json!({"access_token": "xyz"}), 1).await;

    let h = harness(&server, ClientProfile::server_redirect(), Some("abc"));
    let result = h.client.api_request("/api/x", RequestOptions::new()).await;

    assert_eq!(result, None);
    assert_eq!(h.store.stored_token(), None);
    assert_eq!(h.navigator.last_visit().as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_local_profile_treats_unauthorized_as_terminal() {
    let server = MockServer::start().await;
    Mock::given(path("/api/x"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "xyz"})))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, ClientProfile::local_only(), Some("abc"));
    let result = h.client.api_request("/api/x", RequestOptions::new()).await;

    assert_eq!(result, None);
    assert_eq!(h.store.stored_token(), None);
    assert_eq!(h.navigator.visits(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_rejected_credential_reports_authentication_failed() {
    let server = MockServer::start().await;
    Mock::given(path("/api/x"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .mount(&server)
        .await;

    let h = harness(&server, ClientProfile::local_only(), Some("abc"));
    let err = h
        .client
        .send_authorized::<serde_json::Value>("/api/x", &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::AuthenticationFailed(ref message) if message == "expired"));
    assert_eq!(err.status(), Some(401));
    assert_eq!(h.store.stored_token(), None);
    assert_eq!(h.navigator.visits(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_server_error_is_normalized_to_none() {
    let server = MockServer::start().await;
    Mock::given(path("/api/x"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let h = harness(&server, ClientProfile::server_redirect(), Some("abc"));
    assert_eq!(h.client.api_request("/api/x", RequestOptions::new()).await, None);
    assert_eq!(h.store.stored_token().as_deref(), Some("abc"));
    assert!(h.navigator.visits().is_empty());

    let err = h
        .client
        .send_authorized::<serde_json::Value>("/api/x", &RequestOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ServerError { status: 500, .. }));
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_malformed_body_is_normalized_to_none() {
    let server = MockServer::start().await;
    Mock::given(path("/api/x"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let h = harness(&server, ClientProfile::local_only(), Some("abc"));
    assert_eq!(h.client.api_request("/api/x", RequestOptions::new()).await, None);

    let err = h
        .client
        .send_authorized::<serde_json::Value>("/api/x", &RequestOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Serialization(_)));
}

#[tokio::test]
async fn test_network_failure_is_normalized_to_none() {
    let store = Rc::new(MemoryStore::default().with_item("token", "abc"));
    let navigator = Rc::new(RecordingNavigator::at("/chats"));
    let client = AuthenticatedClient::builder()
        .base_url("http://127.0.0.1:1")
        .build(
            SessionContext::new(store.clone(), ClientProfile::local_only()),
            navigator.clone(),
        )
        .unwrap();

    assert_eq!(client.api_request("/api/x", RequestOptions::new()).await, None);
    assert_eq!(store.stored_token().as_deref(), Some("abc"));
    assert!(navigator.visits().is_empty());
}

#[tokio::test]
async fn test_caller_options_pass_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/messages/"))
        .and(header("authorization", "Token custom"))
        .and(header("x-chat", "7"))
        .and(body_json(json!({"chat_id": 7, "content": "hi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, ClientProfile::local_only(), Some("abc"));
    let options = RequestOptions::new()
        .method(Method::POST)
        .header("Authorization", "Token custom")
        .header("X-Chat", "7")
        .json(json!({"chat_id": 7, "content": "hi"}));

    assert_eq!(
        h.client.api_request("/api/messages/", options).await,
        Some(json!({"id": 1}))
    );
}

#[tokio::test]
async fn test_invalid_caller_header_is_reported() {
    let server = MockServer::start().await;
    let h = harness(&server, ClientProfile::local_only(), Some("abc"));
    let options = RequestOptions::new().header("bad header", "x");

    let err = h
        .client
        .send_authorized::<serde_json::Value>("/api/x", &options)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidHeader { .. }));
    assert_eq!(h.client.api_request("/api/x", options).await, None);
}

#[tokio::test]
async fn test_refresh_without_token_makes_no_call() {
    let server = MockServer::start().await;
    mount_refresh(&server, "abc", 200, json!({"access_token": "xyz"}), 0).await;

    let h = harness(&server, ClientProfile::server_redirect(), None);
    assert!(!h.client.refresh_token().await);
}

#[tokio::test]
async fn test_refresh_persists_new_token() {
    let server = MockServer::start().await;
    mount_refresh(&server, "abc", 200, json!({"access_token": "xyz", "token_type": "bearer"}), 1).await;

    let h = harness(&server, ClientProfile::server_redirect(), Some("abc"));
    assert!(h.client.refresh_token().await);
    assert_eq!(h.store.stored_token().as_deref(), Some("xyz"));
}

#[tokio::test]
async fn test_failed_refresh_keeps_old_token() {
    let server = MockServer::start().await;
    mount_refresh(&server, "abc", 500, json!({}), 1).await;

    let h = harness(&server, ClientProfile::server_redirect(), Some("abc"));
    assert!(!h.client.refresh_token().await);
    assert_eq!(h.store.stored_token().as_deref(), Some("abc"));
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_server_logout_clears_token_and_redirects() {
    for status in [200, 500] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/logout"))
            .respond_with(ResponseTemplate::new(status))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server, ClientProfile::server_redirect(), Some("abc"));
        h.client.logout().await;
        assert_eq!(h.store.stored_token(), None);
        assert_eq!(h.navigator.visits(), vec!["/login".to_string()]);
    }
}

#[tokio::test]
async fn test_logout_survives_network_failure() {
    let store = Rc::new(MemoryStore::default().with_item("token", "abc"));
    let navigator = Rc::new(RecordingNavigator::at("/chats"));
    let client = AuthenticatedClient::builder()
        .base_url("http://127.0.0.1:1")
        .build(
            SessionContext::new(store.clone(), ClientProfile::server_redirect()),
            navigator.clone(),
        )
        .unwrap();

    client.logout().await;
    assert_eq!(store.stored_token(), None);
    assert_eq!(navigator.visits(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_local_logout_makes_no_call() {
    let server = MockServer::start().await;
    Mock::given(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, ClientProfile::local_only(), Some("abc"));
    h.client.logout().await;
    assert_eq!(h.store.stored_token(), None);
    assert_eq!(h.navigator.visits(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_login_stores_issued_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=s3cret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "issued", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, ClientProfile::local_only(), None);
    let token = h.client.login("alice", "s3cret").await.unwrap();
    assert_eq!(token.access_token, "issued");
    assert_eq!(h.store.stored_token().as_deref(), Some("issued"));
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "bad credentials"})))
        .mount(&server)
        .await;

    let h = harness(&server, ClientProfile::local_only(), None);
    let err = h.client.login("alice", "wrong").await.unwrap_err();
    assert!(err.is_auth_expired());
    assert_eq!(h.store.stored_token(), None);
}

#[tokio::test]
async fn test_current_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "username": "alice",
            "email": "alice@example.com",
            "is_active": true,
            "is_admin": false,
            "created_at": "2024-03-01T10:00:00",
            "updated_at": "2024-03-02T10:00:00"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, ClientProfile::local_only(), Some("abc"));
    let user = h.client.current_user().await.unwrap();
    assert_eq!(user.id, 3);
    assert_eq!(user.username, "alice");
    assert!(!user.is_admin);
    assert_eq!(user.created_at.to_string(), "2024-03-01 10:00:00");
}

#[tokio::test]
async fn test_check_auth_uses_client_session() {
    let server = MockServer::start().await;
    let h = harness(&server, ClientProfile::local_only(), None);
    assert!(!h.client.check_auth());
    assert_eq!(h.navigator.visits(), vec!["/login".to_string()]);
}
