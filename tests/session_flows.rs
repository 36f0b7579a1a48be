//! End-to-end flows across the store, client and service crates

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use panelkit_api::{ApiError, AuthService, ChatService, ItemDraft, ItemsService};
use panelkit_http::{AuthHttpClient, ClientConfig};
use panelkit_store::{
    ChatHistoryStore, CredentialStore, KeyValueStore, MemoryStore, StoredCredentials,
};

struct Harness {
    auth: AuthService,
    items: ItemsService,
    chat: ChatService,
    credentials: Arc<StoredCredentials>,
}

fn harness(server: &MockServer) -> Harness {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let credentials = Arc::new(StoredCredentials::new(store.clone()));

    let config = ClientConfig::new()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(5));
    let client = Arc::new(AuthHttpClient::new(config, credentials.clone()).unwrap());

    Harness {
        auth: AuthService::new(client.clone(), credentials.clone()),
        items: ItemsService::new(client.clone()),
        chat: ChatService::new(client, ChatHistoryStore::new(store)),
        credentials,
    }
}

#[tokio::test]
async fn full_session_flow() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({"username": "admin", "password": "123456"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-session",
            "token_type": "bearer",
            "message": "welcome"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/verify-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "user": "admin"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/items/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "name": "first", "description": "created in flow"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "hi", "status": "success"
        })))
        .mount(&server)
        .await;

    let h = harness(&server);

    let session = h.auth.login("admin", "123456").await.unwrap();
    assert_eq!(session.message.as_deref(), Some("welcome"));

    let verification = h.auth.verify().await.unwrap();
    assert_eq!(verification.user, "admin");

    let item = h
        .items
        .create(&ItemDraft::new("first", "created in flow"))
        .await
        .unwrap();
    assert_eq!(item.id, 1);

    let reply = h.chat.send("hello").await.unwrap();
    assert_eq!(reply.response, "hi");
    assert_eq!(h.chat.history().await.unwrap().len(), 2);

    h.auth.logout().await.unwrap();
    assert_eq!(h.credentials.load().await.unwrap(), None);
}

#[tokio::test]
async fn expired_token_is_evicted_mid_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/items/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "token expired"
        })))
        .mount(&server)
        .await;

    let h = harness(&server);
    h.credentials.store("stale").await.unwrap();

    let result = h.items.list().await;
    assert!(matches!(result, Err(ApiError::Unauthenticated)));
    assert_eq!(h.credentials.load().await.unwrap(), None);

    // Every later call short-circuits until a fresh login.
    let chat_result = h.chat.send("hello").await;
    assert!(matches!(chat_result, Err(ApiError::Unauthenticated)));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn chat_degrades_while_items_report_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/items/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let h = harness(&server);
    h.credentials.store("tok").await.unwrap();

    // Same failure class, two caller policies: chat substitutes a canned
    // reply, the item service surfaces the classified error.
    let reply = h.chat.send("hello").await.unwrap();
    assert!(reply.is_fallback());

    let items = h.items.list().await;
    assert!(matches!(items, Err(ApiError::Http { .. })));
}

#[tokio::test]
async fn concurrent_calls_do_not_share_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/items/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/verify-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true, "user": "admin"
        })))
        .mount(&server)
        .await;

    let h = harness(&server);
    h.credentials.store("tok").await.unwrap();

    // No ordering guarantee between in-flight calls; both must complete
    // independently.
    let (items, verification) = tokio::join!(h.items.list(), h.auth.verify());
    assert!(items.unwrap().is_empty());
    assert!(verification.unwrap().valid);
}

#[tokio::test]
async fn slow_backend_yields_timeout_not_hang() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/items/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let credentials = Arc::new(StoredCredentials::new(store));
    credentials.store("tok").await.unwrap();
    let config = ClientConfig::new()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(100));
    let client = Arc::new(AuthHttpClient::new(config, credentials.clone()).unwrap());

    let result = ItemsService::new(client).list().await;
    assert!(matches!(result, Err(ApiError::Timeout(_))));

    // The timeout must not have touched the credential.
    assert_eq!(credentials.load().await.unwrap(), Some("tok".to_string()));
}
