//! Wire-level tests for the API client against a mock server.
//!
//! These verify the GReader contract: login token extraction, the
//! GoogleLogin authorization header, the pagination cursor, request body
//! shapes, and the cross-cutting 403 mapping on every authenticated call.

use pretty_assertions::assert_eq;
use serde_json::json;
use tidings::api::{ApiClient, ApiError};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Option<&str>) -> ApiClient {
    ApiClient::new(
        Url::parse(&server.uri()).unwrap(),
        token.map(str::to_string),
        50,
    )
    .unwrap()
}

fn fake_item(id: usize) -> serde_json::Value {
    json!({
        "id": format!("tag:google.com,2005:reader/item/{:016x}", id),
        "title": format!("Item {}", id),
        "origin": { "title": "Example Feed" },
        "summary": { "content": "<p>body</p>" },
        "categories": ["user/-/state/com.google/fresh"],
        "canonical": [{ "href": format!("https://example.com/{}", id) }],
        "published": 1700000000
    })
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_extracts_token_from_third_line() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/ClientLogin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("SID=null\nLSID=null\nAuth=tok-123"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, None);
    let token = api.login("alice@example.com", "hunter2").await.unwrap();
    assert_eq!(token, "tok-123");
}

#[tokio::test]
async fn test_login_installs_token_for_later_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/ClientLogin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("SID=null\nLSID=null\nAuth=tok-456"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/unread"))
        .and(header("Authorization", "GoogleLogin auth=tok-456"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "items": [], "nextPageOffset": null })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, None);
    api.login("alice@example.com", "hunter2").await.unwrap();
    api.load_unread(None).await.unwrap();
}

#[tokio::test]
async fn test_login_failure_is_status_not_auth_expired() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/ClientLogin"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Error=BadAuthentication"))
        .mount(&server)
        .await;

    let api = client_for(&server, None);
    let err = api.login("alice@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ApiError::Status(403)));
}

#[tokio::test]
async fn test_login_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/ClientLogin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("unexpected"))
        .mount(&server)
        .await;

    let api = client_for(&server, None);
    let err = api.login("alice@example.com", "pw").await.unwrap_err();
    assert!(matches!(err, ApiError::MalformedLogin));
}

// ============================================================================
// Unread pagination
// ============================================================================

#[tokio::test]
async fn test_unread_pagination_cursor_round_trip() {
    // 60 unread items on the server, page size 50: first page returns 50
    // plus a cursor, second page returns the remaining 10 and no cursor.
    let server = MockServer::start().await;

    let first: Vec<_> = (0..50).map(fake_item).collect();
    Mock::given(method("GET"))
        .and(path("/api/unread"))
        .and(query_param("limit", "50"))
        .and(query_param_is_missing("offset"))
        .and(header("Authorization", "GoogleLogin auth=tok"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": first, "nextPageOffset": "50" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let second: Vec<_> = (50..60).map(fake_item).collect();
    Mock::given(method("GET"))
        .and(path("/api/unread"))
        .and(query_param("limit", "50"))
        .and(query_param("offset", "50"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": second, "nextPageOffset": null })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, Some("tok"));

    let page1 = api.load_unread(None).await.unwrap();
    assert_eq!(page1.items.len(), 50);
    assert_eq!(page1.next_page_offset.as_deref(), Some("50"));

    let page2 = api.load_unread(page1.next_page_offset.as_deref()).await.unwrap();
    assert_eq!(page2.items.len(), 10);
    assert_eq!(page2.next_page_offset, None);
    assert_eq!(page2.items[0].title, "Item 50");
}

#[tokio::test]
async fn test_unread_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/unread"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let api = client_for(&server, Some("tok"));
    let err = api.load_unread(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// ============================================================================
// Mark as read / add subscription bodies
// ============================================================================

#[tokio::test]
async fn test_mark_as_read_posts_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/markAsRead"))
        .and(header("Authorization", "GoogleLogin auth=tok"))
        .and(body_json(json!({ "ids": ["a", "b"] })))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, Some("tok"));
    api.mark_as_read(&["a".to_string(), "b".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_add_subscription_posts_full_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/addSubscription"))
        .and(body_json(json!({
            "link": "https://example.com/feed.xml",
            "title": "Example",
            "folder": "Tech"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, Some("tok"));
    api.add_subscription("https://example.com/feed.xml", Some("Example"), Some("Tech"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_add_subscription_omits_empty_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/addSubscription"))
        .and(body_json(json!({ "link": "https://example.com/feed.xml" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, Some("tok"));
    api.add_subscription("https://example.com/feed.xml", None, None)
        .await
        .unwrap();
}

// ============================================================================
// Error taxonomy
// ============================================================================

#[tokio::test]
async fn test_403_is_auth_expired_on_every_authenticated_call() {
    let server = MockServer::start().await;
    for p in ["/api/unread", "/api/markAsRead", "/api/addSubscription"] {
        Mock::given(path(p))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
    }

    let api = client_for(&server, Some("stale"));

    let err = api.load_unread(None).await.unwrap_err();
    assert!(err.is_auth_expired());

    let err = api.mark_as_read(&["x".to_string()]).await.unwrap_err();
    assert!(err.is_auth_expired());

    let err = api
        .add_subscription("https://example.com/feed.xml", None, None)
        .await
        .unwrap_err();
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_other_non_ok_statuses_are_descriptive_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/unread"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = client_for(&server, Some("tok"));
    let err = api.load_unread(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Status(500)));
    assert!(err.to_string().contains("500"));
}
