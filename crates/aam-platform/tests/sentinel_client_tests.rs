//! Sentinel Client Integration Tests
//!
//! Exercises the upstream error contract against a wiremock server.

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aam_config::SentinelConfig;
use aam_platform::{IdentityProvider, SentinelClient, UpstreamError};

fn sentinel_config(url: &str) -> SentinelConfig {
    SentinelConfig {
        url: url.to_string(),
        client_id: "aam-client".to_string(),
        client_secret: "aam-secret".to_string(),
        token: "svc-token".to_string(),
        redirect_uri: "https://aam.example.com/auth/login".to_string(),
    }
}

fn user_json(id: &str, roles: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "username": format!("user{id}"),
        "first_name": "Jordan",
        "last_name": "Lee",
        "email": format!("user{id}@example.edu"),
        "phone_number": "",
        "gender": "",
        "birthday": "",
        "graduate_level": "Undergraduate",
        "graduation_year": 2026,
        "major": "Mechanical Engineering",
        "shirt_size": "L",
        "jacket_size": "L",
        "sae_registration_number": "",
        "avatar_url": "",
        "verified": true,
        "subteams": [{"id": "7", "name": "Powertrain", "created_at": "2024-01-01T00:00:00Z"}],
        "roles": roles,
        "updated_at": "2024-06-01T00:00:00Z",
        "created_at": "2024-01-01T00:00:00Z"
    })
}

/// Address nothing listens on
const UNREACHABLE: &str = "http://127.0.0.1:1";

#[tokio::test]
async fn test_ping_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "pong"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SentinelClient::new(sentinel_config(&server.uri()));
    assert!(client.ping().await);
}

#[tokio::test]
async fn test_ping_non_200_is_false() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = SentinelClient::new(sentinel_config(&server.uri()));
    assert!(!client.ping().await);
}

#[tokio::test]
async fn test_ping_unreachable_is_false() {
    let client = SentinelClient::new(sentinel_config(UNREACHABLE));
    assert!(!client.ping().await);
}

#[tokio::test]
async fn test_exchange_code_for_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc123"))
        .and(body_string_contains("client_id=aam-client"))
        .and(body_string_contains("client_secret=aam-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access",
            "refresh_token": "refresh",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SentinelClient::new(sentinel_config(&server.uri()));
    let bundle = client.exchange_code_for_token("abc123").await.unwrap();

    assert_eq!(bundle.access_token.as_deref(), Some("access"));
    assert_eq!(bundle.refresh_token.as_deref(), Some("refresh"));
    assert_eq!(bundle.expires_in, Some(3600));
    assert!(bundle.id_token.is_none());
    assert!(bundle.scope.is_none());
}

#[tokio::test]
async fn test_exchange_code_error_message_passthrough() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({"message": "bad code"})))
        .mount(&server)
        .await;

    let client = SentinelClient::new(sentinel_config(&server.uri()));
    let err = client.exchange_code_for_token("nope").await.unwrap_err();
    assert_eq!(err, UpstreamError::new(400, "bad code"));
}

#[tokio::test]
async fn test_unparsable_error_body_is_unknown_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = SentinelClient::new(sentinel_config(&server.uri()));
    let err = client.exchange_code_for_token("abc").await.unwrap_err();
    assert_eq!(err, UpstreamError::new(502, "Unknown error"));
}

#[tokio::test]
async fn test_transport_failure_is_request_failed() {
    let client = SentinelClient::new(sentinel_config(UNREACHABLE));
    let err = client.exchange_code_for_token("abc").await.unwrap_err();
    assert_eq!(err.status_code, 500);
    assert!(err.message.starts_with("Request failed: "), "{}", err.message);
}

#[tokio::test]
async fn test_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=r-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-2",
            "refresh_token": "r-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SentinelClient::new(sentinel_config(&server.uri()));
    let bundle = client.refresh_token("r-1").await.unwrap();
    assert_eq!(bundle.access_token.as_deref(), Some("access-2"));
    assert_eq!(bundle.refresh_token.as_deref(), Some("r-2"));
}

#[tokio::test]
async fn test_list_identities_uses_service_token_and_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("Authorization", "Bearer svc-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            user_json("3", &["d_member"]),
            user_json("1", &["d_admin"]),
            user_json("2", &[]),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = SentinelClient::new(sentinel_config(&server.uri()));
    let identities = client.list_identities().await.unwrap();
    let ids: Vec<&str> = identities.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "1", "2"]);
    assert_eq!(identities[0].subteams[0].name, "Powertrain");
}

#[tokio::test]
async fn test_get_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/42"))
        .and(header("Authorization", "Bearer svc-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("42", &["d_lead"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = SentinelClient::new(sentinel_config(&server.uri()));
    let identity = client.get_identity("42").await.unwrap();
    assert_eq!(identity.id, "42");
    assert!(identity.is_lead());
}

#[tokio::test]
async fn test_get_identity_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "user not found"})))
        .mount(&server)
        .await;

    let client = SentinelClient::new(sentinel_config(&server.uri()));
    let err = client.get_identity("404").await.unwrap_err();
    assert_eq!(err, UpstreamError::new(404, "user not found"));
}

#[tokio::test]
async fn test_current_identity_uses_caller_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .and(header("Authorization", "Bearer caller-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json("9", &["d_member"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = SentinelClient::new(sentinel_config(&server.uri()));
    let identity = client.current_identity("caller-token").await.unwrap();
    assert_eq!(identity.id, "9");
}

#[tokio::test]
async fn test_schema_mismatch_is_invalid_response_format() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "9"})))
        .mount(&server)
        .await;

    let client = SentinelClient::new(sentinel_config(&server.uri()));
    let err = client.current_identity("caller-token").await.unwrap_err();
    assert_eq!(err, UpstreamError::new(500, "Invalid response format"));
}

#[tokio::test]
async fn test_non_200_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = SentinelClient::new(sentinel_config(&server.uri()));
    let err = client.list_identities().await.unwrap_err();
    assert_eq!(err, UpstreamError::new(201, "Unknown error"));
}
