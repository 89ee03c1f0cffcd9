//! Sentinel API Client
//!
//! Wraps every call to the upstream identity provider. Non-200 responses are
//! translated into [`UpstreamError`]; there are no retries, a failed call
//! surfaces immediately.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{error, info};

use aam_config::SentinelConfig;

use super::entity::{Identity, TokenBundle};

/// Message used when an error body is not `{"message": "..."}`.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";
/// Message used when a 200 body does not match the expected schema.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response format";

/// Error reported by (or while talking to) the identity provider.
///
/// `status_code` is the upstream status for non-200 replies and 500 for
/// transport or parse failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Sentinel error: [{status_code}] {message}")]
pub struct UpstreamError {
    pub status_code: u16,
    pub message: String,
}

impl UpstreamError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    fn request_failed(err: &reqwest::Error) -> Self {
        Self::new(500, format!("Request failed: {}", err))
    }

    fn invalid_response() -> Self {
        Self::new(500, INVALID_RESPONSE_MESSAGE)
    }
}

/// Error body shape used by Sentinel
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Operations the gateway needs from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Probe the provider. Never fails; any problem yields `false`.
    async fn ping(&self) -> bool;

    async fn exchange_code_for_token(&self, code: &str) -> Result<TokenBundle, UpstreamError>;

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenBundle, UpstreamError>;

    /// All identities, in upstream order. Authenticated with the service token.
    async fn list_identities(&self) -> Result<Vec<Identity>, UpstreamError>;

    /// A single identity. Authenticated with the service token.
    async fn get_identity(&self, id: &str) -> Result<Identity, UpstreamError>;

    /// The identity that owns `bearer_token`.
    async fn current_identity(&self, bearer_token: &str) -> Result<Identity, UpstreamError>;
}

/// reqwest-backed Sentinel client
#[derive(Debug, Clone)]
pub struct SentinelClient {
    http_client: reqwest::Client,
    config: SentinelConfig,
}

impl SentinelClient {
    pub fn new(config: SentinelConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http_client: reqwest::Client, mut config: SentinelConfig) -> Self {
        config.url = config.url.trim_end_matches('/').to_string();
        Self { http_client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.url, path)
    }

    async fn post_token_form(
        &self,
        params: &[(&str, &str)],
        operation: &'static str,
    ) -> Result<TokenBundle, UpstreamError> {
        let response = self
            .http_client
            .post(self.url("/oauth/token"))
            .form(params)
            .send()
            .await
            .map_err(|e| {
                error!(operation, error = %e, "Sentinel request failed");
                UpstreamError::request_failed(&e)
            })?;

        parse_response(response, operation).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer_token: &str,
        operation: &'static str,
    ) -> Result<T, UpstreamError> {
        let response = self
            .http_client
            .get(self.url(path))
            .bearer_auth(bearer_token)
            .send()
            .await
            .map_err(|e| {
                error!(operation, error = %e, "Sentinel request failed");
                UpstreamError::request_failed(&e)
            })?;

        parse_response(response, operation).await
    }
}

/// Turn a Sentinel response into `T` or an [`UpstreamError`].
async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &'static str,
) -> Result<T, UpstreamError> {
    let status = response.status();
    let body = response.bytes().await.map_err(|e| {
        error!(operation, error = %e, "Failed to read Sentinel response body");
        UpstreamError::request_failed(&e)
    })?;

    if status != StatusCode::OK {
        info!(
            operation,
            status = status.as_u16(),
            body = %String::from_utf8_lossy(&body),
            "Sentinel returned an error response"
        );
        return Err(error_from_body(status.as_u16(), &body));
    }

    serde_json::from_slice(&body).map_err(|e| {
        error!(operation, error = %e, "Failed to parse Sentinel response");
        UpstreamError::invalid_response()
    })
}

fn error_from_body(status_code: u16, body: &[u8]) -> UpstreamError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => UpstreamError::new(status_code, parsed.message),
        Err(_) => UpstreamError::new(status_code, UNKNOWN_ERROR_MESSAGE),
    }
}

#[async_trait]
impl IdentityProvider for SentinelClient {
    async fn ping(&self) -> bool {
        match self.http_client.get(self.url("/ping")).send().await {
            Ok(response) => {
                info!(status = response.status().as_u16(), "Pinged Sentinel");
                response.status() == StatusCode::OK
            }
            Err(e) => {
                error!(error = %e, "Failed to ping Sentinel");
                false
            }
        }
    }

    async fn exchange_code_for_token(&self, code: &str) -> Result<TokenBundle, UpstreamError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        self.post_token_form(&params, "exchange_code_for_token").await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenBundle, UpstreamError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        self.post_token_form(&params, "refresh_token").await
    }

    async fn list_identities(&self) -> Result<Vec<Identity>, UpstreamError> {
        self.get_json("/users", &self.config.token, "list_identities").await
    }

    async fn get_identity(&self, id: &str) -> Result<Identity, UpstreamError> {
        let path = format!("/users/{}", urlencoding::encode(id));
        self.get_json(&path, &self.config.token, "get_identity").await
    }

    async fn current_identity(&self, bearer_token: &str) -> Result<Identity, UpstreamError> {
        self.get_json("/users/@me", bearer_token, "current_identity").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_message_body() {
        let err = error_from_body(400, br#"{"message":"bad code"}"#);
        assert_eq!(err, UpstreamError::new(400, "bad code"));
    }

    #[test]
    fn test_error_from_unparsable_body() {
        assert_eq!(error_from_body(502, b"<html>bad gateway</html>").message, UNKNOWN_ERROR_MESSAGE);
        assert_eq!(error_from_body(404, br#"{"error":"nope"}"#).message, UNKNOWN_ERROR_MESSAGE);
        assert_eq!(error_from_body(401, b"").status_code, 401);
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let client = SentinelClient::new(SentinelConfig {
            url: "http://sentinel.local/".to_string(),
            ..Default::default()
        });
        assert_eq!(client.url("/ping"), "http://sentinel.local/ping");
    }

    #[test]
    fn test_upstream_error_display() {
        let err = UpstreamError::new(403, "forbidden");
        assert_eq!(err.to_string(), "Sentinel error: [403] forbidden");
    }
}
