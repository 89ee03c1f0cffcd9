//! AWS Federation Client
//!
//! Exchanges the caller's web identity token for temporary role credentials
//! (STS `AssumeRoleWithWebIdentity`) and turns those credentials into a
//! single-use AWS console sign-in URL via the federation endpoint.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use aam_config::IamConfig;

/// Fallback when the identity has no usable session name.
pub const DEFAULT_SESSION_NAME: &str = "aam-session";

/// STS limit on role session names
const MAX_SESSION_NAME_LEN: usize = 64;

/// Error raised when STS or the federation endpoint rejects a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Federation error: [{status_code}] {message}")]
pub struct FederationError {
    pub status_code: u16,
    pub message: String,
}

impl FederationError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

/// Temporary credentials for an assumed role. Created per login request and
/// never stored; AWS enforces the expiration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TemporaryCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime<Utc>,
    pub assumed_role_arn: String,
    pub subject_from_web_identity_token: Option<String>,
}

/// Session descriptor sent to the federation endpoint
#[derive(Debug, Serialize)]
struct SessionDescriptor<'a> {
    #[serde(rename = "sessionId")]
    session_id: &'a str,
    #[serde(rename = "sessionKey")]
    session_key: &'a str,
    #[serde(rename = "sessionToken")]
    session_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct SigninTokenResponse {
    #[serde(rename = "SigninToken")]
    signin_token: String,
}

/// Operations the gateway needs from AWS.
#[async_trait]
pub trait FederationProvider: Send + Sync {
    /// Assume `role_arn` with `web_identity_token` as proof of identity.
    async fn assume_role(
        &self,
        web_identity_token: &str,
        role_arn: &str,
        session_name: &str,
    ) -> Result<TemporaryCredentials, FederationError>;

    /// Mint a console sign-in URL. `None` uses the configured destination.
    async fn build_console_login_url(
        &self,
        credentials: &TemporaryCredentials,
        destination: Option<&str>,
    ) -> Result<String, FederationError>;
}

/// STS + federation endpoint client
#[derive(Debug, Clone)]
pub struct AwsFederationClient {
    sts: aws_sdk_sts::Client,
    http_client: reqwest::Client,
    federation_url: String,
    issuer: String,
    default_destination: String,
    duration_seconds: i32,
    federation_timeout: Duration,
}

impl AwsFederationClient {
    /// Build the STS client for `config.region`.
    ///
    /// `AssumeRoleWithWebIdentity` is authenticated by the token alone, so
    /// the SDK is loaded without a credentials chain. Retries are disabled.
    pub async fn from_config(config: &IamConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .retry_config(aws_config::retry::RetryConfig::disabled())
            .no_credentials();

        if let Some(endpoint) = &config.sts_endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let sdk_config = loader.load().await;
        info!(region = %config.region, "Initialized STS client");

        Self::new(aws_sdk_sts::Client::new(&sdk_config), reqwest::Client::new(), config)
    }

    pub fn new(sts: aws_sdk_sts::Client, http_client: reqwest::Client, config: &IamConfig) -> Self {
        Self {
            sts,
            http_client,
            federation_url: config.federation_url.clone(),
            issuer: config.issuer.clone(),
            default_destination: config.console_destination.clone(),
            duration_seconds: config.session_duration_secs,
            federation_timeout: Duration::from_secs(config.federation_timeout_secs),
        }
    }
}

#[async_trait]
impl FederationProvider for AwsFederationClient {
    async fn assume_role(
        &self,
        web_identity_token: &str,
        role_arn: &str,
        session_name: &str,
    ) -> Result<TemporaryCredentials, FederationError> {
        let session_name = sanitize_session_name(session_name);

        let response = self
            .sts
            .assume_role_with_web_identity()
            .role_arn(role_arn)
            .role_session_name(&session_name)
            .web_identity_token(web_identity_token)
            .duration_seconds(self.duration_seconds)
            .send()
            .await
            .map_err(|err| {
                error!(
                    role_arn,
                    code = err.code().unwrap_or_default(),
                    error = %DisplayErrorContext(&err),
                    "AssumeRoleWithWebIdentity failed"
                );
                match err.code() {
                    Some(code) => FederationError::new(
                        500,
                        format!("{}: {}", code, err.message().unwrap_or_default()),
                    ),
                    None => FederationError::new(500, DisplayErrorContext(&err).to_string()),
                }
            })?;

        let credentials = response.credentials().ok_or_else(|| {
            FederationError::new(500, "No credentials returned from AssumeRoleWithWebIdentity")
        })?;

        let expiration = credentials.expiration();
        let expiration = DateTime::<Utc>::from_timestamp(expiration.secs(), expiration.subsec_nanos())
            .ok_or_else(|| FederationError::new(500, "Credential expiration out of range"))?;

        let assumed_role_arn = response
            .assumed_role_user()
            .map(|user| user.arn().to_string())
            .unwrap_or_default();

        info!(
            assumed_role_arn = %assumed_role_arn,
            session_name = %session_name,
            expiration = %expiration,
            "Assumed role with web identity"
        );

        Ok(TemporaryCredentials {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expiration,
            assumed_role_arn,
            subject_from_web_identity_token: response
                .subject_from_web_identity_token()
                .map(str::to_string),
        })
    }

    async fn build_console_login_url(
        &self,
        credentials: &TemporaryCredentials,
        destination: Option<&str>,
    ) -> Result<String, FederationError> {
        let session = serde_json::to_string(&SessionDescriptor {
            session_id: &credentials.access_key_id,
            session_key: &credentials.secret_access_key,
            session_token: &credentials.session_token,
        })
        .map_err(|e| FederationError::new(500, format!("Failed to encode session: {}", e)))?;

        let response = self
            .http_client
            .get(&self.federation_url)
            .query(&[
                ("Action", "getSigninToken"),
                ("SessionType", "json"),
                ("Session", session.as_str()),
            ])
            .timeout(self.federation_timeout)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Sign-in token request failed");
                FederationError::new(500, format!("Sign-in token request failed: {}", e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FederationError::new(500, format!("Failed to read sign-in token response: {}", e)))?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "Federation endpoint rejected sign-in token request");
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("Federation request failed").to_string()
            } else {
                body
            };
            return Err(FederationError::new(status.as_u16(), message));
        }

        let token: SigninTokenResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Sign-in token response did not contain SigninToken");
            FederationError::new(500, format!("Invalid sign-in token response: {}", e))
        })?;

        Ok(compose_login_url(
            &self.federation_url,
            &self.issuer,
            destination.unwrap_or(&self.default_destination),
            &token.signin_token,
        ))
    }
}

/// Build the final `Action=login` URL. Every parameter value is
/// percent-encoded with no safe characters.
pub fn compose_login_url(
    federation_url: &str,
    issuer: &str,
    destination: &str,
    signin_token: &str,
) -> String {
    format!(
        "{}?Action=login&Issuer={}&Destination={}&SigninToken={}",
        federation_url,
        urlencoding::encode(issuer),
        urlencoding::encode(destination),
        urlencoding::encode(signin_token),
    )
}

/// Restrict a session name to the characters and length STS accepts.
pub fn sanitize_session_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || "_+=,.@-".contains(c) {
                c
            } else {
                '-'
            }
        })
        .take(MAX_SESSION_NAME_LEN)
        .collect();

    if cleaned.len() < 2 {
        DEFAULT_SESSION_NAME.to_string()
    } else {
        cleaned
    }
}
