//! API Middleware
//!
//! Shared application state and the bearer token extractor.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::iam::federation_client::FederationProvider;
use crate::iam::role_policy::RolePolicy;
use crate::identity::sentinel_client::IdentityProvider;
use crate::shared::error::GatewayError;

/// Application state containing the stateless service objects
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub federation: Arc<dyn FederationProvider>,
    pub policy: Arc<RolePolicy>,
    pub version: String,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        federation: Arc<dyn FederationProvider>,
        policy: RolePolicy,
        version: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            federation,
            policy: Arc::new(policy),
            version: version.into(),
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` value.
pub fn extract_bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Caller-supplied bearer token.
///
/// Rejects with [`GatewayError::Unauthorized`] before the handler runs, so no
/// collaborator is called when the header is absent or malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer_token)
            .map(|token| BearerToken(token.to_string()))
            .ok_or(GatewayError::Unauthorized)
    }
}
