//! AAM Platform
//!
//! Authentication gateway in front of Sentinel and AWS:
//! - OAuth code exchange and token refresh proxied to Sentinel
//! - User lookup proxied to Sentinel
//! - AWS console federation: role selection, `AssumeRoleWithWebIdentity`
//!   and one-time console sign-in URLs
//!
//! ## Module Organization
//!
//! - `identity` - Sentinel client, identity entities, auth and user APIs
//! - `iam` - role policy, STS/federation client, IAM login API
//! - `shared` - errors, state, extractors, ping, OpenAPI

use std::any::Any as PanicPayload;

use axum::{
    http::HeaderValue,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod iam;
pub mod identity;
pub mod shared;

pub use iam::{
    decide_role, AwsFederationClient, FederationError, FederationProvider, RoleDecision,
    RolePolicy, TemporaryCredentials,
};
pub use identity::{Identity, IdentityProvider, SentinelClient, Subteam, TokenBundle, UpstreamError};
pub use shared::error::{GatewayError, Result};
pub use shared::middleware::{AppState, BearerToken};

/// Assemble every route with the shared state, docs, CORS and request tracing.
///
/// A handler panic is answered with 500 `{"message": <panic text>}`.
pub fn app_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(shared::ping_api::ping_router())
        .merge(identity::auth_router())
        .merge(identity::users_router())
        .merge(iam::iam_router())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", shared::openapi::ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn panic_response(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let description = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "Unexpected error".to_string()
    };

    GatewayError::unexpected(description).into_response()
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}
