//! User lookup endpoints proxied to Sentinel

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};

use crate::identity::entity::Identity;
use crate::shared::error::{ErrorResponse, GatewayError, Result};
use crate::shared::middleware::{AppState, BearerToken};

/// List all users (service token)
#[utoipa::path(
    get,
    path = "/users",
    tag = "User",
    responses(
        (status = 200, description = "All users in Sentinel order", body = Vec<Identity>),
        (status = 500, description = "Sentinel failure", body = ErrorResponse)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<Identity>>> {
    let identities = state.identity.list_identities().await?;
    Ok(Json(identities))
}

/// The caller's own user record
#[utoipa::path(
    get,
    path = "/users/@me",
    tag = "User",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = Identity),
        (status = 401, description = "Missing bearer token", body = ErrorResponse),
        (status = 500, description = "Sentinel failure", body = ErrorResponse)
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<Identity>> {
    let identity = state.identity.current_identity(token.as_str()).await?;
    Ok(Json(identity))
}

/// A single user by id (service token)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "User",
    params(("id" = String, Path, description = "Sentinel user id")),
    responses(
        (status = 200, description = "User", body = Identity),
        (status = 400, description = "Malformed user id", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse),
        (status = 500, description = "Sentinel failure", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    id: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<Identity>> {
    let Path(id) = id.map_err(|rejection| GatewayError::InvalidRequest(rejection.body_text()))?;
    let identity = state.identity.get_identity(&id).await?;
    Ok(Json(identity))
}

pub fn users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/@me", get(current_user))
        .route("/users/{id}", get(get_user))
}
