//! OAuth token endpoints proxied to Sentinel

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::identity::entity::TokenBundle;
use crate::shared::error::{ErrorResponse, GatewayError, Result};
use crate::shared::middleware::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginParams {
    /// OAuth authorization code
    pub code: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RefreshParams {
    /// Refresh token
    pub token: String,
}

fn query_error(rejection: QueryRejection) -> GatewayError {
    GatewayError::InvalidRequest(rejection.body_text())
}

/// Exchange an authorization code for tokens
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    params(LoginParams),
    responses(
        (status = 200, description = "Token bundle from Sentinel", body = TokenBundle),
        (status = 400, description = "Rejected by Sentinel or missing code", body = ErrorResponse),
        (status = 500, description = "Sentinel unreachable", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    params: std::result::Result<Query<LoginParams>, QueryRejection>,
) -> Result<Json<TokenBundle>> {
    let Query(params) = params.map_err(query_error)?;
    let bundle = state.identity.exchange_code_for_token(&params.code).await?;
    Ok(Json(bundle))
}

/// Refresh tokens
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "Auth",
    params(RefreshParams),
    responses(
        (status = 200, description = "Refreshed token bundle", body = TokenBundle),
        (status = 400, description = "Rejected by Sentinel or missing token", body = ErrorResponse),
        (status = 500, description = "Sentinel unreachable", body = ErrorResponse)
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    params: std::result::Result<Query<RefreshParams>, QueryRejection>,
) -> Result<Json<TokenBundle>> {
    let Query(params) = params.map_err(query_error)?;
    let bundle = state.identity.refresh_token(&params.token).await?;
    Ok(Json(bundle))
}

pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}
