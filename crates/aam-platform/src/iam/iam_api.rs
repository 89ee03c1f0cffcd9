//! AWS console login endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::iam::federation_client::TemporaryCredentials;
use crate::shared::error::{ErrorResponse, Result};
use crate::shared::middleware::{AppState, BearerToken};

/// Temporary credentials plus a one-time console sign-in URL
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IamLoginResponse {
    #[serde(flatten)]
    pub credentials: TemporaryCredentials,
    pub login_url: String,
}

/// Federate the caller into AWS.
///
/// Resolves the bearer token to an identity, picks the admin or member role,
/// assumes it with the same token and mints a console sign-in URL.
#[utoipa::path(
    post,
    path = "/iam/login",
    tag = "IAM",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Credentials and console URL", body = IamLoginResponse),
        (status = 401, description = "Missing bearer token", body = ErrorResponse),
        (status = 500, description = "Sentinel or AWS failure", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<IamLoginResponse>> {
    let identity = state.identity.current_identity(token.as_str()).await?;

    let (decision, role_arn) = state.policy.role_arn_for(&identity);
    info!(
        user_id = %identity.id,
        role = decision.as_str(),
        role_arn,
        "Selected federation role"
    );

    let credentials = state
        .federation
        .assume_role(token.as_str(), role_arn, &identity.email)
        .await?;

    let login_url = state
        .federation
        .build_console_login_url(&credentials, None)
        .await
        .inspect_err(|e| error!(user_id = %identity.id, error = %e, "Error building login URL"))?;

    Ok(Json(IamLoginResponse {
        credentials,
        login_url,
    }))
}

pub fn iam_router() -> Router<AppState> {
    Router::new().route("/iam/login", post(login))
}
