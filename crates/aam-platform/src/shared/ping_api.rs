//! Ping Endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::middleware::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PingResponse {
    pub message: String,
}

/// Liveness banner
#[utoipa::path(
    get,
    path = "/ping",
    tag = "Ping",
    responses(
        (status = 200, description = "Service is online", body = PingResponse)
    )
)]
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        message: format!("AAM v{} is online!", state.version),
    })
}

pub fn ping_router() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}
