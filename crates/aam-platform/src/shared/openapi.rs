//! OpenAPI document served at `/openapi.json` and rendered at `/docs`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::iam::{iam_api, IamLoginResponse, TemporaryCredentials};
use crate::identity::{auth_api, users_api, Identity, Subteam, TokenBundle};
use crate::shared::error::ErrorResponse;
use crate::shared::ping_api::{self, PingResponse};

#[derive(OpenApi)]
#[openapi(
    info(title = "Gaucho Racing AAM", description = "API Documentation"),
    paths(
        ping_api::ping,
        auth_api::login,
        auth_api::refresh,
        users_api::list_users,
        users_api::current_user,
        users_api::get_user,
        iam_api::login,
    ),
    components(schemas(
        PingResponse,
        ErrorResponse,
        TokenBundle,
        Identity,
        Subteam,
        TemporaryCredentials,
        IamLoginResponse,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "Ping", description = "Liveness"),
        (name = "Auth", description = "OAuth token exchange"),
        (name = "User", description = "User lookup"),
        (name = "IAM", description = "AWS console federation")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}
