//! Identity aggregate: Sentinel-backed users and OAuth tokens.

pub mod auth_api;
pub mod entity;
pub mod sentinel_client;
pub mod users_api;

pub use auth_api::auth_router;
pub use entity::{Identity, Subteam, TokenBundle};
pub use sentinel_client::{IdentityProvider, SentinelClient, UpstreamError};
pub use users_api::users_router;
