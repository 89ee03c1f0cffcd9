//! IAM aggregate: role selection and AWS console federation.

pub mod federation_client;
pub mod iam_api;
pub mod role_policy;

pub use federation_client::{AwsFederationClient, FederationError, FederationProvider, TemporaryCredentials};
pub use iam_api::{iam_router, IamLoginResponse};
pub use role_policy::{decide_role, RoleDecision, RolePolicy};
