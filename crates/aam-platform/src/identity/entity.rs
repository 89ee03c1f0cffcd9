//! Identity entities
//!
//! Read-through projections of Sentinel state. The gateway never mutates them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role names that make up the inner circle.
pub mod roles {
    pub const ADMIN: &str = "d_admin";
    pub const OFFICER: &str = "d_officer";
    pub const LEAD: &str = "d_lead";
    pub const SPECIAL_ADVISOR: &str = "d_special_advisor";

    pub const INNER_CIRCLE: [&str; 4] = [ADMIN, OFFICER, LEAD, SPECIAL_ADVISOR];
}

/// A subteam an identity belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Subteam {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A user record as returned by Sentinel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub gender: String,
    pub birthday: String,
    pub graduate_level: String,
    pub graduation_year: i32,
    pub major: String,
    pub shirt_size: String,
    pub jacket_size: String,
    pub sae_registration_number: String,
    pub avatar_url: String,
    pub verified: bool,
    /// Ordered as Sentinel returns them
    #[serde(default)]
    pub subteams: Vec<Subteam>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_subteam(&self, subteam_name: &str) -> bool {
        self.subteams.iter().any(|s| s.name == subteam_name)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(roles::ADMIN)
    }

    pub fn is_officer(&self) -> bool {
        self.has_role(roles::OFFICER)
    }

    pub fn is_lead(&self) -> bool {
        self.has_role(roles::LEAD)
    }

    pub fn is_special_advisor(&self) -> bool {
        self.has_role(roles::SPECIAL_ADVISOR)
    }

    /// Admin, officer, lead or special advisor
    pub fn is_inner_circle(&self) -> bool {
        self.is_admin() || self.is_officer() || self.is_lead() || self.is_special_advisor()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {} {} [{}]", self.id, self.first_name, self.last_name, self.email)
    }
}

/// OAuth token response, passed through to the caller unmodified.
///
/// Sentinel may omit any field, so all of them are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenBundle {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}
