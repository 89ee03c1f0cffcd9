//! Role Policy
//!
//! Maps an identity to exactly one of the two configured IAM roles.

use serde::Serialize;

use aam_config::IamConfig;

use crate::identity::entity::{roles, Identity};

/// Which of the two federated roles an identity receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleDecision {
    Admin,
    Member,
}

impl RoleDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleDecision::Admin => "admin",
            RoleDecision::Member => "member",
        }
    }
}

/// Decide the role for `identity`.
///
/// Any inner-circle role selects [`RoleDecision::Admin`]; everything else,
/// including an empty role list, selects [`RoleDecision::Member`].
pub fn decide_role(identity: &Identity) -> RoleDecision {
    if roles::INNER_CIRCLE.iter().any(|role| identity.has_role(role)) {
        RoleDecision::Admin
    } else {
        RoleDecision::Member
    }
}

/// The two role ARNs the gateway federates into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    admin_role_arn: String,
    member_role_arn: String,
}

impl RolePolicy {
    pub fn new(admin_role_arn: impl Into<String>, member_role_arn: impl Into<String>) -> Self {
        Self {
            admin_role_arn: admin_role_arn.into(),
            member_role_arn: member_role_arn.into(),
        }
    }

    pub fn from_config(config: &IamConfig) -> Self {
        Self::new(config.admin_role_arn.clone(), config.member_role_arn.clone())
    }

    pub fn role_arn(&self, decision: RoleDecision) -> &str {
        match decision {
            RoleDecision::Admin => &self.admin_role_arn,
            RoleDecision::Member => &self.member_role_arn,
        }
    }

    /// Decide and resolve the ARN in one step.
    pub fn role_arn_for(&self, identity: &Identity) -> (RoleDecision, &str) {
        let decision = decide_role(identity);
        (decision, self.role_arn(decision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::entity::fixtures::identity_with_roles;

    const ADMIN: &str = "arn:aws:iam::123456789012:role/SentinelAdmin";
    const MEMBER: &str = "arn:aws:iam::123456789012:role/SentinelMember";

    #[test]
    fn test_each_inner_circle_role_is_admin() {
        for role in ["d_admin", "d_officer", "d_lead", "d_special_advisor"] {
            assert_eq!(decide_role(&identity_with_roles(&[role])), RoleDecision::Admin, "{role}");
        }
    }

    #[test]
    fn test_inner_circle_mixed_with_other_roles() {
        let identity = identity_with_roles(&["d_member", "d_lead", "alumni"]);
        assert_eq!(decide_role(&identity), RoleDecision::Admin);
    }

    #[test]
    fn test_non_inner_circle_is_member() {
        assert_eq!(decide_role(&identity_with_roles(&["d_member"])), RoleDecision::Member);
        assert_eq!(decide_role(&identity_with_roles(&["admin", "D_ADMIN"])), RoleDecision::Member);
        assert_eq!(decide_role(&identity_with_roles(&[])), RoleDecision::Member);
    }

    #[test]
    fn test_subteams_do_not_grant_admin() {
        let mut identity = identity_with_roles(&[]);
        identity.subteams[0].name = "d_admin".to_string();
        assert_eq!(decide_role(&identity), RoleDecision::Member);
    }

    #[test]
    fn test_decision_is_deterministic() {
        let identity = identity_with_roles(&["d_officer"]);
        let first = decide_role(&identity);
        for _ in 0..10 {
            assert_eq!(decide_role(&identity), first);
        }
    }

    #[test]
    fn test_role_arn_resolution() {
        let policy = RolePolicy::new(ADMIN, MEMBER);
        assert_eq!(policy.role_arn(RoleDecision::Admin), ADMIN);
        assert_eq!(policy.role_arn(RoleDecision::Member), MEMBER);
        assert_eq!(policy.role_arn_for(&identity_with_roles(&["d_admin"])), (RoleDecision::Admin, ADMIN));
        assert_eq!(policy.role_arn_for(&identity_with_roles(&["d_member"])), (RoleDecision::Member, MEMBER));
    }

    #[test]
    fn test_from_config() {
        let config = IamConfig {
            admin_role_arn: ADMIN.to_string(),
            member_role_arn: MEMBER.to_string(),
            ..Default::default()
        };
        assert_eq!(RolePolicy::from_config(&config), RolePolicy::new(ADMIN, MEMBER));
    }
}
