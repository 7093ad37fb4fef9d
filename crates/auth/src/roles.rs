use serde::{Deserialize, Serialize};

use lotkeeper_core::DomainError;

/// Role of an authenticated user.
///
/// The role set is closed: the rule tables in the evaluator are written per
/// role, and an identifier outside this set is a configuration defect at the
/// session boundary — not a silently-denied (or worse, silently-allowed)
/// runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to every module, action and location.
    SuperAdmin,
    /// Multi-location role; acts on explicitly granted locations.
    Admin,
    /// Single-location role; acts only on the assigned location.
    SalesManager,
    /// Authenticated but unprivileged; no rule table grants anything.
    User,
}

impl Role {
    /// Parse a role identifier as supplied by the session collaborator.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "sales_manager" => Ok(Role::SalesManager),
            "user" => Ok(Role::User),
            other => Err(DomainError::configuration(format!("unknown role: {other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::SalesManager => "sales_manager",
            Role::User => "user",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
