//! Roles and authorization decisions.
//!
//! Stockflow has a fixed, closed set of roles. Admin and manager share full
//! access and may approve purchases of any amount; staff may only approve
//! purchases up to [`STAFF_APPROVAL_LIMIT`].
//!
//! Every decision is an exhaustive `match` over [`UserRole`], so adding a
//! role is a compile error until each decision gives it an answer.
//!
//! # Example
//!
//! ```ignore
//! use stockflow_core::permissions::{UserRole, can_approve, has_full_access};
//!
//! assert!(has_full_access(UserRole::Manager));
//! assert!(!can_approve(UserRole::Staff, 10_000_001.0));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest purchase amount a staff member may approve (inclusive).
pub const STAFF_APPROVAL_LIMIT: f64 = 10_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    #[default]
    Staff,
}

impl UserRole {
    pub const ALL: [UserRole; 3] = [UserRole::Admin, UserRole::Manager, UserRole::Staff];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Staff => "staff",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "manager" => Ok(UserRole::Manager),
            "staff" => Ok(UserRole::Staff),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Whether `role` may approve a purchase of `amount`.
pub fn can_approve(role: UserRole, amount: f64) -> bool {
    match role {
        UserRole::Admin | UserRole::Manager => true,
        UserRole::Staff => amount <= STAFF_APPROVAL_LIMIT,
    }
}

/// Whether `role` may access every menu of the application.
pub fn has_full_access(role: UserRole) -> bool {
    match role {
        UserRole::Admin | UserRole::Manager => true,
        UserRole::Staff => false,
    }
}
