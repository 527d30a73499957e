// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Hierarchy
///
/// - `Admin` - Full access, including user administration
/// - `Manager` - Reviews and approves supply orders for everyone
/// - `Employee` - Places and tracks their own supply orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Order approver
    Manager,
    /// Regular requester
    Employee,
}

impl Role {
    /// Numeric rank used for hierarchy comparisons.
    fn rank(self) -> u8 {
        match self {
            Role::Admin => 2,
            Role::Manager => 1,
            Role::Employee => 0,
        }
    }

    /// Check if this role has at least the privileges of the required role.
    pub fn has_privilege(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Granted-authority name for this role, e.g. `ROLE_MANAGER`.
    pub fn authority(&self) -> String {
        format!("ROLE_{}", self.to_string().to_uppercase())
    }

    /// Decode a role from the `u8` used by const-generic guards.
    pub const fn from_u8(value: u8) -> Role {
        match value {
            1 => Role::Manager,
            2 => Role::Employee,
            // Unknown values fall back to the most restrictive requirement.
            _ => Role::Admin,
        }
    }
}

impl Default for Role {
    /// Default role is Employee (least privilege for registered users).
    fn default() -> Self {
        Role::Employee
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Manager => write!(f, "manager"),
            Role::Employee => write!(f, "employee"),
        }
    }
}
