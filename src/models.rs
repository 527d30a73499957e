// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! ## Model Categories
//!
//! - **Accounts**: registration, login, and the token response
//! - **Users**: public user views (never including password hashes)
//! - **Supply Orders**: order lines, orders, and status transitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::Role;
use crate::store::UserRecord;

// =============================================================================
// Account Models
// =============================================================================

/// Request to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Email address, used as the login identifier.
    pub email: String,
    /// Plain-text password (hashed before storage).
    pub password: String,
    /// Name shown to approvers.
    pub display_name: String,
}

/// Request to exchange credentials for a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed JWT to send as `Authorization: Bearer <token>`.
    pub token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Token lifetime in milliseconds.
    pub expires_in_ms: i64,
}

// =============================================================================
// User Models
// =============================================================================

/// Public view of a stored user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for UserResponse {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.clone(),
            display_name: record.display_name.clone(),
            role: record.role,
            created_at: record.created_at,
        }
    }
}

// =============================================================================
// Supply Order Models
// =============================================================================

/// Lifecycle of a supply order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
    Fulfilled,
}

impl OrderStatus {
    /// Whether a manager may move an order from `self` to `next`.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Approved)
                | (OrderStatus::Pending, OrderStatus::Rejected)
                | (OrderStatus::Approved, OrderStatus::Fulfilled)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
            OrderStatus::Fulfilled => "fulfilled",
        };
        f.write_str(name)
    }
}

/// One requested item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct OrderLine {
    /// Catalogue stock-keeping unit, e.g. `PAPER-A4-500`.
    pub sku: String,
    /// Requested quantity (at least 1).
    pub quantity: u32,
}

/// A supply order placed by a user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SupplyOrder {
    pub id: Uuid,
    /// Email of the user who placed the order.
    pub requester_email: String,
    pub items: Vec<OrderLine>,
    /// Free-form note for the approver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to place a supply order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Request to move an order to a new status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
