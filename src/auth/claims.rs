// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the request-scoped authenticated principal.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::roles::Role;
use crate::store::UserRecord;

/// Claims carried by every token this service issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user's email address
    pub sub: String,

    /// Issued at
    #[serde(with = "numeric_date")]
    pub iat: DateTime<Utc>,

    /// Expiration
    #[serde(with = "numeric_date")]
    pub exp: DateTime<Utc>,
}

impl TokenClaims {
    /// A token is expired once its expiry lies strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp < now
    }
}

/// JWT NumericDate with millisecond precision.
///
/// Written as fractional seconds since the epoch; integer values from other
/// issuers are accepted on read.
mod numeric_date {
    use chrono::{DateTime, Utc};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.timestamp_millis() as f64 / 1000.0)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = f64::deserialize(deserializer)?;
        if !seconds.is_finite() {
            return Err(D::Error::custom("NumericDate must be finite"));
        }
        let millis = (seconds * 1000.0).round() as i64;
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| D::Error::custom("NumericDate out of range"))
    }
}

/// Authenticated user attached to a single request.
///
/// Built from a [`UserRecord`] after the bearer token verified; never
/// persisted and never carries password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedPrincipal {
    /// Stable user identifier
    pub user_id: Uuid,

    /// Email address (token subject)
    pub email: String,

    /// Display name
    pub display_name: String,

    /// User's role
    pub role: Role,

    /// Granted authorities (`ROLE_*` plus any extra grants)
    pub authorities: BTreeSet<String>,

    /// Token expiration (used for logging, not serialized)
    #[serde(skip)]
    pub token_expires_at: Option<DateTime<Utc>>,
}

impl AuthenticatedPrincipal {
    /// Derive the principal from its persisted record.
    pub fn from_record(record: &UserRecord, token_expires_at: Option<DateTime<Utc>>) -> Self {
        let mut authorities: BTreeSet<String> = record.authorities.iter().cloned().collect();
        authorities.insert(record.role.authority());

        Self {
            user_id: record.id,
            email: record.email.clone(),
            display_name: record.display_name.clone(),
            role: record.role,
            authorities,
            token_expires_at,
        }
    }

    /// Check if the principal has the required role.
    pub fn has_role(&self, required: Role) -> bool {
        self.role.has_privilege(required)
    }

    /// Check if the principal holds a named authority.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}
