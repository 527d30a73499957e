// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing for the login path (bcrypt).

use crate::error::ServiceError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// bcrypt hasher with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plain: &str) -> Result<String, ServiceError> {
        bcrypt::hash(plain, self.cost)
            .map_err(|e| ServiceError::Internal(format!("password hashing failed: {e}")))
    }

    /// False for a wrong password and for an unreadable hash.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        bcrypt::verify(plain, hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

/// Reject passwords that are too short to store.
pub fn validate_password(plain: &str) -> Result<(), ServiceError> {
    if plain.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ServiceError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}
