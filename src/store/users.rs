// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User records keyed by normalized email.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::{IdentityStore, Role};
use crate::error::ServiceError;

/// A persisted user.
///
/// Only the login path reads `password_hash`; authentication derives an
/// [`AuthenticatedPrincipal`](crate::auth::AuthenticatedPrincipal) from the
/// other fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
    /// Grants beyond the role's own `ROLE_*` authority.
    pub authorities: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a user about to be stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
    pub authorities: Vec<String>,
}

/// Canonical form of an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Default)]
pub struct UserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new user. Emails are unique after normalization.
    pub fn create(&self, new_user: NewUser) -> Result<UserRecord, ServiceError> {
        let email = normalize_email(&new_user.email);
        if email.is_empty() {
            return Err(ServiceError::Validation("Email must not be empty".into()));
        }

        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users.contains_key(&email) {
            return Err(ServiceError::Conflict(format!(
                "A user with email {email} already exists"
            )));
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            email: email.clone(),
            display_name: new_user.display_name,
            password_hash: new_user.password_hash,
            role: new_user.role,
            authorities: new_user.authorities,
            created_at: Utc::now(),
        };
        users.insert(email, record.clone());
        Ok(record)
    }

    pub fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&normalize_email(email))
            .cloned()
    }

    /// All users, oldest first.
    pub fn list(&self) -> Vec<UserRecord> {
        let mut users: Vec<UserRecord> = self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)));
        users
    }

    pub fn len(&self) -> usize {
        self.users.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityStore for UserStore {
    fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        UserStore::find_by_email(self, email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            email: email.to_string(),
            display_name: "Test User".to_string(),
            password_hash: "hash".to_string(),
            role,
            authorities: Vec::new(),
        }
    }

    #[test]
    fn create_then_find_by_email() {
        let store = UserStore::new();
        let created = store.create(new_user("alice@example.com", Role::Employee)).unwrap();

        let found = store.find_by_email("alice@example.com").unwrap();
        assert_eq!(found, created);
    }

    #[test]
    fn emails_are_normalized() {
        let store = UserStore::new();
        let created = store.create(new_user("  Alice@Example.COM ", Role::Employee)).unwrap();
        assert_eq!(created.email, "alice@example.com");
        assert!(store.find_by_email("ALICE@example.com").is_some());
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let store = UserStore::new();
        store.create(new_user("alice@example.com", Role::Employee)).unwrap();
        let err = store
            .create(new_user("ALICE@example.com", Role::Admin))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_email_is_rejected() {
        let store = UserStore::new();
        let err = store.create(new_user("   ", Role::Employee)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_email_is_none() {
        let store = UserStore::new();
        assert!(store.find_by_email("ghost@example.com").is_none());
    }

    #[test]
    fn identity_store_lookup_uses_same_records() {
        let store = UserStore::new();
        store.create(new_user("bob@example.com", Role::Manager)).unwrap();
        let identity: &dyn IdentityStore = &store;
        assert_eq!(identity.find_by_email("bob@example.com").unwrap().role, Role::Manager);
    }
}
