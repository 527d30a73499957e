// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{AuthGate, PasswordHasher, TokenService};
use crate::store::{OrderStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub users: Arc<UserStore>,
    pub orders: Arc<OrderStore>,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(tokens: TokenService, users: UserStore) -> Self {
        Self {
            tokens: Arc::new(tokens),
            users: Arc::new(users),
            orders: Arc::new(OrderStore::new()),
            passwords: PasswordHasher::default(),
        }
    }

    /// Override the bcrypt work factor.
    pub fn with_password_hasher(mut self, passwords: PasswordHasher) -> Self {
        self.passwords = passwords;
        self
    }

    /// Interceptor state sharing this app's token service and user store.
    pub fn auth_gate(&self) -> AuthGate {
        AuthGate::new(self.tokens.clone(), self.users.clone())
    }
}

#[cfg(test)]
impl AppState {
    /// State with a fixed secret and the cheapest bcrypt cost.
    pub(crate) fn for_tests() -> Self {
        let tokens = TokenService::new(
            b"app-state-test-secret-0123456789abcdef",
            std::time::Duration::from_secs(3600),
        )
        .expect("test secret is long enough");
        Self::new(tokens, UserStore::new()).with_password_hasher(PasswordHasher::new(4))
    }
}
