// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity lookup used by the request interceptor.

use crate::store::UserRecord;

/// Resolves a token subject (email) to a stored user.
///
/// Called synchronously once per authenticated request.
pub trait IdentityStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> Option<UserRecord>;
}
