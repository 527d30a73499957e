// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the authenticated principal.
//!
//! The interceptor in `middleware.rs` attaches an [`AuthenticatedPrincipal`]
//! to the request extensions when a bearer token verifies. These extractors
//! are where routes decide whether that is required:
//!
//! ```rust,ignore
//! async fn my_orders(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal.email, principal.role
//! }
//! ```

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, AuthenticatedPrincipal, Role};

/// Requires an authenticated principal; rejects with 401 otherwise.
pub struct Auth(pub AuthenticatedPrincipal);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedPrincipal>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Optional authentication extractor.
///
/// Yields `None` for anonymous requests instead of rejecting.
pub struct OptionalAuth(pub Option<AuthenticatedPrincipal>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(
            parts.extensions.get::<AuthenticatedPrincipal>().cloned(),
        ))
    }
}

/// Role constants for [`RequireRole`].
pub const ADMIN: u8 = 0;
pub const MANAGER: u8 = 1;
pub const EMPLOYEE: u8 = 2;

/// Extractor that requires at least role `R` (see [`Role::from_u8`]).
///
/// 401 when anonymous, 403 when the role is insufficient.
pub struct RequireRole<const R: u8>(pub AuthenticatedPrincipal);

impl<S, const R: u8> FromRequestParts<S> for RequireRole<R>
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Auth(principal) = Auth::from_request_parts(parts, state).await?;

        let required = Role::from_u8(R);
        if !principal.has_role(required) {
            tracing::debug!(
                user_id = %principal.user_id,
                role = %principal.role,
                required = %required,
                "role check failed"
            );
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(RequireRole(principal))
    }
}

/// Extractor that requires the admin role.
pub struct AdminOnly(pub AuthenticatedPrincipal);

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireRole(principal) = RequireRole::<ADMIN>::from_request_parts(parts, state).await?;
        Ok(AdminOnly(principal))
    }
}

/// Extractor that requires manager privileges (managers and admins).
pub struct ManagerOnly(pub AuthenticatedPrincipal);

impl<S> FromRequestParts<S> for ManagerOnly
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireRole(principal) =
            RequireRole::<MANAGER>::from_request_parts(parts, state).await?;
        Ok(ManagerOnly(principal))
    }
}
