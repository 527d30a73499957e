// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request interceptor for bearer-token authentication.
//!
//! Runs once per request before route dispatch. It never rejects a request:
//! when a token is missing, malformed, expired, or names an unknown user the
//! request continues unauthenticated, and the route's extractors
//! (`Auth`, `RequireRole`, ...) decide whether that is acceptable.
//!
//! ## Flow
//!
//! 1. No `Authorization: Bearer <token>` header → pass through
//! 2. Signature / format check of the token → on failure, log and pass through
//! 3. Principal already attached → leave it alone
//! 4. Identity lookup by the token subject → unknown user, log and pass through
//! 5. Token checked against the resolved record's email plus expiry → attach [`AuthenticatedPrincipal`] to the
//!    request extensions, or log and pass through

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};

use super::{AuthError, AuthenticatedPrincipal, IdentityStore, TokenService};

/// Literal scheme prefix, including the separating space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Collaborators the interceptor needs; cheap to clone.
#[derive(Clone)]
pub struct AuthGate {
    pub tokens: Arc<TokenService>,
    pub identities: Arc<dyn IdentityStore>,
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenService>, identities: Arc<dyn IdentityStore>) -> Self {
        Self { tokens, identities }
    }
}

/// Result of inspecting one request.
#[derive(Debug)]
pub enum AuthOutcome {
    /// No bearer token present.
    NoToken,
    /// A principal was attached before this run; nothing changed.
    AlreadyAuthenticated,
    /// Token verified and identity resolved.
    Authenticated(AuthenticatedPrincipal),
    /// Token present but refused; the request stays unauthenticated.
    Rejected(AuthError),
}

/// Raw token from an `Authorization: Bearer <token>` header.
///
/// Non-UTF-8 values and other schemes yield `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

impl AuthGate {
    /// Resolve the principal for a request with these headers.
    pub fn authenticate(&self, headers: &HeaderMap, already_authenticated: bool) -> AuthOutcome {
        self.authenticate_at(headers, already_authenticated, Utc::now())
    }

    /// [`authenticate`](Self::authenticate) evaluated at instant `now`.
    pub fn authenticate_at(
        &self,
        headers: &HeaderMap,
        already_authenticated: bool,
        now: DateTime<Utc>,
    ) -> AuthOutcome {
        let Some(token) = bearer_token(headers) else {
            return AuthOutcome::NoToken;
        };

        let subject = match self.tokens.extract_subject(token) {
            Ok(subject) => subject,
            Err(e) => return AuthOutcome::Rejected(e),
        };

        if already_authenticated {
            return AuthOutcome::AlreadyAuthenticated;
        }

        let Some(record) = self.identities.find_by_email(&subject) else {
            return AuthOutcome::Rejected(AuthError::IdentityNotFound(subject));
        };

        match self.tokens.check_at(token, &record.email, now) {
            Ok(claims) => AuthOutcome::Authenticated(AuthenticatedPrincipal::from_record(
                &record,
                Some(claims.exp),
            )),
            Err(e) => AuthOutcome::Rejected(e),
        }
    }
}

/// Axum middleware wrapping [`AuthGate::authenticate`].
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/v1/orders", get(list_orders))
///     .layer(axum::middleware::from_fn_with_state(gate, auth_middleware));
/// ```
pub async fn auth_middleware(
    State(gate): State<AuthGate>,
    mut request: Request,
    next: Next,
) -> Response {
    let already = request.extensions().get::<AuthenticatedPrincipal>().is_some();

    match gate.authenticate(request.headers(), already) {
        AuthOutcome::Authenticated(principal) => {
            tracing::debug!(
                user_id = %principal.user_id,
                role = %principal.role,
                "request authenticated"
            );
            request.extensions_mut().insert(principal);
        }
        AuthOutcome::Rejected(e) => {
            tracing::warn!(
                error_code = e.error_code(),
                error = %e,
                "bearer token refused; continuing unauthenticated"
            );
        }
        AuthOutcome::NoToken | AuthOutcome::AlreadyAuthenticated => {}
    }

    next.run(request).await
}
