// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigurationError;

/// Authentication error type.
///
/// Only `Configuration` is a hard failure. Token and identity failures seen by
/// the request interceptor are logged and downgraded to "unauthenticated";
/// route guards turn a missing principal into `Unauthenticated` or
/// `InsufficientPermissions`.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Signing secret missing or too weak
    #[error("Authentication is misconfigured: {0}")]
    Configuration(#[from] ConfigurationError),
    /// Token subject must be non-empty
    #[error("Token subject must not be empty")]
    InvalidSubject,
    /// Token is malformed, unsigned or tampered with
    #[error("Token is invalid: {0}")]
    InvalidToken(String),
    /// Token expiry is in the past
    #[error("Token has expired")]
    TokenExpired,
    /// Token subject differs from the asserted identity
    #[error("Token subject does not match the asserted identity")]
    SubjectMismatch,
    /// No user record for the token subject
    #[error("No identity found for subject {0}")]
    IdentityNotFound(String),
    /// Route requires an authenticated principal
    #[error("Authentication is required")]
    Unauthenticated,
    /// Principal lacks the required role
    #[error("Insufficient permissions for this operation")]
    InsufficientPermissions,
    /// Internal error
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Configuration(_) => "configuration_error",
            AuthError::InvalidSubject => "invalid_subject",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::SubjectMismatch => "subject_mismatch",
            AuthError::IdentityNotFound(_) => "identity_not_found",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidToken(_)
            | AuthError::TokenExpired
            | AuthError::SubjectMismatch
            | AuthError::IdentityNotFound(_)
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::InvalidSubject => StatusCode::BAD_REQUEST,
            AuthError::Configuration(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal details stay in the logs.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "authentication failure");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = Json(AuthErrorBody {
            error: message,
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn unauthenticated_returns_401() {
        let response = AuthError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "unauthenticated");
    }

    #[tokio::test]
    async fn insufficient_permissions_returns_403() {
        let response = AuthError::InsufficientPermissions.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn configuration_error_hides_details() {
        let err: AuthError = ConfigurationError::SecretTooShort { actual: 3 }.into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["error_code"], "configuration_error");
    }

    #[test]
    fn token_failures_map_to_unauthorized() {
        for err in [
            AuthError::InvalidToken("bad".into()),
            AuthError::TokenExpired,
            AuthError::SubjectMismatch,
            AuthError::IdentityNotFound("x@example.com".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }
}
