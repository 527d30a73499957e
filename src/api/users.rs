// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::{AdminOnly, Auth, AuthenticatedPrincipal, OptionalAuth, Role},
    models::UserResponse,
    state::AppState,
};

/// Response for GET /v1/users/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// User's unique ID
    pub user_id: Uuid,
    /// Email address (login identifier)
    pub email: String,
    /// Display name
    pub display_name: String,
    /// User's role
    pub role: Role,
    /// Granted authorities
    pub authorities: Vec<String>,
}

impl From<AuthenticatedPrincipal> for UserMeResponse {
    fn from(principal: AuthenticatedPrincipal) -> Self {
        Self {
            user_id: principal.user_id,
            email: principal.email,
            display_name: principal.display_name,
            role: principal.role,
            authorities: principal.authorities.into_iter().collect(),
        }
    }
}

/// Response for GET /v1/auth/session
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Whether the request carried a valid bearer token
    pub authenticated: bool,
    /// The signed-in user, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserMeResponse>,
}

/// Report whether the caller is signed in. Never rejects.
#[utoipa::path(
    get,
    path = "/v1/auth/session",
    tag = "Users",
    responses(
        (status = 200, description = "Session state, anonymous or signed in", body = SessionResponse),
    )
)]
pub async fn get_session(OptionalAuth(principal): OptionalAuth) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: principal.is_some(),
        user: principal.map(UserMeResponse::from),
    })
}

/// Get the current authenticated user's information.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(principal): Auth) -> Json<UserMeResponse> {
    Json(principal.into())
}

/// List every registered user (admin only).
#[utoipa::path(
    get,
    path = "/v1/admin/users",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Caller is not an admin"),
    )
)]
pub async fn list_users(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Json<Vec<UserResponse>> {
    Json(state.users.list().iter().map(UserResponse::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn user_me_response_from_principal() {
        let principal = AuthenticatedPrincipal {
            user_id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            display_name: "Alice".to_string(),
            role: Role::Employee,
            authorities: BTreeSet::from(["ROLE_EMPLOYEE".to_string()]),
            token_expires_at: None,
        };

        let response: UserMeResponse = principal.clone().into();
        assert_eq!(response.user_id, principal.user_id);
        assert_eq!(response.email, "alice@example.com");
        assert_eq!(response.role, Role::Employee);
        assert_eq!(response.authorities, vec!["ROLE_EMPLOYEE".to_string()]);
    }

    #[tokio::test]
    async fn session_is_anonymous_without_principal() {
        let Json(session) = get_session(OptionalAuth(None)).await;
        assert!(!session.authenticated);
        assert!(session.user.is_none());
    }
}
