// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login.
//!
//! Login is the only place that reads password hashes; it hands out bearer
//! tokens that the request interceptor verifies afterwards.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::{password::validate_password, Role},
    error::{ApiError, ServiceError},
    models::{LoginRequest, RegisterRequest, TokenResponse, UserResponse},
    state::AppState,
    store::{normalize_email, NewUser, UserRecord},
};

fn validate_email(email: &str) -> Result<(), ServiceError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ServiceError::Validation(format!(
            "{email:?} is not a valid email address"
        ))),
    }
}

/// Validate, hash, and store a new account with the given role.
pub async fn create_account(
    state: &AppState,
    request: RegisterRequest,
    role: Role,
) -> Result<UserRecord, ServiceError> {
    let email = normalize_email(&request.email);
    validate_email(&email)?;
    validate_password(&request.password)?;

    let display_name = request.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(ServiceError::Validation(
            "Display name must not be empty".into(),
        ));
    }
    if state.users.find_by_email(&email).is_some() {
        return Err(ServiceError::Conflict(format!(
            "A user with email {email} already exists"
        )));
    }

    let passwords = state.passwords;
    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || passwords.hash(&password))
        .await
        .map_err(|e| ServiceError::Internal(format!("hashing task failed: {e}")))??;

    let record = state.users.create(NewUser {
        email,
        display_name,
        password_hash,
        role,
        authorities: Vec::new(),
    })?;
    tracing::info!(user_id = %record.id, role = %record.role, "account created");
    Ok(record)
}

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterRequest,
    tag = "Accounts",
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid email, password, or name"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let record = create_account(&state, request, Role::Employee).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&record))))
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    tag = "Accounts",
    responses(
        (status = 200, description = "Bearer token issued", body = TokenResponse),
        (status = 401, description = "Invalid email or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Some(record) = state.users.find_by_email(&request.email) else {
        tracing::warn!("login failed: unknown email");
        return Err(ServiceError::InvalidCredentials.into());
    };

    let passwords = state.passwords;
    let password = request.password;
    let hash = record.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || passwords.verify(&password, &hash))
        .await
        .map_err(|e| ServiceError::Internal(format!("verification task failed: {e}")))?;

    if !valid {
        tracing::warn!(user_id = %record.id, "login failed: wrong password");
        return Err(ServiceError::InvalidCredentials.into());
    }

    let token = state
        .tokens
        .issue(&record.email)
        .map_err(|e| ServiceError::Internal(e.to_string()))?;

    tracing::info!(user_id = %record.id, "token issued");
    Ok(Json(TokenResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in_ms: state.tokens.ttl().num_milliseconds(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            display_name: "Test User".to_string(),
        }
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("a@b.c").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[tokio::test]
    async fn register_creates_employee() {
        let state = AppState::for_tests();
        let (status, Json(user)) = register(
            State(state.clone()),
            Json(register_request("Alice@Example.com", "long enough")),
        )
        .await
        .expect("registration succeeds");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, Role::Employee);

        let stored = state.users.find_by_email("alice@example.com").unwrap();
        assert_ne!(stored.password_hash, "long enough");
    }

    #[tokio::test]
    async fn register_duplicate_is_conflict() {
        let state = AppState::for_tests();
        create_account(&state, register_request("a@example.com", "long enough"), Role::Employee)
            .await
            .unwrap();

        let err = register(
            State(state),
            Json(register_request("A@example.com", "another password")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let state = AppState::for_tests();
        let err = register(State(state), Json(register_request("a@example.com", "short")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let state = AppState::for_tests();
        create_account(&state, register_request("alice@example.com", "long enough"), Role::Employee)
            .await
            .unwrap();

        let Json(response) = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "ALICE@example.com".into(),
                password: "long enough".into(),
            }),
        )
        .await
        .expect("login succeeds");

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in_ms, 3_600_000);
        assert!(state.tokens.verify(&response.token, "alice@example.com"));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let state = AppState::for_tests();
        create_account(&state, register_request("alice@example.com", "long enough"), Role::Employee)
            .await
            .unwrap();

        let wrong_password = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "alice@example.com".into(),
                password: "not the password".into(),
            }),
        )
        .await
        .unwrap_err();
        let unknown_user = login(
            State(state),
            Json(LoginRequest {
                email: "ghost@example.com".into(),
                password: "long enough".into(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.message, unknown_user.message);
    }
}
