// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{auth_middleware, AuthenticatedPrincipal, Role},
    models::{
        CreateOrderRequest, LoginRequest, OrderLine, OrderStatus, RegisterRequest, SupplyOrder,
        TokenResponse, UpdateOrderStatusRequest, UserResponse,
    },
    state::AppState,
};

pub mod accounts;
pub mod health;
pub mod orders;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/register", post(accounts::register))
        .route("/auth/login", post(accounts::login))
        .route("/auth/session", get(users::get_session))
        .route("/users/me", get(users::get_current_user))
        .route("/admin/users", get(users::list_users))
        .route(
            "/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route("/orders/{order_id}", get(orders::get_order))
        .route(
            "/orders/{order_id}/status",
            put(orders::update_order_status),
        );

    let health_routes = Router::new()
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness));

    Router::new()
        .nest("/v1", v1_routes)
        .nest("/health", health_routes)
        .layer(from_fn_with_state(state.auth_gate(), auth_middleware))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the bearer scheme referenced by `security(("bearer" = []))`.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::register,
        accounts::login,
        users::get_session,
        users::get_current_user,
        users::list_users,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::update_order_status,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            UserResponse,
            users::UserMeResponse,
            users::SessionResponse,
            AuthenticatedPrincipal,
            Role,
            OrderLine,
            OrderStatus,
            SupplyOrder,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Accounts", description = "Registration and login"),
        (name = "Users", description = "Signed-in user and admin listing"),
        (name = "Orders", description = "Supply orders and their review"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
