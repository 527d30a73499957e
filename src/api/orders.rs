// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supply order endpoints.
//!
//! Everyone signed in may place and track their own orders; managers see
//! every order and move them through review.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    auth::{Auth, ManagerOnly, Role},
    error::{ApiError, ServiceError},
    models::{CreateOrderRequest, SupplyOrder, UpdateOrderStatusRequest},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/orders",
    request_body = CreateOrderRequest,
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 201, body = SupplyOrder),
        (status = 400, description = "No items or a zero quantity"),
        (status = 401, description = "Not signed in"),
    )
)]
pub async fn create_order(
    Auth(principal): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<SupplyOrder>), ApiError> {
    let order = state.orders.create(&principal.email, request)?;
    tracing::info!(order_id = %order.id, user_id = %principal.user_id, "order placed");
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/v1/orders",
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller's orders; every order for managers", body = [SupplyOrder]),
        (status = 401, description = "Not signed in"),
    )
)]
pub async fn list_orders(
    Auth(principal): Auth,
    State(state): State<AppState>,
) -> Json<Vec<SupplyOrder>> {
    if principal.has_role(Role::Manager) {
        Json(state.orders.list_all())
    } else {
        Json(state.orders.list_for(&principal.email))
    }
}

#[utoipa::path(
    get,
    path = "/v1/orders/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order identifier")),
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, body = SupplyOrder),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Order belongs to someone else"),
        (status = 404, description = "No such order"),
    )
)]
pub async fn get_order(
    Auth(principal): Auth,
    Path(order_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<SupplyOrder>, ApiError> {
    let order = state.orders.get(order_id)?;
    if order.requester_email != principal.email && !principal.has_role(Role::Manager) {
        return Err(ServiceError::AccessDenied("You may only view your own orders".into()).into());
    }
    Ok(Json(order))
}

#[utoipa::path(
    put,
    path = "/v1/orders/{order_id}/status",
    params(("order_id" = Uuid, Path, description = "Order identifier")),
    request_body = UpdateOrderStatusRequest,
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, body = SupplyOrder),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Caller is not a manager"),
        (status = 404, description = "No such order"),
        (status = 409, description = "Transition not allowed"),
    )
)]
pub async fn update_order_status(
    ManagerOnly(principal): ManagerOnly,
    Path(order_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<SupplyOrder>, ApiError> {
    let order = state.orders.update_status(order_id, request.status)?;
    tracing::info!(
        order_id = %order.id,
        status = %order.status,
        reviewer = %principal.user_id,
        "order status changed"
    );
    Ok(Json(order))
}
