// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supply orders.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::{CreateOrderRequest, OrderStatus, SupplyOrder};

#[derive(Default)]
pub struct OrderStore {
    orders: RwLock<HashMap<Uuid, SupplyOrder>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, SupplyOrder>> {
        self.orders.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, SupplyOrder>> {
        self.orders.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(
        &self,
        requester_email: &str,
        request: CreateOrderRequest,
    ) -> Result<SupplyOrder, ServiceError> {
        validate_order(&request)?;

        let now = Utc::now();
        let order = SupplyOrder {
            id: Uuid::new_v4(),
            requester_email: requester_email.to_string(),
            items: request.items,
            note: request.note.filter(|note| !note.trim().is_empty()),
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.write().insert(order.id, order.clone());
        Ok(order)
    }

    pub fn get(&self, id: Uuid) -> Result<SupplyOrder, ServiceError> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound("Order not found".into()))
    }

    /// Orders placed by `requester_email`, newest first.
    pub fn list_for(&self, requester_email: &str) -> Vec<SupplyOrder> {
        sorted(
            self.read()
                .values()
                .filter(|order| order.requester_email == requester_email)
                .cloned()
                .collect(),
        )
    }

    /// Every order, newest first.
    pub fn list_all(&self) -> Vec<SupplyOrder> {
        sorted(self.read().values().cloned().collect())
    }

    pub fn update_status(
        &self,
        id: Uuid,
        next: OrderStatus,
    ) -> Result<SupplyOrder, ServiceError> {
        let mut orders = self.write();
        let Some(order) = orders.get_mut(&id) else {
            return Err(ServiceError::NotFound("Order not found".into()));
        };

        if !order.status.can_transition_to(next) {
            return Err(ServiceError::Conflict(format!(
                "Cannot move order from {} to {next}",
                order.status
            )));
        }

        order.status = next;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}

fn validate_order(request: &CreateOrderRequest) -> Result<(), ServiceError> {
    if request.items.is_empty() {
        return Err(ServiceError::Validation(
            "An order needs at least one item".into(),
        ));
    }
    for line in &request.items {
        if line.sku.trim().is_empty() {
            return Err(ServiceError::Validation("Item sku must not be empty".into()));
        }
        if line.quantity == 0 {
            return Err(ServiceError::Validation(format!(
                "Quantity for {} must be at least 1",
                line.sku
            )));
        }
    }
    Ok(())
}

fn sorted(mut orders: Vec<SupplyOrder>) -> Vec<SupplyOrder> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
    orders
}
