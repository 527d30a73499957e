// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Supply Order Server - supply ordering backend with stateless bearer auth
//!
//! Every request passes through a fail-open interceptor that verifies an
//! HS256 JWT and, on success, attaches the signed-in user to the request.
//! Routes then decide whether a principal (or a role) is required.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Token issuing/verification, interceptor, extractors, roles
//! - `config` - Environment configuration
//! - `store` - In-memory user and order stores
//! - `telemetry` - Tracing subscriber setup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
pub mod telemetry;
