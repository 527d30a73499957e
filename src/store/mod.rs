// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory persistence.
//!
//! - `users` - user records; also the identity store behind authentication
//! - `orders` - supply orders

pub mod orders;
pub mod users;

pub use orders::OrderStore;
pub use users::{normalize_email, NewUser, UserRecord, UserStore};
