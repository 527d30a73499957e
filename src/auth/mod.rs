// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the supply ordering API.
//!
//! ## Auth Flow
//!
//! 1. Client logs in with email + password (`POST /v1/auth/login`)
//! 2. Server issues an HS256 JWT (`sub` = email, `iat`, `exp`)
//! 3. Client sends `Authorization: Bearer <token>` on later requests
//! 4. The interceptor (`middleware.rs`):
//!    - verifies the signature under the shared secret
//!    - resolves the subject through the [`IdentityStore`]
//!    - checks subject match and expiry
//!    - attaches an [`AuthenticatedPrincipal`] to the request
//! 5. Extractors (`Auth`, `RequireRole`, ...) enforce per-route rules
//!
//! ## Security
//!
//! - Signing secret must be at least 32 bytes; startup fails otherwise
//! - Token failures never abort a request at the interceptor; route guards
//!   return 401/403
//! - No server-side revocation: tokens live until `exp`

pub mod claims;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::{AuthenticatedPrincipal, TokenClaims};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, ManagerOnly, OptionalAuth, RequireRole};
pub use identity::IdentityStore;
pub use middleware::{auth_middleware, AuthGate, AuthOutcome};
pub use password::PasswordHasher;
pub use roles::Role;
pub use token::TokenService;
