//! Middleware modules for request processing.
//!
//! - [`auth`]: JWT authentication extractor
//! - [`role`]: Role-based authorization middleware, extractors, and helpers
//!
//! # Authentication Flow
//!
//! 1. Client sends a request with an `Authorization: Bearer <token>` header
//! 2. The `AuthUser` extractor validates the JWT and exposes its claims
//! 3. Role middleware/extractors check the claims' role
//! 4. The handler executes if all checks pass

pub mod auth;
pub mod role;
