//! User data models and DTOs.
//!
//! Re-exports the shared user models from the `markbook-models` crate.

pub use markbook_models::users::*;
