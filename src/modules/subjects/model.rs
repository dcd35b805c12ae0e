//! Subject data models and DTOs.
//!
//! Re-exports the shared subject models from the `markbook-models` crate.

pub use markbook_models::subjects::*;
