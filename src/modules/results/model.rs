//! Result data models and DTOs.
//!
//! Re-exports the shared result models from the `markbook-models` crate,
//! including the grade calculator and status taxonomy.

pub use markbook_models::results::*;
