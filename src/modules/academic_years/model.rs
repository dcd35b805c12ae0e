//! Academic year data models and DTOs.
//!
//! Re-exports the shared academic year models from the `markbook-models`
//! crate.

pub use markbook_models::academic_years::*;
