//! Semester data models and DTOs.
//!
//! Re-exports the shared semester models from the `markbook-models` crate.

pub use markbook_models::semesters::*;
