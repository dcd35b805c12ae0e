//! Exam data models and DTOs.
//!
//! Re-exports the shared exam models from the `markbook-models` crate.

pub use markbook_models::exams::*;
