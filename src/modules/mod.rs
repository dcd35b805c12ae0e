//! Feature modules.
//!
//! Each module follows the same structure:
//!
//! - `model.rs`: Data models, DTOs, database structs
//! - `service.rs`: Business logic
//! - `controller.rs`: HTTP handlers
//! - `router.rs`: Axum router configuration

pub mod academic_years;
pub mod auth;
pub mod exams;
pub mod results;
pub mod semesters;
pub mod students;
pub mod subjects;
pub mod users;
