//! # Markbook Models
//!
//! Domain models and DTOs for the Markbook API.
//!
//! Each module holds the entities, request/response DTOs, and filter
//! parameters for one feature area:
//!
//! - [`ids`]: Strongly-typed UUID newtypes for every entity
//! - [`users`]: User accounts and the system role enum
//! - [`auth`]: JWT claims and login DTOs
//! - [`students`]: Student profiles linked to user accounts
//! - [`subjects`]: Subject registry
//! - [`exams`]: Exams and the exam type taxonomy
//! - [`results`]: Results, grades, statuses, and the grade calculator
//! - [`academic_years`]: Academic year time-boxing
//! - [`semesters`]: Semesters within academic years

pub mod academic_years;
pub mod auth;
pub mod exams;
pub mod ids;
pub mod results;
pub mod semesters;
pub mod students;
pub mod subjects;
pub mod users;
