//! Academic year module.
//!
//! Owns the mutual-exclusion invariant: at most one academic year is
//! current at any time.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
