//! Results module: the result lifecycle engine.
//!
//! Teachers draft per-student results (grade derived at write time), publish
//! a whole exam's drafts for review, and admins approve or reject the
//! pending batch. Reads are filtered by role: students see only their own
//! approved results, teachers their own non-draft results, admins every
//! non-draft result.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
