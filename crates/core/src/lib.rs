//! Domain layer for the Atelier backend.
//!
//! Carries the error taxonomy, shared type aliases, and the design
//! validation rules. No I/O lives here.

pub mod design;
pub mod error;
pub mod types;
