//! Domain model for the user roster.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own the draft validation rules shared by the form and the repository.
//!
//! # Invariants
//! - Every record is identified by a store-assigned, stable `RecordId`.
//! - Optional contact fields are `None`, never empty strings.

pub mod document;
pub mod record;
