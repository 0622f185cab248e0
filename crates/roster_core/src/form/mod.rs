//! Form state for creating and editing records.

pub mod controller;
