//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, view and form calls into screen-level flows.
//! - Keep UI/CLI layers decoupled from storage details.

pub mod roster_service;
