//! Repository layer over remote store adapters.
//!
//! # Responsibility
//! - Turn validated drafts into store mutations.
//! - Keep the in-memory record list consistent with the store by full
//!   refetch after each mutation.
//!
//! # Invariants
//! - Write paths validate drafts before any store call.
//! - Store failures surface as `RepoError::Persistence` with prior state
//!   retained.

pub mod record_repo;
