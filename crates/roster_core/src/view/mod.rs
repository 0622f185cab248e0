//! Pure view transforms over the repository list.
//!
//! # Responsibility
//! - Filter and order records for display.
//! - Slice the ordered list into fixed-size pages.

pub mod filter;
pub mod pagination;
