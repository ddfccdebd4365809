//! Canned license guidance.
//!
//! - [`summary`]: ordered keyword table mapping a free-form license name to a
//!   short or long legal summary.
//! - [`compatibility`]: fixed decision table for pairwise compatibility verdicts.

pub mod compatibility;
pub mod summary;
