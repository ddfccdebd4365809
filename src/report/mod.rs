//! Report renderers.
//!
//! - [`terminal`]: colored, tabular summary of a report produced by `build`;
//!   respects `--verbose` / `--quiet`.

pub mod terminal;
