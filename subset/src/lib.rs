//! Region algebra for the Rill dataflow IR.
//!
//! Edges of a dataflow state say *which* elements of a container they move.
//! This crate provides the value type for those index sets and the handful of
//! operations the rewrite rules need to reason about them.
//!
//! # Module Organization
//!
//! - [`subset`] - [`Subset`]/[`Dim`] and the algebra (`offset`, `covers`, `compose`)
//! - [`parse`] - `Display`/`FromStr` in `b:e[:s]` notation
//! - [`error`] - Error types and result handling

pub mod error;
pub mod parse;
pub mod subset;


pub use error::{DimensionMismatchSnafu, Error, Result};
pub use subset::{Bounds, Dim, Subset};
