//! Stateful dataflow graph IR for the Rill toolchain.
//!
//! A [`Program`] owns a registry of named [`Container`]s and a list of
//! [`State`]s. Each state is a directed multigraph whose data nodes name
//! containers and whose edges carry a [`Transfer`]: the region of a container
//! that the edge moves.
//!
//! # Module Organization
//!
//! - [`container`] - Container descriptors (shape, storage, kind, transient flag)
//! - [`transfer`] - Region-annotated edge payload
//! - [`node`] - Node/edge types and ids
//! - [`state`] - Per-state graph with path/tree traversal through scopes
//! - [`program`] - Whole-program registry and occurrence counting
//! - [`validate`] - Structural validation
//! - [`error`] - Error types and result handling

pub mod container;
pub mod error;
pub mod node;
pub mod program;
pub mod state;
pub mod transfer;
pub mod validate;


pub use container::{Container, ContainerKind, ElementType, Shape, StorageType};
pub use error::{Error, Result};
pub use node::{Compute, Edge, EdgeId, Node, NodeId, NodeKind, Scope, in_port, out_port};
pub use program::{Program, StateId};
pub use state::State;
pub use transfer::Transfer;
pub use validate::validate;

pub use rill_subset::{Dim, Subset};
