use rill_subset::Subset;
use snafu::Snafu;

use crate::{EdgeId, NodeId, Shape, StateId};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A container with this name is already registered.
    #[snafu(display("container '{name}' is already registered"))]
    DuplicateContainer { name: String },

    /// Name does not resolve in the container registry.
    #[snafu(display("unknown container '{name}'"))]
    UnknownContainer { name: String },

    /// Node id does not resolve (never created or already removed).
    #[snafu(display("node {node} not found"))]
    NodeNotFound { node: NodeId },

    /// Edge id does not resolve (never created or already removed).
    #[snafu(display("edge {edge} not found"))]
    EdgeNotFound { edge: EdgeId },

    /// State id does not resolve.
    #[snafu(display("state {state} not found"))]
    StateNotFound { state: StateId },

    /// Edge endpoint refers to a node that is gone.
    #[snafu(display("{state}: edge {edge} has a dangling endpoint {node}"))]
    DanglingEdge { state: StateId, edge: EdgeId, node: NodeId },

    /// Region rank differs from the container rank.
    #[snafu(display("{state}: edge {edge} addresses '{container}' with {actual} dimensions, container has {expected}"))]
    RankMismatch { state: StateId, edge: EdgeId, container: String, expected: usize, actual: usize },

    /// Strided region with a zero or negative step.
    #[snafu(display("{state}: edge {edge} addresses '{container}' with step {step} in dimension {dim}"))]
    NonPositiveStep { state: StateId, edge: EdgeId, container: String, dim: usize, step: i64 },

    /// Region escapes the container bounds.
    #[snafu(display("{state}: edge {edge} region [{subset}] is out of bounds for '{container}' with shape {shape:?}"))]
    OutOfBounds { state: StateId, edge: EdgeId, container: String, subset: Subset, shape: Shape },

    /// Edge payload names a container that is not one of its data endpoints.
    #[snafu(display("{state}: edge {edge} names '{actual}' but its data endpoint is '{expected}'"))]
    ContainerMismatch { state: StateId, edge: EdgeId, expected: String, actual: String },

    /// A state must be a DAG.
    #[snafu(display("{state} contains a cycle"))]
    Cycle { state: StateId },

    /// Textual region failed to parse.
    #[snafu(display("invalid region: {source}"))]
    Region { source: rill_subset::Error },
}
