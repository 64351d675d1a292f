use rill_ir::{NodeId, StateId};
use snafu::Snafu;

use crate::Role;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Graph mutation failed.
    #[snafu(display("graph operation failed: {source}"))]
    Ir { source: rill_ir::Error },

    /// Region algebra failed while re-deriving an edge region.
    #[snafu(display("cannot re-derive region: {source}"))]
    Region { source: rill_subset::Error },

    /// The program no longer validates after a rewrite.
    #[snafu(display("rewritten program is invalid: {source}"))]
    Validation { source: rill_ir::Error },

    /// Rewriting kept finding work past the configured limit.
    #[snafu(display("no fixpoint after {limit} rule applications"))]
    IterationLimit { limit: usize },

    /// Candidate lacks a binding the rule needs.
    #[snafu(display("candidate has no binding for role '{role}'"))]
    UnboundRole { role: Role },

    #[snafu(display("state {state} not found"))]
    StateNotFound { state: StateId },

    /// Bound node is gone or is not a data node.
    #[snafu(display("{state}: {node} is not a data node"))]
    NotAccess { state: StateId, node: NodeId },

    /// Bound nodes are no longer joined by an edge.
    #[snafu(display("{state}: no edge from {from} to {to}"))]
    NotConnected { state: StateId, from: NodeId, to: NodeId },
}
