//! Redundant container elimination.
//!
//! A transient container that only exists to be copied into (or out of) one
//! neighbouring container adds a hop and a buffer without changing what the
//! program computes. The two rules here splice such a node out:
//!
//! - [`MergeIntoSuccessor`] - producers write straight into the consumer
//! - [`MergeIntoPredecessor`] - consumers read straight from the producer,
//!   with their regions re-derived into the producer's frame
//!
//! Both match the same template: two data nodes joined by an edge, bound to
//! [`SOURCE`] and [`DESTINATION`].

mod predecessor;
mod successor;

pub use predecessor::MergeIntoPredecessor;
pub use successor::MergeIntoSuccessor;

use rill_ir::{Container, Edge, NodeId, Program, State, StateId, Subset, Transfer};
use snafu::{OptionExt, ResultExt};

use crate::error::*;
use crate::{Candidate, NodeClass, PathTemplate, Role};

pub const SOURCE: Role = Role::new("source");
pub const DESTINATION: Role = Role::new("destination");

pub(crate) fn copy_template() -> PathTemplate {
    PathTemplate::node_path([(SOURCE, NodeClass::Access), (DESTINATION, NodeClass::Access)])
}

/// Both ends of a candidate copy, resolved against the program.
pub(crate) struct CopyPair<'a> {
    pub state: &'a State,
    pub source: NodeId,
    pub destination: NodeId,
    pub source_name: &'a str,
    pub destination_name: &'a str,
    pub source_desc: &'a Container,
    pub destination_desc: &'a Container,
}

impl<'a> CopyPair<'a> {
    pub fn resolve(program: &'a Program, state: StateId, candidate: &Candidate) -> Option<Self> {
        let graph = program.state(state)?;
        let source = candidate.get(SOURCE)?;
        let destination = candidate.get(DESTINATION)?;
        if source == destination {
            return None;
        }
        let source_name = graph.node(source)?.container()?;
        let destination_name = graph.node(destination)?.container()?;
        Some(Self {
            state: graph,
            source,
            destination,
            source_name,
            destination_name,
            source_desc: program.container(source_name)?,
            destination_desc: program.container(destination_name)?,
        })
    }

    /// First edge from source to destination.
    pub fn connecting_edge(&self) -> Option<&'a Edge> {
        let id = *self.state.edges_between(self.source, self.destination).first()?;
        self.state.edge(id)
    }
}

/// Checks both rules make on the container about to disappear.
pub(crate) fn removable(
    program: &Program,
    name: &str,
    removed: &Container,
    kept: &Container,
) -> std::result::Result<(), &'static str> {
    if !removed.transient {
        return Err("container is not transient");
    }
    if !removed.is_interchangeable_with(kept) {
        return Err("storage or container kind differs");
    }
    if program.occurrences(name) > 1 {
        return Err("container is referenced elsewhere");
    }
    Ok(())
}

pub(crate) fn reject(rule: &str, candidate: &Candidate, reason: &str) -> bool {
    tracing::trace!(rule, %candidate, reason, "candidate rejected");
    false
}

/// Region an edge addresses on `container`.
///
/// The side the payload does not name is `other_subset`, or the named region
/// moved to the origin.
pub(crate) fn region_on(data: &Transfer, container: &str) -> Subset {
    if data.names(container) {
        data.subset.clone()
    } else {
        data.other_subset.clone().unwrap_or_else(|| data.subset.at_origin())
    }
}

/// Container named by a data node, owned so the state can be mutated after.
pub(crate) fn access_name(state: &State, state_id: StateId, node: NodeId) -> Result<String> {
    state.node(node).and_then(|n| n.container()).map(str::to_string).context(NotAccessSnafu { state: state_id, node })
}

/// Move `region` from the `out` frame into the `inp` frame.
pub(crate) fn reindex(inp: &Subset, out: &Subset, region: &Subset) -> Result<Subset> {
    let relative = region.offset(out, true).context(RegionSnafu)?;
    inp.compose(&relative).context(RegionSnafu)
}

pub(crate) fn describe_removal(program: &Program, state: StateId, node: Option<NodeId>) -> String {
    match node.and_then(|n| program.state(state)?.node(n)) {
        Some(node) => format!("Remove {node}"),
        None => "Remove <unbound>".to_string(),
    }
}
