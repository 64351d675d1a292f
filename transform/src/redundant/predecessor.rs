//! Backward elimination: a transient filled from one producer and then only
//! read.
//!
//! ```text
//! A[1:5, 1:5] -> [2:6, 2:6]          A[2:5, 1:4]
//!       |                                 |
//!       C  --C[3:6, 2:5]--> f     =>      f
//! ```
//!
//! With `inp` the producer-side and `out` the destination-side region of the
//! copy, a read of the destination at `r` becomes a read of the producer at
//! `compose(inp, offset(r, out, negative))`.

use rill_ir::{Node, Program, StateId, Transfer};
use snafu::{OptionExt, ResultExt};

use super::{
    CopyPair, DESTINATION, SOURCE, access_name, copy_template, describe_removal, region_on, reindex, reject, removable,
};
use crate::error::*;
use crate::{Candidate, PathTemplate, Removal, Transformation};

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeIntoPredecessor;

impl MergeIntoPredecessor {
    pub const NAME: &'static str = "MergeIntoPredecessor";
}

impl Transformation for MergeIntoPredecessor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn requires_strict(&self) -> bool {
        true
    }

    fn expressions(&self) -> Vec<PathTemplate> {
        vec![copy_template()]
    }

    fn can_be_applied(&self, program: &Program, state: StateId, candidate: &Candidate, _strict: bool) -> bool {
        let Some(pair) = CopyPair::resolve(program, state, candidate) else {
            return reject(Self::NAME, candidate, "candidate does not resolve to two data nodes");
        };
        if pair.state.in_degree(pair.destination) != 1 {
            return reject(Self::NAME, candidate, "destination has more than one incoming edge");
        }
        let Some(edge) = pair.connecting_edge() else {
            return reject(Self::NAME, candidate, "source does not feed destination");
        };
        if let Err(reason) = removable(program, pair.destination_name, pair.destination_desc, pair.source_desc) {
            return reject(Self::NAME, candidate, reason);
        }

        let inp = region_on(&edge.data, pair.source_name);
        let out = region_on(&edge.data, pair.destination_name);
        if inp.dims() != out.dims() {
            return reject(Self::NAME, candidate, "producer and destination regions differ in rank");
        }
        if inp.num_elements() == pair.destination_desc.total_size() {
            return true;
        }

        for &id in pair.state.out_edges(pair.destination) {
            let Some(read) = pair.state.edge(id) else { continue };
            match out.covers(&region_on(&read.data, pair.destination_name)) {
                Ok(true) => {}
                Ok(false) => return reject(Self::NAME, candidate, "a read escapes the copied region"),
                Err(error) => {
                    tracing::warn!(rule = Self::NAME, %candidate, edge = %id, %error, "malformed region in coverage check");
                    return false;
                }
            }
        }
        true
    }

    fn apply(&self, program: &mut Program, state_id: StateId, candidate: &Candidate) -> Result<Removal> {
        let source = candidate.node(SOURCE)?;
        let destination = candidate.node(DESTINATION)?;
        let state = program.state_mut(state_id).context(StateNotFoundSnafu { state: state_id })?;
        let source_name = access_name(state, state_id, source)?;
        let destination_name = access_name(state, state_id, destination)?;

        let copy = state
            .edges_between(source, destination)
            .first()
            .and_then(|&e| state.edge(e))
            .map(|e| e.data.clone())
            .context(NotConnectedSnafu { state: state_id, from: source, to: destination })?;
        let inp = region_on(&copy, &source_name);
        let out = region_on(&copy, &destination_name);

        let reads = state.out_edges(destination).to_vec();
        for &read in &reads {
            for hop in state.transfer_tree(read) {
                let Some(edge) = state.edge(hop) else { continue };
                let data = &edge.data;
                let rewritten = if data.names(&destination_name) {
                    Some(Transfer {
                        container: source_name.clone(),
                        subset: reindex(&inp, &out, &data.subset)?,
                        other_subset: data.other_subset.clone(),
                    })
                } else if let Some(other) = &data.other_subset {
                    Some(Transfer { other_subset: Some(reindex(&inp, &out, other)?), ..data.clone() })
                } else if hop == read && matches!(state.node(edge.dst), Some(Node::Access(_))) {
                    // Implicit origin-anchored region on the destination side.
                    let implicit = data.subset.at_origin();
                    let moved = reindex(&inp, &out, &implicit)?;
                    (moved != implicit).then(|| data.clone().with_other(moved))
                } else {
                    None
                };
                if let Some(data) = rewritten
                    && let Some(edge) = state.edge_mut(hop)
                {
                    edge.data = data;
                }
            }
            let Some(consumer) = state.edge(read).map(|e| e.dst) else { continue };
            state.redirect_edge(read, source, consumer).context(IrSnafu)?;
        }
        state.remove_node(destination);

        tracing::debug!(
            rule = Self::NAME,
            state = %state_id,
            removed = %destination_name,
            into = %source_name,
            rewired = reads.len(),
            "merged into predecessor"
        );
        Ok(Removal { state: state_id, node: destination, container: destination_name })
    }

    fn describe(&self, program: &Program, state: StateId, candidate: &Candidate) -> String {
        describe_removal(program, state, candidate.get(DESTINATION))
    }
}
