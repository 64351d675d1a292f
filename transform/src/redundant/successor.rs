//! Forward elimination: a transient copied straight into its only consumer.
//!
//! ```text
//! P --> X --> Y      =>      P --> Y
//! ```
//!
//! Every producer of `X` writes into `Y` instead. The shapes are identical, so
//! only container names along each producer path change; regions stay put.

use rill_ir::{Program, StateId};
use snafu::{OptionExt, ResultExt};

use super::{CopyPair, DESTINATION, SOURCE, access_name, copy_template, describe_removal, region_on, reject, removable};
use crate::error::*;
use crate::{Candidate, PathTemplate, Removal, Transformation};

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeIntoSuccessor;

impl MergeIntoSuccessor {
    pub const NAME: &'static str = "MergeIntoSuccessor";
}

impl Transformation for MergeIntoSuccessor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn requires_strict(&self) -> bool {
        true
    }

    fn expressions(&self) -> Vec<PathTemplate> {
        vec![copy_template()]
    }

    fn can_be_applied(&self, program: &Program, state: StateId, candidate: &Candidate, strict: bool) -> bool {
        let Some(pair) = CopyPair::resolve(program, state, candidate) else {
            return reject(Self::NAME, candidate, "candidate does not resolve to two data nodes");
        };
        if pair.state.out_degree(pair.source) != 1 {
            return reject(Self::NAME, candidate, "source has more than one outgoing edge");
        }
        let Some(edge) = pair.connecting_edge() else {
            return reject(Self::NAME, candidate, "source does not feed destination");
        };
        if let Err(reason) = removable(program, pair.source_name, pair.source_desc, pair.destination_desc) {
            return reject(Self::NAME, candidate, reason);
        }
        if pair.source_desc.shape != pair.destination_desc.shape {
            return reject(Self::NAME, candidate, "shapes differ");
        }
        if strict && region_on(&edge.data, pair.source_name).size() != pair.source_desc.shape {
            return reject(Self::NAME, candidate, "copy does not cover the whole source");
        }
        true
    }

    fn apply(&self, program: &mut Program, state_id: StateId, candidate: &Candidate) -> Result<Removal> {
        let source = candidate.node(SOURCE)?;
        let destination = candidate.node(DESTINATION)?;
        let state = program.state_mut(state_id).context(StateNotFoundSnafu { state: state_id })?;
        let source_name = access_name(state, state_id, source)?;
        let destination_name = access_name(state, state_id, destination)?;

        let incoming = state.in_edges(source).to_vec();
        for &edge in &incoming {
            for hop in state.transfer_path(edge) {
                if let Some(e) = state.edge_mut(hop)
                    && e.data.names(&source_name)
                {
                    e.data.container.clone_from(&destination_name);
                }
            }
            let Some(producer) = state.edge(edge).map(|e| e.src) else { continue };
            state.redirect_edge(edge, producer, destination).context(IrSnafu)?;
        }
        state.remove_node(source);

        tracing::debug!(
            rule = Self::NAME,
            state = %state_id,
            removed = %source_name,
            into = %destination_name,
            rewired = incoming.len(),
            "merged into successor"
        );
        Ok(Removal { state: state_id, node: source, container: source_name })
    }

    fn describe(&self, program: &Program, state: StateId, candidate: &Candidate) -> String {
        describe_removal(program, state, candidate.get(SOURCE))
    }
}
