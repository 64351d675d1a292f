//! Structural validation of a whole program.
//!
//! Rewrite rules do not check their own output; the driver calls [`validate`]
//! after applying them. Checks per state:
//!
//! - the state is acyclic and every edge endpoint resolves
//! - every data node and every edge payload names a registered container
//! - a region has the rank of the container it addresses, steps forward and
//!   stays in bounds
//! - an edge touching a single data node names that node's container
//! - an edge between two data nodes names one of them, and its
//!   `other_subset` fits the other one

use rill_subset::Subset;
use snafu::{OptionExt, ensure};

use crate::error::*;
use crate::{Container, EdgeId, Node, Program, Result, StateId};

pub fn validate(program: &Program) -> Result<()> {
    for (state_id, state) in program.states() {
        for (_, node) in state.nodes() {
            if let Node::Access(name) = node {
                program.container(name).context(UnknownContainerSnafu { name })?;
            }
        }

        for (edge_id, edge) in state.edges() {
            let src = state.node(edge.src).context(DanglingEdgeSnafu { state: state_id, edge: edge_id, node: edge.src })?;
            let dst = state.node(edge.dst).context(DanglingEdgeSnafu { state: state_id, edge: edge_id, node: edge.dst })?;

            let name = edge.data.container.as_str();
            let container = program.container(name).context(UnknownContainerSnafu { name })?;
            check_region(state_id, edge_id, name, container, &edge.data.subset)?;

            match (src.container(), dst.container()) {
                (Some(a), Some(b)) => {
                    ensure!(
                        name == a || name == b,
                        ContainerMismatchSnafu { state: state_id, edge: edge_id, expected: a, actual: name }
                    );
                    if let Some(other) = &edge.data.other_subset {
                        let other_name = if name == a { b } else { a };
                        let other_container =
                            program.container(other_name).context(UnknownContainerSnafu { name: other_name })?;
                        check_region(state_id, edge_id, other_name, other_container, other)?;
                    }
                }
                (Some(data), None) | (None, Some(data)) => {
                    ensure!(
                        name == data,
                        ContainerMismatchSnafu { state: state_id, edge: edge_id, expected: data, actual: name }
                    );
                }
                (None, None) => {}
            }
        }

        if state.topological_order().is_none() {
            return CycleSnafu { state: state_id }.fail();
        }
    }
    tracing::trace!(program = %program.name(), "program validated");
    Ok(())
}

fn check_region(state: StateId, edge: EdgeId, name: &str, container: &Container, subset: &Subset) -> Result<()> {
    ensure!(
        subset.dims() == container.rank(),
        RankMismatchSnafu { state, edge, container: name, expected: container.rank(), actual: subset.dims() }
    );
    if let Subset::Range(dims) = subset
        && let Some((dim, bad)) = dims.iter().enumerate().find(|(_, d)| d.step <= 0)
    {
        return NonPositiveStepSnafu { state, edge, container: name, dim, step: bad.step }.fail();
    }
    let in_bounds = subset.min_element().iter().all(|&lo| lo >= 0)
        && subset.max_element().iter().zip(&container.shape).all(|(&hi, &extent)| hi < extent);
    ensure!(
        in_bounds || subset.num_elements() == 0,
        OutOfBoundsSnafu { state, edge, container: name, subset: subset.clone(), shape: container.shape.clone() }
    );
    Ok(())
}
