//! Path-template matching over a single state.
//!
//! A [`PathTemplate`] is an ordered list of [`RoleSpec`]s; consecutive roles
//! are joined by one directed edge. Matching seeds on every edge whose
//! endpoints satisfy the first two roles, then extends along out-edges for
//! each further role. There is no backtracking beyond that extension.
//!
//! ```rust
//! use rill_ir::{State, Transfer};
//! use rill_transform::{NodeClass, PathTemplate, Role, find_matches};
//!
//! const IN: Role = Role::new("in");
//! const OUT: Role = Role::new("out");
//!
//! let mut state = State::new("main");
//! let a = state.add_access("A");
//! let b = state.add_access("B");
//! state.add_edge(a, None, b, None, Transfer::simple("A", "0:4").unwrap()).unwrap();
//!
//! let copy = PathTemplate::node_path([(IN, NodeClass::Access), (OUT, NodeClass::Access)]);
//! let matches = find_matches(&state, &copy);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].get(OUT), Some(b));
//! ```

use std::collections::HashSet;
use std::fmt;

use rill_ir::{Node, NodeId, NodeKind, State};
use smallvec::SmallVec;
use snafu::OptionExt;

use crate::error::*;

/// Named position in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Role(&'static str);

impl Role {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Node-class constraint of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum NodeClass {
    Access,
    Compute,
    MapEntry,
    MapExit,
    Any,
}

impl NodeClass {
    pub fn matches(self, node: &Node) -> bool {
        match self {
            Self::Any => true,
            Self::Access => node.kind() == NodeKind::Access,
            Self::Compute => node.kind() == NodeKind::Compute,
            Self::MapEntry => node.kind() == NodeKind::MapEntry,
            Self::MapExit => node.kind() == NodeKind::MapExit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSpec {
    pub role: Role,
    pub class: NodeClass,
}

/// Chain of roles, each connected to the next by one edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    roles: SmallVec<[RoleSpec; 4]>,
}

impl PathTemplate {
    pub fn node_path(roles: impl IntoIterator<Item = (Role, NodeClass)>) -> Self {
        Self { roles: roles.into_iter().map(|(role, class)| RoleSpec { role, class }).collect() }
    }

    pub fn roles(&self) -> &[RoleSpec] {
        &self.roles
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, spec) in self.roles.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}:{}", spec.role, spec.class)?;
        }
        Ok(())
    }
}

/// Role-to-node binding produced by [`find_matches`].
///
/// Only meaningful until the state it came from is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    bindings: SmallVec<[(Role, NodeId); 4]>,
}

impl Candidate {
    pub fn new(bindings: impl IntoIterator<Item = (Role, NodeId)>) -> Self {
        Self { bindings: bindings.into_iter().collect() }
    }

    pub fn get(&self, role: Role) -> Option<NodeId> {
        self.bindings.iter().find(|(r, _)| *r == role).map(|&(_, node)| node)
    }

    /// Like [`Candidate::get`], as an error for use inside `apply`.
    pub fn node(&self, role: Role) -> Result<NodeId> {
        self.get(role).context(UnboundRoleSnafu { role })
    }

    pub fn bindings(&self) -> &[(Role, NodeId)] {
        &self.bindings
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (role, node)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{role}={node}")?;
        }
        Ok(())
    }
}

/// Every distinct binding of `template` in `state`, in edge order.
///
/// Parallel edges between the same nodes yield one candidate. A template with
/// a single role binds every node of that class.
pub fn find_matches(state: &State, template: &PathTemplate) -> Vec<Candidate> {
    let roles = template.roles();
    let mut matches = Vec::new();

    match roles {
        [] => {}
        [only] => {
            matches.extend(
                state.nodes().filter(|(_, node)| only.class.matches(node)).map(|(id, _)| Candidate::new([(only.role, id)])),
            );
        }
        [first, second, ..] => {
            let mut seen = HashSet::new();
            for (_, edge) in state.edges() {
                if !satisfies(state, edge.src, first) || !satisfies(state, edge.dst, second) {
                    continue;
                }
                let mut path: SmallVec<[NodeId; 4]> = SmallVec::from_slice(&[edge.src, edge.dst]);
                extend(state, roles, &mut path, &mut seen, &mut matches);
            }
        }
    }

    tracing::trace!(state = %state.label(), template = %template, matches = matches.len(), "template matched");
    matches
}

fn satisfies(state: &State, node: NodeId, spec: &RoleSpec) -> bool {
    state.node(node).is_some_and(|n| spec.class.matches(n))
}

fn extend(
    state: &State,
    roles: &[RoleSpec],
    path: &mut SmallVec<[NodeId; 4]>,
    seen: &mut HashSet<SmallVec<[NodeId; 4]>>,
    matches: &mut Vec<Candidate>,
) {
    let Some(next) = roles.get(path.len()) else {
        if seen.insert(path.clone()) {
            matches.push(Candidate::new(roles.iter().map(|spec| spec.role).zip(path.iter().copied())));
        }
        return;
    };
    let Some(&last) = path.last() else { return };
    for &edge in state.out_edges(last) {
        let Some(dst) = state.edge(edge).map(|e| e.dst) else { continue };
        if satisfies(state, dst, next) {
            path.push(dst);
            extend(state, roles, path, seen, matches);
            path.pop();
        }
    }
}
