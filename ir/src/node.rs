//! Nodes and edges of a dataflow state.

use std::fmt;

use rill_subset::Subset;

use crate::Transfer;

/// Slot index of a node inside its [`State`](crate::State).
///
/// Slots are never reused, so an id of a removed node stays unresolvable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

/// Slot index of an edge inside its [`State`](crate::State).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Opaque computation. The core only looks at its ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compute {
    pub label: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Parametric scope (a parallel map). Entry and exit are separate nodes that
/// forward data between paired `IN_<x>`/`OUT_<x>` ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub label: String,
    pub params: Vec<String>,
    pub range: Subset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Reference to a registered container.
    Access(String),
    Compute(Compute),
    MapEntry(Scope),
    MapExit(Scope),
}

/// Discriminant of [`Node`], used by pattern templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum NodeKind {
    Access,
    Compute,
    MapEntry,
    MapExit,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Access(_) => NodeKind::Access,
            Self::Compute(_) => NodeKind::Compute,
            Self::MapEntry(_) => NodeKind::MapEntry,
            Self::MapExit(_) => NodeKind::MapExit,
        }
    }

    /// Container name for data nodes.
    pub fn container(&self) -> Option<&str> {
        match self {
            Self::Access(name) => Some(name),
            _ => None,
        }
    }

    /// Scope nodes forward data without renaming it.
    pub fn is_scope(&self) -> bool {
        matches!(self, Self::MapEntry(_) | Self::MapExit(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access(name) => f.write_str(name),
            Self::Compute(compute) => f.write_str(&compute.label),
            Self::MapEntry(scope) => write!(f, "{}[{}]", scope.label, scope.range),
            Self::MapExit(scope) => write!(f, "{}.exit", scope.label),
        }
    }
}

/// Directed edge with optional ports on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub src: NodeId,
    pub src_port: Option<String>,
    pub dst: NodeId,
    pub dst_port: Option<String>,
    pub data: Transfer,
}

/// Port on a scope node that receives data named `name`.
pub fn in_port(name: &str) -> String {
    format!("IN_{name}")
}

/// Port on a scope node that emits data received on `IN_<name>`.
pub fn out_port(name: &str) -> String {
    format!("OUT_{name}")
}
