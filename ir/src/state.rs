//! A single dataflow state: directed multigraph of nodes and transfer edges.
//!
//! # Storage
//!
//! Nodes and edges live in append-only slot vectors; removal empties the slot.
//! Per-node adjacency lists keep edge insertion order, so iteration over
//! `in_edges`/`out_edges` is deterministic.
//!
//! # Paths and trees
//!
//! Scope nodes (`MapEntry`/`MapExit`) forward data from `IN_<x>` to `OUT_<x>`.
//! A chain of edges joined this way is one logical data movement:
//!
//! ```text
//! A --(IN_A)--> map --(OUT_A)--> compute
//! ```
//!
//! [`State::transfer_path`] returns the whole chain containing an edge;
//! [`State::transfer_tree`] returns everything reachable forward from an edge,
//! including fan-out inside scopes.

use std::collections::{HashSet, VecDeque};

use rill_subset::Subset;
use snafu::{OptionExt, ensure};

use crate::error::*;
use crate::node::{Compute, Edge, EdgeId, Node, NodeId, Scope, in_port, out_port};
use crate::{Result, Transfer};

#[derive(Debug, Clone, Default)]
pub struct State {
    label: String,
    nodes: Vec<Option<Node>>,
    edges: Vec<Option<Edge>>,
    incoming: Vec<Vec<EdgeId>>,
    outgoing: Vec<Vec<EdgeId>>,
}

impl State {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), ..Self::default() }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    // =========================================================================
    // Construction
    // =========================================================================

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(node));
        self.incoming.push(Vec::new());
        self.outgoing.push(Vec::new());
        id
    }

    /// Data node naming `container`.
    pub fn add_access(&mut self, container: impl Into<String>) -> NodeId {
        self.add_node(Node::Access(container.into()))
    }

    pub fn add_compute(&mut self, label: impl Into<String>, inputs: &[&str], outputs: &[&str]) -> NodeId {
        self.add_node(Node::Compute(Compute {
            label: label.into(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
        }))
    }

    /// Entry/exit pair of a parallel map over `range`.
    pub fn add_map(&mut self, label: impl Into<String>, params: &[&str], range: Subset) -> (NodeId, NodeId) {
        let scope = Scope { label: label.into(), params: params.iter().map(|s| s.to_string()).collect(), range };
        let entry = self.add_node(Node::MapEntry(scope.clone()));
        let exit = self.add_node(Node::MapExit(scope));
        (entry, exit)
    }

    pub fn add_edge(
        &mut self,
        src: NodeId,
        src_port: Option<&str>,
        dst: NodeId,
        dst_port: Option<&str>,
        data: Transfer,
    ) -> Result<EdgeId> {
        ensure!(self.contains_node(src), NodeNotFoundSnafu { node: src });
        ensure!(self.contains_node(dst), NodeNotFoundSnafu { node: dst });
        Ok(self.insert_edge(Edge {
            src,
            src_port: src_port.map(str::to_string),
            dst,
            dst_port: dst_port.map(str::to_string),
            data,
        }))
    }

    /// Connect `path` with one edge per hop, threading through the scope nodes
    /// in between on generated `IN_<x>`/`OUT_<x>` ports.
    ///
    /// `<x>` is the destination port, else the source port, else the
    /// container name. Every hop carries a copy of `data`.
    pub fn add_transfer_path(
        &mut self,
        path: &[NodeId],
        src_port: Option<&str>,
        dst_port: Option<&str>,
        data: Transfer,
    ) -> Result<Vec<EdgeId>> {
        let name = dst_port.or(src_port).unwrap_or(data.container.as_str()).to_string();
        let hops = path.len().saturating_sub(1);
        let mut ids = Vec::with_capacity(hops);
        for (i, pair) in path.windows(2).enumerate() {
            let outer_src = if i == 0 { src_port.map(str::to_string) } else { Some(out_port(&name)) };
            let outer_dst = if i + 1 == hops { dst_port.map(str::to_string) } else { Some(in_port(&name)) };
            ensure!(self.contains_node(pair[0]), NodeNotFoundSnafu { node: pair[0] });
            ensure!(self.contains_node(pair[1]), NodeNotFoundSnafu { node: pair[1] });
            ids.push(self.insert_edge(Edge {
                src: pair[0],
                src_port: outer_src,
                dst: pair[1],
                dst_port: outer_dst,
                data: data.clone(),
            }));
        }
        Ok(ids)
    }

    fn insert_edge(&mut self, edge: Edge) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.outgoing[edge.src.index()].push(id);
        self.incoming[edge.dst.index()].push(id);
        self.edges.push(Some(edge));
        id
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    pub fn remove_edge(&mut self, edge: EdgeId) -> Option<Edge> {
        let removed = self.edges.get_mut(edge.index())?.take()?;
        self.outgoing[removed.src.index()].retain(|&e| e != edge);
        self.incoming[removed.dst.index()].retain(|&e| e != edge);
        Some(removed)
    }

    /// Remove a node together with any edge still attached to it.
    pub fn remove_node(&mut self, node: NodeId) -> Option<Node> {
        let removed = self.nodes.get_mut(node.index())?.take()?;
        let incident: Vec<EdgeId> =
            self.incoming[node.index()].iter().chain(&self.outgoing[node.index()]).copied().collect();
        tracing::trace!(state = %self.label, %node, dropped_edges = incident.len(), "node removed");
        for edge in incident {
            self.remove_edge(edge);
        }
        Some(removed)
    }

    /// Re-attach `edge` between `src` and `dst`, keeping ports and payload.
    ///
    /// The edge gets a fresh id, which is returned.
    pub fn redirect_edge(&mut self, edge: EdgeId, src: NodeId, dst: NodeId) -> Result<EdgeId> {
        ensure!(self.contains_node(src), NodeNotFoundSnafu { node: src });
        ensure!(self.contains_node(dst), NodeNotFoundSnafu { node: dst });
        let old = self.remove_edge(edge).context(EdgeNotFoundSnafu { edge })?;
        Ok(self.insert_edge(Edge { src, dst, ..old }))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.index())?.as_ref()
    }

    pub fn edge(&self, edge: EdgeId) -> Option<&Edge> {
        self.edges.get(edge.index())?.as_ref()
    }

    pub fn edge_mut(&mut self, edge: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(edge.index())?.as_mut()
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().filter_map(|(i, n)| Some((NodeId(i as u32), n.as_ref()?)))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().filter_map(|(i, e)| Some((EdgeId(i as u32), e.as_ref()?)))
    }

    /// Data nodes with the container they name.
    pub fn access_nodes(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.nodes().filter_map(|(id, node)| Some((id, node.container()?)))
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn in_edges(&self, node: NodeId) -> &[EdgeId] {
        if !self.contains_node(node) {
            return &[];
        }
        &self.incoming[node.index()]
    }

    pub fn out_edges(&self, node: NodeId) -> &[EdgeId] {
        if !self.contains_node(node) {
            return &[];
        }
        &self.outgoing[node.index()]
    }

    pub fn in_degree(&self, node: NodeId) -> usize {
        self.in_edges(node).len()
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_edges(node).len()
    }

    pub fn edges_between(&self, src: NodeId, dst: NodeId) -> Vec<EdgeId> {
        self.out_edges(src).iter().copied().filter(|&e| self.edge(e).is_some_and(|edge| edge.dst == dst)).collect()
    }

    /// Kahn ordering of the live nodes, `None` if the state has a cycle.
    pub fn topological_order(&self) -> Option<Vec<NodeId>> {
        let mut pending: Vec<usize> = self.incoming.iter().map(Vec::len).collect();
        let mut ready: VecDeque<NodeId> =
            self.nodes().filter(|(id, _)| pending[id.index()] == 0).map(|(id, _)| id).collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(node) = ready.pop_front() {
            order.push(node);
            for &edge in self.out_edges(node) {
                let Some(dst) = self.edge(edge).map(|e| e.dst) else { continue };
                pending[dst.index()] -= 1;
                if pending[dst.index()] == 0 {
                    ready.push_back(dst);
                }
            }
        }
        (order.len() == self.node_count()).then_some(order)
    }

    // =========================================================================
    // Paths and trees
    // =========================================================================

    /// Chain of edges carrying the same data as `edge`, from the true source
    /// to the true sink. Empty if `edge` does not exist.
    pub fn transfer_path(&self, edge: EdgeId) -> Vec<EdgeId> {
        let Some(first) = self.edge(edge) else { return Vec::new() };

        let mut path = VecDeque::from([edge]);
        let mut current = first;
        while let Some(prev) = self.upstream(current) {
            let Some(prev_edge) = self.edge(prev) else { break };
            if path.contains(&prev) {
                break;
            }
            path.push_front(prev);
            current = prev_edge;
        }

        current = first;
        while let Some(&next) = self.downstream(current).first() {
            let Some(next_edge) = self.edge(next) else { break };
            if path.contains(&next) {
                break;
            }
            path.push_back(next);
            current = next_edge;
        }

        path.into()
    }

    /// `edge` followed by every edge reachable forward from it through scope
    /// nodes, breadth first.
    pub fn transfer_tree(&self, edge: EdgeId) -> Vec<EdgeId> {
        if self.edge(edge).is_none() {
            return Vec::new();
        }
        let mut seen = HashSet::from([edge]);
        let mut tree = vec![edge];
        let mut queue = VecDeque::from([edge]);
        while let Some(id) = queue.pop_front() {
            let Some(current) = self.edge(id) else { continue };
            for child in self.downstream(current) {
                if seen.insert(child) {
                    tree.push(child);
                    queue.push_back(child);
                }
            }
        }
        tree
    }

    /// Edge feeding the scope port that `edge` leaves from.
    fn upstream(&self, edge: &Edge) -> Option<EdgeId> {
        if !self.node(edge.src)?.is_scope() {
            return None;
        }
        let name = edge.src_port.as_deref()?.strip_prefix("OUT_")?;
        let port = in_port(name);
        self.in_edges(edge.src)
            .iter()
            .copied()
            .find(|&e| self.edge(e).is_some_and(|e| e.dst_port.as_deref() == Some(port.as_str())))
    }

    /// Edges leaving the scope port that `edge` enters.
    fn downstream(&self, edge: &Edge) -> Vec<EdgeId> {
        let Some(port) = self
            .node(edge.dst)
            .filter(|node| node.is_scope())
            .and(edge.dst_port.as_deref())
            .and_then(|p| p.strip_prefix("IN_"))
            .map(out_port)
        else {
            return Vec::new();
        };
        self.out_edges(edge.dst)
            .iter()
            .copied()
            .filter(|&e| self.edge(e).is_some_and(|e| e.src_port.as_deref() == Some(port.as_str())))
            .collect()
    }
}
