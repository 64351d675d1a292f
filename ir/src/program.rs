//! Whole-program view: the container registry plus every state.

use std::collections::BTreeMap;
use std::fmt;

use snafu::ensure;

use crate::error::*;
use crate::{Container, ElementType, NodeId, Result, Shape, State, StorageType};

/// Index of a state inside its [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) u32);

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Program {
    name: String,
    containers: BTreeMap<String, Container>,
    states: Vec<State>,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Container registry
    // =========================================================================

    pub fn add_container(&mut self, name: impl Into<String>, container: Container) -> Result<()> {
        let name = name.into();
        ensure!(!self.containers.contains_key(&name), DuplicateContainerSnafu { name });
        self.containers.insert(name, container);
        Ok(())
    }

    /// Register a non-transient array in default storage.
    pub fn add_array(&mut self, name: impl Into<String>, shape: impl Into<Shape>, element: ElementType) -> Result<()> {
        self.add_container(name, Container::builder().shape(shape).element(element).build())
    }

    /// Register a transient array.
    pub fn add_transient(
        &mut self,
        name: impl Into<String>,
        shape: impl Into<Shape>,
        element: ElementType,
        storage: StorageType,
    ) -> Result<()> {
        self.add_container(
            name,
            Container::builder().shape(shape).element(element).storage(storage).transient(true).build(),
        )
    }

    pub fn container(&self, name: &str) -> Option<&Container> {
        self.containers.get(name)
    }

    pub fn containers(&self) -> impl Iterator<Item = (&str, &Container)> {
        self.containers.iter().map(|(name, c)| (name.as_str(), c))
    }

    /// Descriptor named by a data node.
    pub fn container_of(&self, state: StateId, node: NodeId) -> Option<&Container> {
        self.container(self.state(state)?.node(node)?.container()?)
    }

    /// Drop a descriptor from the registry. Nodes naming it are left alone.
    pub fn remove_container(&mut self, name: &str) -> Option<Container> {
        self.containers.remove(name)
    }

    /// Drop every transient descriptor no data node names any more.
    ///
    /// Returns the removed names in registry order.
    pub fn prune_unused_containers(&mut self) -> Vec<String> {
        let unused: Vec<String> = self
            .containers
            .iter()
            .filter(|(name, c)| c.transient && self.occurrences(name) == 0)
            .map(|(name, _)| name.clone())
            .collect();
        for name in &unused {
            self.containers.remove(name);
        }
        tracing::debug!(program = %self.name, pruned = unused.len(), "pruned unused transients");
        unused
    }

    /// Number of data nodes, across all states, naming `container`.
    pub fn occurrences(&self, container: &str) -> usize {
        self.states.iter().flat_map(State::access_nodes).filter(|(_, name)| *name == container).count()
    }

    // =========================================================================
    // States
    // =========================================================================

    pub fn add_state(&mut self, label: impl Into<String>) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(State::new(label));
        id
    }

    pub fn state(&self, state: StateId) -> Option<&State> {
        self.states.get(state.index())
    }

    pub fn state_mut(&mut self, state: StateId) -> Option<&mut State> {
        self.states.get_mut(state.index())
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states.iter().enumerate().map(|(i, s)| (StateId(i as u32), s))
    }

    pub fn state_ids(&self) -> impl Iterator<Item = StateId> + use<> {
        (0..self.states.len() as u32).map(StateId)
    }
}
