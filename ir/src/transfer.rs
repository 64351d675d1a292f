//! Region-annotated payload carried by every edge.

use std::fmt;

use rill_subset::Subset;
use snafu::ResultExt;

use crate::error::*;
use crate::{Container, Result};

/// What an edge moves: a region of a named container, and optionally the
/// matching region on the container at the other end of the edge.
///
/// When `other_subset` is absent and the two ends name different containers,
/// the other end is addressed from its origin with the extents of `subset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub container: String,
    pub subset: Subset,
    pub other_subset: Option<Subset>,
}

impl Transfer {
    pub fn new(container: impl Into<String>, subset: Subset) -> Self {
        Self { container: container.into(), subset, other_subset: None }
    }

    /// Parse `subset` from `b:e[:s]` notation.
    pub fn simple(container: impl Into<String>, subset: &str) -> Result<Self> {
        Ok(Self::new(container, subset.parse().context(RegionSnafu)?))
    }

    /// Whole-container transfer.
    pub fn full(name: impl Into<String>, container: &Container) -> Self {
        Self::new(name, Subset::full(&container.shape))
    }

    pub fn with_other(mut self, other: Subset) -> Self {
        self.other_subset = Some(other);
        self
    }

    /// Parse and attach the region on the other end.
    pub fn with_other_str(self, other: &str) -> Result<Self> {
        Ok(self.with_other(other.parse().context(RegionSnafu)?))
    }

    pub fn names(&self, container: &str) -> bool {
        self.container == container
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.container, self.subset)?;
        if let Some(other) = &self.other_subset {
            write!(f, " -> [{other}]")?;
        }
        Ok(())
    }
}
