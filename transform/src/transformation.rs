//! Contract between rewrite rules and the driver.

use rill_ir::{NodeId, Program, StateId};

use crate::{Candidate, PathTemplate, Result};

/// How much of the program a rule looks at when matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
pub enum RuleScope {
    /// Matches inside one state; the rest of the program is read only for
    /// whole-program facts such as container occurrences.
    #[default]
    SingleState,
}

/// Node spliced out by a successful `apply`.
///
/// The container descriptor stays registered; see
/// [`Program::prune_unused_containers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub state: StateId,
    pub node: NodeId,
    pub container: String,
}

/// A pattern-matching rewrite rule.
///
/// `can_be_applied` is read-only and answers `false` for anything it cannot
/// prove, including candidates whose nodes no longer exist. `apply` must only
/// be called right after a positive `can_be_applied` on the same candidate.
pub trait Transformation: Send + Sync {
    fn name(&self) -> &'static str;

    /// Only run when the driver is in strict mode.
    fn requires_strict(&self) -> bool {
        false
    }

    fn scope(&self) -> RuleScope {
        RuleScope::SingleState
    }

    /// Templates whose matches are offered to `can_be_applied`.
    fn expressions(&self) -> Vec<PathTemplate>;

    fn can_be_applied(&self, program: &Program, state: StateId, candidate: &Candidate, strict: bool) -> bool;

    fn apply(&self, program: &mut Program, state: StateId, candidate: &Candidate) -> Result<Removal>;

    /// One-line summary for logs and reports.
    fn describe(&self, program: &Program, state: StateId, candidate: &Candidate) -> String;
}
