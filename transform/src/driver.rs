//! Fixpoint driver: match, check, apply until no rule finds work.
//!
//! Each round scans states in order, rules in list order, and candidates in
//! match order, and applies the first candidate a rule accepts. Matching
//! restarts from scratch after every application because candidates do not
//! survive mutation.

use bon::bon;
use rill_ir::{Program, StateId, validate};
use snafu::{ResultExt, ensure};

use crate::error::*;
use crate::{Candidate, MergeIntoPredecessor, MergeIntoSuccessor, Removal, Transformation, find_matches};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Rewrite driver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Run rules that require strict mode, and pass `strict` to their checks.
    pub strict: bool,
    /// Validate after every application instead of once at the end.
    pub validate: bool,
    /// Upper bound on applications in one run.
    pub max_iterations: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { strict: true, validate: true, max_iterations: 10_000 }
    }
}

#[bon]
impl DriverConfig {
    /// Create a driver configuration with builder pattern.
    #[builder]
    pub fn new(
        #[builder(default = true)] strict: bool,
        #[builder(default = true)] validate: bool,
        #[builder(default = 10_000)] max_iterations: usize,
    ) -> Self {
        Self { strict, validate, max_iterations }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `RILL_STRICT` - `0`/`false` disables strict mode (default: on)
    /// * `RILL_VALIDATE` - `0`/`false` validates only once at the end (default: on)
    /// * `RILL_MAX_ITERATIONS` - Application limit (default: 10000)
    pub fn from_env() -> Self {
        let strict = parse_flag(std::env::var("RILL_STRICT").ok().as_deref(), true);
        let validate = parse_flag(std::env::var("RILL_VALIDATE").ok().as_deref(), true);
        let max_iterations =
            std::env::var("RILL_MAX_ITERATIONS").ok().and_then(|s| s.parse().ok()).unwrap_or(10_000);
        Self { strict, validate, max_iterations }
    }
}

pub(crate) fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(str::trim) {
        None | Some("") => default,
        Some(v) => !(v == "0" || v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("off")),
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// One successful rule application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub rule: &'static str,
    pub description: String,
    pub removal: Removal,
}

/// Everything a driver run changed, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    applications: Vec<Application>,
}

impl RewriteReport {
    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    /// Applications of the rule called `rule`.
    pub fn count(&self, rule: &str) -> usize {
        self.applications.iter().filter(|a| a.rule == rule).count()
    }

    /// Containers whose node was removed; their descriptors are still
    /// registered.
    pub fn removed_containers(&self) -> Vec<&str> {
        self.applications.iter().map(|a| a.removal.container.as_str()).collect()
    }
}

// ============================================================================
// DRIVER
// ============================================================================

/// The default rule list: forward elimination, then backward.
pub fn strict_transformations() -> Vec<Box<dyn Transformation>> {
    vec![Box::new(MergeIntoSuccessor), Box::new(MergeIntoPredecessor)]
}

/// Owned rule list plus configuration.
pub struct RewriteDriver {
    rules: Vec<Box<dyn Transformation>>,
    config: DriverConfig,
}

impl RewriteDriver {
    pub fn new(rules: Vec<Box<dyn Transformation>>, config: DriverConfig) -> Self {
        Self { rules, config }
    }

    /// [`strict_transformations`] with `config`.
    pub fn strict(config: DriverConfig) -> Self {
        Self::new(strict_transformations(), config)
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn run(&self, program: &mut Program) -> Result<RewriteReport> {
        apply_transformations(program, &self.rules, &self.config)
    }
}

/// Apply `rules` to `program` until none of them finds a candidate.
#[tracing::instrument(skip_all, fields(program = %program.name()))]
pub fn apply_transformations(
    program: &mut Program,
    rules: &[Box<dyn Transformation>],
    config: &DriverConfig,
) -> Result<RewriteReport> {
    let mut report = RewriteReport::default();

    while let Some((rule, state, candidate)) = next_application(program, rules, config) {
        ensure!(report.len() < config.max_iterations, IterationLimitSnafu { limit: config.max_iterations });

        let description = rule.describe(program, state, &candidate);
        let removal = rule.apply(program, state, &candidate)?;
        tracing::debug!(rule = rule.name(), %state, %description, "rule applied");

        if config.validate {
            validate(program).context(ValidationSnafu)?;
        }
        report.applications.push(Application { rule: rule.name(), description, removal });
    }

    validate(program).context(ValidationSnafu)?;
    tracing::debug!(applications = report.len(), "rewrite fixpoint reached");
    Ok(report)
}

fn next_application<'r>(
    program: &Program,
    rules: &'r [Box<dyn Transformation>],
    config: &DriverConfig,
) -> Option<(&'r dyn Transformation, StateId, Candidate)> {
    for (state_id, state) in program.states() {
        for rule in rules.iter().filter(|r| config.strict || !r.requires_strict()) {
            for template in rule.expressions() {
                for candidate in find_matches(state, &template) {
                    if rule.can_be_applied(program, state_id, &candidate, config.strict) {
                        return Some((rule.as_ref(), state_id, candidate));
                    }
                }
            }
        }
    }
    None
}
