//! Pattern-matching rewrite rules for the Rill dataflow IR.
//!
//! Rules implement [`Transformation`]: they publish path templates, decide
//! applicability for a matched [`Candidate`] without touching the program,
//! and splice the graph when applied. [`apply_transformations`] runs a rule
//! list to a fixpoint.
//!
//! ```rust
//! use rill_ir::{ElementType, Program, StorageType, Transfer};
//! use rill_transform::{DriverConfig, RewriteDriver};
//!
//! let mut program = Program::new("copy");
//! program.add_array("A", vec![4], ElementType::Float32).unwrap();
//! program.add_transient("T", vec![4], ElementType::Float32, StorageType::Default).unwrap();
//! program.add_array("B", vec![4], ElementType::Float32).unwrap();
//! let s = program.add_state("main");
//! let state = program.state_mut(s).unwrap();
//! let (a, t, b) = (state.add_access("A"), state.add_access("T"), state.add_access("B"));
//! state.add_edge(a, None, t, None, Transfer::simple("A", "0:4").unwrap()).unwrap();
//! state.add_edge(t, None, b, None, Transfer::simple("T", "0:4").unwrap()).unwrap();
//!
//! let report = RewriteDriver::strict(DriverConfig::default()).run(&mut program).unwrap();
//! assert_eq!(report.removed_containers(), vec!["T"]);
//! assert_eq!(program.state(s).unwrap().node_count(), 2);
//! ```
//!
//! # Module Organization
//!
//! - [`pattern`] - Roles, path templates and the matcher
//! - [`transformation`] - The rule contract
//! - [`redundant`] - Forward/backward redundant container elimination
//! - [`driver`] - Configuration, fixpoint loop and report
//! - [`error`] - Error types and result handling

pub mod driver;
pub mod error;
pub mod pattern;
pub mod redundant;
pub mod transformation;


pub use driver::{
    Application, DriverConfig, RewriteDriver, RewriteReport, apply_transformations, strict_transformations,
};
pub use error::{Error, Result};
pub use pattern::{Candidate, NodeClass, PathTemplate, Role, RoleSpec, find_matches};
pub use redundant::{DESTINATION, MergeIntoPredecessor, MergeIntoSuccessor, SOURCE};
pub use transformation::{Removal, RuleScope, Transformation};
