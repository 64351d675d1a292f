use rill_ir::{ElementType, Program, StateId, Transfer, validate};
use test_case::test_case;

use crate::test::helpers::*;
use crate::{
    DriverConfig, MergeIntoPredecessor, MergeIntoSuccessor, Transformation, apply_transformations,
    strict_transformations,
};

/// `A[6]` slice `2:5` copied into all of transient `C[3]`, then `read`
/// from `C` into `D[3]`.
fn shifted_copy(read: Transfer) -> (Program, StateId) {
    let mut p = Program::new("shifted");
    p.add_array("A", vec![6], ElementType::Float32).unwrap();
    p.add_container("C", transient(vec![3])).unwrap();
    p.add_array("D", vec![3], ElementType::Float32).unwrap();
    let s = p.add_state("main");
    let g = p.state_mut(s).unwrap();
    let (a, c, d) = (g.add_access("A"), g.add_access("C"), g.add_access("D"));
    g.add_edge(a, None, c, None, copy("A", "2:5", "0:3")).unwrap();
    g.add_edge(c, None, d, None, read).unwrap();
    (p, s)
}

fn apply(p: &mut Program, s: StateId, source: &str, destination: &str) {
    let candidate = pair(p, s, source, destination);
    assert!(MergeIntoPredecessor.can_be_applied(p, s, &candidate, true));
    MergeIntoPredecessor.apply(p, s, &candidate).unwrap();
}

/// Payload of the only edge between two data nodes.
fn payload(p: &Program, s: StateId, source: &str, destination: &str) -> Transfer {
    let g = p.state(s).unwrap();
    let edges = g.edges_between(access(p, s, source), access(p, s, destination));
    assert_eq!(edges.len(), 1);
    g.edge(edges[0]).unwrap().data.clone()
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_scenario_c_composes_offsets() {
    let (mut p, s) = scenario_c();
    let before = p.clone();
    let candidate = pair(&p, s, "A", "C");
    assert!(MergeIntoPredecessor.can_be_applied(&p, s, &candidate, true));
    assert_eq!(MergeIntoPredecessor.describe(&p, s, &candidate), "Remove C");

    let removal = MergeIntoPredecessor.apply(&mut p, s, &candidate).unwrap();
    assert_eq!(removal.container, "C");
    assert_eq!(data_nodes(&p, s), ["A", "D"]);

    let g = p.state(s).unwrap();
    let reads = g.out_edges(access(&p, s, "A"));
    assert_eq!(reads.len(), 1);
    assert_eq!(g.edge(reads[0]).unwrap().data, t("A", "2:5, 1:4"));

    validate(&p).unwrap();
    assert_same_outputs(&before, &p, &["D"]);
}

#[test]
fn test_scenario_b_uncovered_read_blocks_removal() {
    let (p, s) = scenario_b();
    assert!(!MergeIntoPredecessor.can_be_applied(&p, s, &pair(&p, s, "A", "C"), true));
    assert!(!MergeIntoSuccessor.can_be_applied(&p, s, &pair(&p, s, "A", "C"), true));
    assert_eq!(p.state(s).unwrap().node_count(), 4);
}

#[test]
fn test_full_copy_skips_coverage_proof() {
    let mut p = Program::new("full");
    p.add_array("A", vec![4], ElementType::Float32).unwrap();
    p.add_container("C", transient(vec![4])).unwrap();
    p.add_array("D", vec![2], ElementType::Float32).unwrap();
    p.add_array("E", vec![2], ElementType::Float32).unwrap();
    let s = p.add_state("main");
    let g = p.state_mut(s).unwrap();
    let (a, c) = (g.add_access("A"), g.add_access("C"));
    let (f1, f2) = (g.add_compute("copy", &["_inp"], &["_out"]), g.add_compute("copy", &["_inp"], &["_out"]));
    let (d, e) = (g.add_access("D"), g.add_access("E"));
    g.add_edge(a, None, c, None, t("A", "0:4")).unwrap();
    g.add_edge(c, None, f1, Some("_inp"), t("C", "0:2")).unwrap();
    g.add_edge(c, None, f2, Some("_inp"), t("C", "2:4")).unwrap();
    g.add_edge(f1, Some("_out"), d, None, t("D", "0:2")).unwrap();
    g.add_edge(f2, Some("_out"), e, None, t("E", "0:2")).unwrap();
    let before = p.clone();

    apply(&mut p, s, "A", "C");

    let g = p.state(s).unwrap();
    let reads: Vec<Transfer> = g.out_edges(a).iter().map(|&id| g.edge(id).unwrap().data.clone()).collect();
    assert_eq!(reads, vec![t("A", "0:2"), t("A", "2:4")]);
    validate(&p).unwrap();
    assert_same_outputs(&before, &p, &["D", "E"]);
}

// =========================================================================
// Region re-derivation
// =========================================================================

#[test_case(t("D", "0:3"), copy("D", "0:3", "2:5"); "implicit_region_materialized")]
#[test_case(copy("D", "0:2", "1:3"), copy("D", "0:2", "3:5"); "other_region_moved")]
#[test_case(copy("C", "1:3", "0:2"), copy("A", "3:5", "0:2"); "named_region_moved")]
fn test_copy_out_of_destination(read: Transfer, expected: Transfer) {
    let (mut p, s) = shifted_copy(read);
    let before = p.clone();
    apply(&mut p, s, "A", "C");
    assert_eq!(payload(&p, s, "A", "D"), expected);
    validate(&p).unwrap();
    assert_same_outputs(&before, &p, &["D"]);
}

#[test]
fn test_origin_anchored_implicit_region_left_alone() {
    let mut p = Program::new("anchored");
    p.add_array("A", vec![3], ElementType::Float32).unwrap();
    p.add_container("C", transient(vec![3])).unwrap();
    p.add_array("D", vec![2], ElementType::Float32).unwrap();
    let s = p.add_state("main");
    let g = p.state_mut(s).unwrap();
    let (a, c, d) = (g.add_access("A"), g.add_access("C"), g.add_access("D"));
    g.add_edge(a, None, c, None, t("A", "0:3")).unwrap();
    g.add_edge(c, None, d, None, t("D", "0:2")).unwrap();

    apply(&mut p, s, "A", "C");
    assert_eq!(payload(&p, s, "A", "D"), t("D", "0:2"));
}

#[test]
fn test_point_producer_offsets_reads() {
    let mut p = Program::new("point");
    p.add_array("A", vec![5, 5], ElementType::Float32).unwrap();
    p.add_container("C", transient(vec![1, 1])).unwrap();
    p.add_array("D", vec![1, 1], ElementType::Float32).unwrap();
    let s = p.add_state("main");
    let g = p.state_mut(s).unwrap();
    let (a, c) = (g.add_access("A"), g.add_access("C"));
    let f = g.add_compute("copy", &["_inp"], &["_out"]);
    let d = g.add_access("D");
    g.add_edge(a, None, c, None, copy("A", "2, 3", "0, 0")).unwrap();
    g.add_edge(c, None, f, Some("_inp"), t("C", "0:1, 0:1")).unwrap();
    g.add_edge(f, Some("_out"), d, None, t("D", "0:1, 0:1")).unwrap();
    let before = p.clone();

    apply(&mut p, s, "A", "C");

    let g = p.state(s).unwrap();
    assert_eq!(g.edge(g.in_edges(f)[0]).unwrap().data, t("A", "2:3, 3:4"));
    validate(&p).unwrap();
    assert_same_outputs(&before, &p, &["D"]);
}

#[test]
fn test_renames_whole_read_tree_through_scope() {
    let mut p = Program::new("scoped");
    p.add_array("A", vec![6], ElementType::Float32).unwrap();
    p.add_container("C", transient(vec![4])).unwrap();
    let s = p.add_state("main");
    let g = p.state_mut(s).unwrap();
    let (a, c) = (g.add_access("A"), g.add_access("C"));
    let (entry, _exit) = g.add_map("m", &["i"], "0:2".parse().unwrap());
    let f = g.add_compute("sink", &["_inp"], &[]);
    g.add_edge(a, None, c, None, copy("A", "2:6", "0:4")).unwrap();
    let path = g.add_transfer_path(&[c, entry, f], None, Some("_inp"), t("C", "0:4")).unwrap();
    g.edge_mut(path[1]).unwrap().data = t("C", "1:3");

    apply(&mut p, s, "A", "C");

    let g = p.state(s).unwrap();
    assert_eq!(g.edge(path[1]).unwrap().data, t("A", "3:5"));
    let outer = g.edges_between(a, entry);
    assert_eq!(outer.len(), 1);
    let outer = g.edge(outer[0]).unwrap();
    assert_eq!(outer.data, t("A", "2:6"));
    assert_eq!(outer.dst_port.as_deref(), Some("IN__inp"));
    validate(&p).unwrap();
}

// =========================================================================
// Rejections
// =========================================================================

#[test]
fn test_rejects_occurrence_in_other_state() {
    let (mut p, s) = scenario_c();
    let other = p.add_state("later");
    p.state_mut(other).unwrap().add_access("C");
    assert!(!MergeIntoPredecessor.can_be_applied(&p, s, &pair(&p, s, "A", "C"), true));
}

#[test]
fn test_rejects_second_producer() {
    let (mut p, s) = scenario_c();
    p.add_array("Z", vec![6, 6], ElementType::Float32).unwrap();
    let c = access(&p, s, "C");
    let g = p.state_mut(s).unwrap();
    let z = g.add_access("Z");
    g.add_edge(z, None, c, None, t("Z", "0:1, 0:1")).unwrap();
    assert!(!MergeIntoPredecessor.can_be_applied(&p, s, &pair(&p, s, "A", "C"), true));
}

#[test]
fn test_rejects_storage_mismatch() {
    let (p, s) = scenario_a();
    assert!(!MergeIntoPredecessor.can_be_applied(&p, s, &pair(&p, s, "A", "B"), true));
}

#[test]
fn test_rank_mismatch_in_coverage_is_rejected() {
    let mut p = Program::new("malformed");
    p.add_array("A", vec![4], ElementType::Float32).unwrap();
    p.add_container("C", transient(vec![4])).unwrap();
    let s = p.add_state("main");
    let g = p.state_mut(s).unwrap();
    let (a, c) = (g.add_access("A"), g.add_access("C"));
    let f = g.add_compute("sink", &["_inp"], &[]);
    g.add_edge(a, None, c, None, t("A", "0:2")).unwrap();
    g.add_edge(c, None, f, Some("_inp"), t("C", "0:1, 0:1")).unwrap();
    assert!(!MergeIntoPredecessor.can_be_applied(&p, s, &pair(&p, s, "A", "C"), true));
}

#[test]
fn test_rejects_reshaping_copy() {
    let mut p = Program::new("reshape");
    p.add_array("A", vec![4], ElementType::Float32).unwrap();
    p.add_container("C", transient(vec![2, 2])).unwrap();
    let s = p.add_state("main");
    let g = p.state_mut(s).unwrap();
    let (a, c) = (g.add_access("A"), g.add_access("C"));
    let f = g.add_compute("sink", &["_inp"], &[]);
    g.add_edge(a, None, c, None, copy("A", "0:4", "0:2, 0:2")).unwrap();
    g.add_edge(c, None, f, Some("_inp"), t("C", "0:2, 0:2")).unwrap();
    validate(&p).unwrap();

    assert!(!MergeIntoPredecessor.can_be_applied(&p, s, &pair(&p, s, "A", "C"), true));
    let report = apply_transformations(&mut p, &strict_transformations(), &DriverConfig::default()).unwrap();
    assert!(report.is_empty());
    assert_eq!(p.state(s).unwrap().node_count(), 3);
}

#[test]
fn test_candidate_is_stale_after_apply() {
    let (mut p, s) = scenario_c();
    let candidate = pair(&p, s, "A", "C");
    MergeIntoPredecessor.apply(&mut p, s, &candidate).unwrap();
    assert!(!MergeIntoPredecessor.can_be_applied(&p, s, &candidate, true));
}
