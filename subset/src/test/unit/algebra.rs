use test_case::test_case;

use crate::{Dim, Error, Subset};

fn region(s: &str) -> Subset {
    s.parse().expect("test region should parse")
}

// =========================================================================
// Sizes
// =========================================================================

#[test_case("0:3, 0:3", 9; "full_3x3")]
#[test_case("1:5, 1:5", 16; "inner_4x4")]
#[test_case("0:8:2", 4; "strided_even")]
#[test_case("0:7:2", 4; "strided_odd_tail")]
#[test_case("4:4", 0; "empty")]
#[test_case("2, 3", 1; "point")]
fn test_num_elements(s: &str, expected: i64) {
    assert_eq!(region(s).num_elements(), expected);
}

#[test]
fn test_size_per_dimension() {
    assert_eq!(region("0:3, 3:6").size().as_slice(), &[3, 3]);
    assert_eq!(region("1, 2, 3").size().as_slice(), &[1, 1, 1]);
    assert_eq!(region("0:10:3, 2:4").size().as_slice(), &[4, 2]);
}

#[test]
fn test_bounds() {
    let r = region("1:5, 0:9:4");
    assert_eq!(r.min_element().as_slice(), &[1, 0]);
    assert_eq!(r.max_element().as_slice(), &[4, 8]);
}

#[test]
fn test_full() {
    assert_eq!(Subset::full(&[3, 6]), region("0:3, 0:6"));
}

// =========================================================================
// Offset
// =========================================================================

#[test]
fn test_offset_negative_strips_reference_origin() {
    let r = region("3:6, 2:5").offset(&region("2:6, 2:6"), true).unwrap();
    assert_eq!(r, region("1:4, 0:3"));
}

#[test]
fn test_offset_positive_indices() {
    let r = region("1, 1").offset(&region("2:6, 3:6"), false).unwrap();
    assert_eq!(r, Subset::indices([3, 4]));
}

#[test]
fn test_offset_dimension_mismatch() {
    let err = region("0:3").offset(&region("0:3, 0:3"), true).unwrap_err();
    assert_eq!(err, Error::DimensionMismatch { expected: 1, actual: 2 });
}

#[test]
fn test_at_origin() {
    assert_eq!(region("2:6, 2:6").at_origin(), region("0:4, 0:4"));
    assert_eq!(region("4:10:2").at_origin(), Subset::strided([Dim::new(0, 6, 2)]));
    assert_eq!(Subset::indices([7, 1]).at_origin(), Subset::indices([0, 0]));
}

// =========================================================================
// Covers
// =========================================================================

#[test_case("2:6, 2:6", "3:6, 2:5", true; "inner_slice")]
#[test_case("0:3, 0:3", "0:3, 3:6", false; "disjoint_half")]
#[test_case("0:3, 0:3", "0:3, 0:3", true; "equal")]
#[test_case("0:3, 0:3", "1, 2", true; "point_inside")]
#[test_case("0:3, 0:3", "1, 3", false; "point_outside")]
#[test_case("1:4", "0:2", false; "lower_bound_escapes")]
fn test_covers(outer: &str, inner: &str, expected: bool) {
    assert_eq!(region(outer).covers(&region(inner)).unwrap(), expected);
}

#[test]
fn test_covers_dimension_mismatch() {
    assert!(matches!(region("0:3").covers(&region("0:3, 0:3")), Err(Error::DimensionMismatch { .. })));
}

// =========================================================================
// Compose
// =========================================================================

#[test]
fn test_compose_range_in_range() {
    let composed = region("1:5, 1:5").compose(&region("1:4, 0:3")).unwrap();
    assert_eq!(composed, region("2:5, 1:4"));
}

#[test]
fn test_compose_point_in_range() {
    let composed = region("1:5, 10:20:2").compose(&Subset::indices([2, 3])).unwrap();
    assert_eq!(composed, Subset::indices([3, 16]));
}

#[test]
fn test_compose_point_frame_is_offset() {
    let composed = Subset::indices([4, 4]).compose(&Subset::indices([1, 0])).unwrap();
    assert_eq!(composed, Subset::indices([5, 4]));
}

#[test]
fn test_compose_strides_multiply() {
    let composed = region("0:20:2").compose(&region("1:7:3")).unwrap();
    assert_eq!(composed, Subset::strided([Dim::new(2, 14, 6)]));
    assert_eq!(composed.num_elements(), 2);
}

/// Producer `[a, a+b)` copied to `[c, c+b)`; a read at `c+d` lands on `a+d`.
#[test_case(0, 4, 0, 0; "aligned")]
#[test_case(1, 4, 2, 0; "first")]
#[test_case(1, 4, 2, 3; "last")]
#[test_case(7, 5, 3, 2; "middle")]
fn test_read_through_copy(a: i64, b: i64, c: i64, d: i64) {
    let producer = Subset::range([(a, a + b)]);
    let copied_to = Subset::range([(c, c + b)]);
    let read = Subset::indices([c + d]);

    let relative = read.offset(&copied_to, true).unwrap();
    assert_eq!(producer.compose(&relative).unwrap(), Subset::indices([a + d]));
}

#[test]
fn test_compose_range_in_point_frame() {
    let composed = Subset::indices([2, 3]).compose(&region("0:1, 0:2")).unwrap();
    assert_eq!(composed, region("2:3, 3:5"));
}
