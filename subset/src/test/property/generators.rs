//! Generators for property-based testing.
//!
//! Regions are kept small so that composed bounds stay far from overflow.

use proptest::prelude::*;

use crate::{Dim, Subset};

/// Strided interval with a non-negative lower bound.
pub fn arb_dim() -> impl Strategy<Value = Dim> {
    (0i64..32, 0i64..16, 1i64..4).prop_map(|(begin, len, step)| Dim::new(begin, begin + len, step))
}

/// Range or point region with exactly `rank` dimensions.
pub fn arb_subset(rank: usize) -> impl Strategy<Value = Subset> {
    prop_oneof![
        proptest::collection::vec(arb_dim(), rank).prop_map(Subset::strided),
        proptest::collection::vec(0i64..32, rank).prop_map(Subset::indices),
    ]
}

/// Two regions sharing a random rank in `1..=4`.
pub fn arb_subset_pair() -> impl Strategy<Value = (Subset, Subset)> {
    (1usize..=4).prop_flat_map(|rank| (arb_subset(rank), arb_subset(rank)))
}
