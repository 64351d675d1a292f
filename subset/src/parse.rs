//! Textual form of regions: `"1:5, 1:5"`, `"0:8:2"`, `"2, 3"`.
//!
//! A dimension is either a single coordinate `i`, a unit-stride interval `b:e`
//! or a strided interval `b:e:s`. A region whose every dimension is a single
//! coordinate parses as [`Subset::Indices`]; otherwise single coordinates are
//! widened to one-element intervals.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;
use snafu::{ResultExt, ensure};

use crate::error::*;
use crate::subset::{Dim, Subset};

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            1 => write!(f, "{}:{}", self.begin, self.end),
            step => write!(f, "{}:{}:{}", self.begin, self.end, step),
        }
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subset::Indices(coords) => {
                for (i, c) in coords.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{c}")?;
                }
            }
            Subset::Range(dims) => {
                for (i, d) in dims.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{d}")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Subset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ensure!(!s.trim().is_empty(), EmptyRegionSnafu);

        let mut dims: SmallVec<[Dim; 4]> = SmallVec::new();
        let mut all_points = true;
        for token in s.split(',').map(str::trim) {
            let parts = token.split(':').map(|part| parse_bound(part.trim())).collect::<Result<SmallVec<[i64; 3]>>>()?;
            let dim = match parts.as_slice() {
                [index] => Dim::point(*index),
                [begin, end] => {
                    all_points = false;
                    Dim::span(*begin, *end)
                }
                [begin, end, step] => {
                    ensure!(*step > 0, NonPositiveStepSnafu { step: *step });
                    all_points = false;
                    Dim::new(*begin, *end, *step)
                }
                _ => return MalformedDimensionSnafu { token }.fail(),
            };
            dims.push(dim);
        }

        Ok(if all_points { Subset::Indices(dims.iter().map(|d| d.begin).collect()) } else { Subset::Range(dims) })
    }
}

fn parse_bound(part: &str) -> Result<i64> {
    part.parse().context(InvalidBoundSnafu { token: part })
}
