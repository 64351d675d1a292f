//! Region values and the four operations the rewrite rules rely on.
//!
//! A [`Subset`] describes which elements of a container an edge touches:
//!
//! - `Indices`: a single point, one coordinate per dimension
//! - `Range`: a strided half-open interval per dimension
//!
//! Coordinates are absolute in the frame of the container the region is
//! attached to. [`Subset::offset`] moves a region between frames and
//! [`Subset::compose`] re-expresses a region given relative to another one.
//!
//! # Composition example
//!
//! A producer slice `1:5` of `A` is copied into `C` at `2:6`. A read of
//! `C[3:6]` maps back onto `A` by stripping the destination offset and
//! composing with the producer slice:
//!
//! ```rust
//! # use rill_subset::Subset;
//! let producer: Subset = "1:5".parse().unwrap();
//! let copied_to: Subset = "2:6".parse().unwrap();
//! let read: Subset = "3:6".parse().unwrap();
//!
//! let relative = read.offset(&copied_to, true).unwrap();
//! assert_eq!(relative.to_string(), "1:4");
//! assert_eq!(producer.compose(&relative).unwrap().to_string(), "2:5");
//! ```

use smallvec::SmallVec;
use snafu::ensure;

use crate::error::*;

/// Per-dimension coordinates (lower bounds, upper bounds, extents).
pub type Bounds = SmallVec<[i64; 4]>;

/// One dimension of a [`Subset::Range`]: `begin..end` stepping by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dim {
    pub begin: i64,
    pub end: i64,
    pub step: i64,
}

impl Dim {
    pub const fn new(begin: i64, end: i64, step: i64) -> Self {
        Self { begin, end, step }
    }

    /// Unit-stride interval `begin..end`.
    pub const fn span(begin: i64, end: i64) -> Self {
        Self { begin, end, step: 1 }
    }

    /// Interval holding exactly `index`.
    pub const fn point(index: i64) -> Self {
        Self { begin: index, end: index + 1, step: 1 }
    }

    /// Number of elements visited.
    pub fn size(&self) -> i64 {
        if self.end <= self.begin { 0 } else { (self.end - self.begin + self.step - 1) / self.step }
    }

    /// Last visited coordinate (inclusive upper bound).
    pub fn last(&self) -> i64 {
        self.begin + (self.size() - 1).max(0) * self.step
    }

    fn shifted(self, by: i64) -> Self {
        Self { begin: self.begin + by, end: self.end + by, step: self.step }
    }
}

/// A multidimensional index set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subset {
    /// A fixed point.
    Indices(Bounds),
    /// A strided interval per dimension.
    Range(SmallVec<[Dim; 4]>),
}

impl Subset {
    pub fn indices(coords: impl IntoIterator<Item = i64>) -> Self {
        Self::Indices(coords.into_iter().collect())
    }

    /// Unit-stride range from `(begin, end)` pairs.
    pub fn range(bounds: impl IntoIterator<Item = (i64, i64)>) -> Self {
        Self::Range(bounds.into_iter().map(|(begin, end)| Dim::span(begin, end)).collect())
    }

    pub fn strided(dims: impl IntoIterator<Item = Dim>) -> Self {
        Self::Range(dims.into_iter().collect())
    }

    /// The whole of a container with the given shape.
    pub fn full(shape: &[i64]) -> Self {
        Self::range(shape.iter().map(|&extent| (0, extent)))
    }

    pub fn dims(&self) -> usize {
        match self {
            Self::Indices(coords) => coords.len(),
            Self::Range(dims) => dims.len(),
        }
    }

    /// Extent of every dimension.
    pub fn size(&self) -> Bounds {
        match self {
            Self::Indices(coords) => coords.iter().map(|_| 1).collect(),
            Self::Range(dims) => dims.iter().map(Dim::size).collect(),
        }
    }

    /// Total number of addressed elements. Always 1 for `Indices`.
    pub fn num_elements(&self) -> i64 {
        self.size().iter().product()
    }

    pub fn min_element(&self) -> Bounds {
        match self {
            Self::Indices(coords) => coords.clone(),
            Self::Range(dims) => dims.iter().map(|d| d.begin).collect(),
        }
    }

    /// Inclusive upper corner.
    pub fn max_element(&self) -> Bounds {
        match self {
            Self::Indices(coords) => coords.clone(),
            Self::Range(dims) => dims.iter().map(Dim::last).collect(),
        }
    }

    /// Translate by the lower corner of `reference`, subtracting when `negative`.
    pub fn offset(&self, reference: &Subset, negative: bool) -> Result<Subset> {
        self.check_rank(reference)?;
        let sign = if negative { -1 } else { 1 };
        let shift = reference.min_element();
        Ok(match self {
            Self::Indices(coords) => Self::Indices(coords.iter().zip(&shift).map(|(c, s)| c + sign * s).collect()),
            Self::Range(dims) => Self::Range(dims.iter().zip(&shift).map(|(d, s)| d.shifted(sign * s)).collect()),
        })
    }

    /// The same extents moved so that the lower corner sits at the origin.
    ///
    /// Used to stand in for the implicit side of a full-container copy.
    pub fn at_origin(&self) -> Subset {
        match self {
            Self::Indices(coords) => Self::Indices(coords.iter().map(|_| 0).collect()),
            Self::Range(dims) => Self::Range(dims.iter().map(|d| d.shifted(-d.begin)).collect()),
        }
    }

    /// Whether `other` lies inside the bounding box of `self`.
    pub fn covers(&self, other: &Subset) -> Result<bool> {
        self.check_rank(other)?;
        let (lo, hi) = (self.min_element(), self.max_element());
        let (other_lo, other_hi) = (other.min_element(), other.max_element());
        Ok(lo.iter().zip(&other_lo).all(|(a, b)| a <= b) && other_hi.iter().zip(&hi).all(|(b, a)| b <= a))
    }

    /// Absolute region addressed by `inner`, given relative to `self`.
    ///
    /// A point frame degenerates to shifting `inner` by the point. In a range
    /// frame every inner coordinate `i` maps to `begin + i * step`.
    pub fn compose(&self, inner: &Subset) -> Result<Subset> {
        self.check_rank(inner)?;
        let composed = match (self, inner) {
            (Self::Indices(_), _) => return inner.offset(self, false),
            (Self::Range(outer), Self::Indices(coords)) => {
                Self::Indices(outer.iter().zip(coords).map(|(o, i)| o.begin + i * o.step).collect())
            }
            (Self::Range(outer), Self::Range(dims)) => Self::Range(
                outer
                    .iter()
                    .zip(dims)
                    .map(|(o, i)| Dim {
                        begin: o.begin + i.begin * o.step,
                        end: o.begin + i.end * o.step,
                        step: i.step * o.step,
                    })
                    .collect(),
            ),
        };
        Ok(composed)
    }

    fn check_rank(&self, other: &Subset) -> Result<()> {
        ensure!(self.dims() == other.dims(), DimensionMismatchSnafu { expected: self.dims(), actual: other.dims() });
        Ok(())
    }
}
