use std::num::ParseIntError;

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Two regions of different rank were combined.
    #[snafu(display("dimension mismatch: expected {expected} dimensions, got {actual}"))]
    DimensionMismatch { expected: usize, actual: usize },

    /// A bound in a textual region could not be parsed as an integer.
    #[snafu(display("invalid bound '{token}': {source}"))]
    InvalidBound { token: String, source: ParseIntError },

    /// A dimension has more than three `:`-separated components.
    #[snafu(display("malformed dimension '{token}': expected 'i', 'b:e' or 'b:e:s'"))]
    MalformedDimension { token: String },

    /// Strides must be strictly positive.
    #[snafu(display("step must be positive, got {step}"))]
    NonPositiveStep { step: i64 },

    /// A region needs at least one dimension.
    #[snafu(display("region has no dimensions"))]
    EmptyRegion,
}
