//! Error types for the linear-algebra engine.
//!
//! Every variant carries the offending shapes, indices or type names as
//! structured data so that callers and tests can match on the error kind
//! rather than on message text. All errors are raised synchronously at the
//! offending call, before any caller-visible result is mutated.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in matrix and vector operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operand shapes differ where an elementwise or additive operation
    /// requires them to be equal.
    #[error("shape mismatch: left operand is {}x{}, right operand is {}x{}", .left.0, .left.1, .right.0, .right.1)]
    ShapeMismatch {
        /// Shape of the left operand.
        left: (usize, usize),
        /// Shape of the right operand.
        right: (usize, usize),
    },

    /// Inner dimensions differ where matrix multiplication requires
    /// `left.cols == right.rows`.
    #[error("inner dimension mismatch: cannot multiply {}x{} by {}x{}", .left.0, .left.1, .right.0, .right.1)]
    InnerDimensionMismatch {
        /// Shape of the left operand.
        left: (usize, usize),
        /// Shape of the right operand.
        right: (usize, usize),
    },

    /// A caller-supplied result container has the wrong shape for the
    /// operation's output.
    #[error("result shape mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    ResultShapeMismatch {
        /// Shape the operation requires.
        expected: (usize, usize),
        /// Shape of the supplied container.
        actual: (usize, usize),
    },

    /// A buffer or vector length does not match the expected element count.
    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// Expected element count.
        expected: usize,
        /// Actual element count.
        actual: usize,
    },

    /// A container was requested with a zero dimension.
    #[error("dimensions must be positive: requested {rows}x{cols}")]
    EmptyDimensions {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// A vector was requested with zero length.
    #[error("vector length must be positive")]
    EmptyLength,

    /// Index out of bounds.
    #[error("index out of bounds: index {index} is out of range for dimension {bound}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The dimension bound it violated.
        bound: usize,
    },

    /// Operation requires a square matrix.
    #[error("matrix must be square: got {rows}x{cols}")]
    NotSquare {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// Scalar division by the field's zero.
    #[error("scalar division by zero")]
    DivideByZero,

    /// A nonzero value was written off the diagonal of a diagonal
    /// representation, which cannot record it.
    #[error("cannot write nonzero off-diagonal entry ({row},{col}) into diagonal storage")]
    OffDiagonalWrite {
        /// Row of the rejected write.
        row: usize,
        /// Column of the rejected write.
        col: usize,
    },

    /// An element type outside the closed registry set was requested.
    #[error("unsupported element type: {name}")]
    UnsupportedElementType {
        /// Name of the offending element type.
        name: &'static str,
    },

    /// Compressed sparse arrays violate the CSR/CSC layout invariants.
    #[error("invalid sparse layout: {reason}")]
    InvalidSparseLayout {
        /// Which invariant was violated.
        reason: &'static str,
    },
}
