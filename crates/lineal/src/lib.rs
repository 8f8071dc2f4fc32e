//! lineal - a generic linear-algebra engine.
//!
//! This crate provides `Matrix<T>` and `Vector<T>` containers that support
//! multiple internal storage representations behind a uniform arithmetic
//! interface:
//!
//! ```text
//! Storage<T> (closed set)
//! ├── Dense    - flat column-major buffer
//! ├── Sparse   - 3-array compressed sparse row (CSR)
//! └── Diagonal - single diagonal array
//! ```
//!
//! Binary operations dispatch on the pair of storage kinds to select a
//! representation-aware fast path (sparse x sparse multiplication, CSR
//! triangular extraction, diagonal scaling) and fall back to a generic
//! index-based implementation for every remaining pair, so mixed-
//! representation arithmetic is always defined.
//!
//! Containers are obtained through the per-element-type [`Builder`], which
//! also chooses the representation of operation results so that a result
//! container can always hold whatever the operation may legitimately
//! produce.
//!
//! # Example
//!
//! ```
//! use lineal::prelude::*;
//!
//! let builder = builder_for::<f64>().unwrap();
//! let a = builder.sparse_of_coo(2, 2, &[(0, 0, 2.0), (0, 1, 3.0), (1, 1, 4.0)]).unwrap();
//! let b = builder.sparse_of_coo(2, 2, &[(0, 0, 1.0), (1, 0, 5.0), (1, 1, 1.0)]).unwrap();
//!
//! let c = a.multiply(&b).unwrap();
//! assert_eq!(c.at(0, 0), 17.0);
//! assert_eq!(c.at(0, 1), 3.0);
//! assert_eq!(c.at(1, 0), 20.0);
//! assert_eq!(c.at(1, 1), 4.0);
//! ```
//!
//! Element types form a closed set: `f32`, `f64`, `Complex32`, `Complex64`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod error;
pub mod matrix;
pub mod ops;
pub mod scalar;
pub mod storage;
pub mod vector;

pub use builder::{builder_for, Builder};
pub use error::{Error, Result};
pub use matrix::Matrix;
pub use ops::pointwise::Zeros;
pub use scalar::{RealScalar, Scalar};
pub use storage::{Storage, StorageKind};
pub use vector::{Vector, VectorStorage};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builder::{builder_for, Builder};
    pub use crate::error::{Error, Result};
    pub use crate::matrix::Matrix;
    pub use crate::ops::pointwise::Zeros;
    pub use crate::scalar::{RealScalar, Scalar};
    pub use crate::storage::{Storage, StorageKind};
    pub use crate::vector::{Vector, VectorStorage};
    pub use num_complex::{Complex32, Complex64};
}
