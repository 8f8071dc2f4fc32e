//! Diagonal matrix storage.
//!
//! Stores only the `min(rows, cols)` diagonal entries; every off-diagonal
//! position reads as zero and cannot hold a nonzero value.

use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// Diagonal storage - a single array of `min(rows, cols)` elements.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalStorage<T: Scalar> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Scalar> DiagonalStorage<T> {
    /// Create zero-initialized diagonal storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDimensions`] if either dimension is zero.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyDimensions { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            data: vec![T::zero(); rows.min(cols)],
        })
    }

    /// Create diagonal storage with every diagonal element set to `value`.
    pub fn of_value(rows: usize, cols: usize, value: T) -> Result<Self> {
        let mut storage = Self::zeros(rows, cols)?;
        storage.data.iter_mut().for_each(|x| *x = value);
        Ok(storage)
    }

    /// Create diagonal storage from a caller-supplied diagonal array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if `data.len() != min(rows, cols)`.
    pub fn of_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyDimensions { rows, cols });
        }
        if data.len() != rows.min(cols) {
            return Err(Error::LengthMismatch {
                expected: rows.min(cols),
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// The identity diagonal of order `n`.
    pub fn identity(n: usize) -> Result<Self> {
        Self::of_value(n, n, T::one())
    }

    /// Row count.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of diagonal elements, `min(rows, cols)`.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the diagonal array is empty (never true for a valid shape).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `(row, col)`; zero everywhere off the diagonal.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        if row == col {
            self.data[row]
        } else {
            T::zero()
        }
    }

    /// Write the element at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OffDiagonalWrite`] for a nonzero value off the
    /// diagonal; writing zero off the diagonal is a no-op.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row == col {
            self.data[row] = value;
            Ok(())
        } else if value.is_zero() {
            Ok(())
        } else {
            Err(Error::OffDiagonalWrite { row, col })
        }
    }

    /// Reset every diagonal element to zero.
    pub fn clear(&mut self) {
        for x in &mut self.data {
            *x = T::zero();
        }
    }

    /// The diagonal array.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable view of the diagonal array.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}
