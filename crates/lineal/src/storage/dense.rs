//! Dense column-major matrix storage.

use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// Dense storage - one contiguous buffer of `rows * cols` elements in
/// column-major order (`index = col * rows + row`).
#[derive(Debug, Clone, PartialEq)]
pub struct DenseStorage<T: Scalar> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Scalar> DenseStorage<T> {
    /// Create zero-initialized dense storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDimensions`] if either dimension is zero.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        check_dims(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        })
    }

    /// Create dense storage with every element set to `value`.
    pub fn of_value(rows: usize, cols: usize, value: T) -> Result<Self> {
        check_dims(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        })
    }

    /// Create dense storage from a per-element initializer `f(row, col)`.
    pub fn of_init(rows: usize, cols: usize, f: impl Fn(usize, usize) -> T) -> Result<Self> {
        check_dims(rows, cols)?;
        let mut data = Vec::with_capacity(rows * cols);
        for col in 0..cols {
            for row in 0..rows {
                data.push(f(row, col));
            }
        }
        Ok(Self { rows, cols, data })
    }

    /// Create dense storage that binds directly to a caller-supplied
    /// column-major buffer.
    ///
    /// The buffer is taken by move, not copied; [`into_vec`](Self::into_vec)
    /// returns it. This is the direct-binding construction path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if `data.len() != rows * cols`.
    pub fn of_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        check_dims(rows, cols)?;
        if data.len() != rows * cols {
            return Err(Error::LengthMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
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

    /// Linear index of `(row, col)` in the column-major buffer.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        col * self.rows + row
    }

    /// Element at `(row, col)`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        self.data[self.index(row, col)]
    }

    /// Mutable reference to the element at `(row, col)`.
    #[inline]
    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut T {
        let i = self.index(row, col);
        &mut self.data[i]
    }

    /// Overwrite the element at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let i = self.index(row, col);
        self.data[i] = value;
    }

    /// Reset every element to zero.
    pub fn clear(&mut self) {
        for x in &mut self.data {
            *x = T::zero();
        }
    }

    /// Flat column-major view of the data.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable flat column-major view of the data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the storage and return the underlying buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

fn check_dims(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(Error::EmptyDimensions { rows, cols });
    }
    Ok(())
}
