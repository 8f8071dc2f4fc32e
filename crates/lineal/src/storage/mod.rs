//! Storage representations for matrix data.
//!
//! The closed set of representations:
//!
//! ```text
//! Storage<T>
//! ├── Dense    - flat column-major buffer
//! ├── Sparse   - compressed sparse row (CSR)
//! └── Diagonal - single diagonal array
//! ```
//!
//! Each variant owns its backing buffers exclusively. Binary arithmetic
//! dispatches on the pair of [`StorageKind`] tags; the enum being closed
//! guarantees dispatch totality with a generic index-based fallback.

mod dense;
mod diagonal;
mod sparse;

pub use dense::DenseStorage;
pub use diagonal::DiagonalStorage;
pub use sparse::CsrStorage;

use crate::error::Result;
use crate::scalar::Scalar;

/// Tag identifying a storage representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// Flat column-major buffer.
    Dense,
    /// Compressed sparse row.
    Sparse,
    /// Diagonal-only array.
    Diagonal,
}

/// The exclusive owner of a matrix's element data.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage<T: Scalar> {
    /// Dense column-major storage.
    Dense(DenseStorage<T>),
    /// Compressed sparse row storage.
    Sparse(CsrStorage<T>),
    /// Diagonal storage.
    Diagonal(DiagonalStorage<T>),
}

impl<T: Scalar> Storage<T> {
    /// The representation tag.
    #[inline]
    pub fn kind(&self) -> StorageKind {
        match self {
            Storage::Dense(_) => StorageKind::Dense,
            Storage::Sparse(_) => StorageKind::Sparse,
            Storage::Diagonal(_) => StorageKind::Diagonal,
        }
    }

    /// Row count.
    #[inline]
    pub fn rows(&self) -> usize {
        match self {
            Storage::Dense(s) => s.rows(),
            Storage::Sparse(s) => s.rows(),
            Storage::Diagonal(s) => s.rows(),
        }
    }

    /// Column count.
    #[inline]
    pub fn cols(&self) -> usize {
        match self {
            Storage::Dense(s) => s.cols(),
            Storage::Sparse(s) => s.cols(),
            Storage::Diagonal(s) => s.cols(),
        }
    }

    /// Element at `(row, col)` by representation-appropriate random access.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        match self {
            Storage::Dense(s) => s.at(row, col),
            Storage::Sparse(s) => s.at(row, col),
            Storage::Diagonal(s) => s.at(row, col),
        }
    }

    /// Write the element at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::OffDiagonalWrite`] when a nonzero
    /// value lands off the diagonal of a diagonal representation.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        match self {
            Storage::Dense(s) => {
                s.set(row, col, value);
                Ok(())
            }
            Storage::Sparse(s) => {
                s.set(row, col, value);
                Ok(())
            }
            Storage::Diagonal(s) => s.set(row, col, value),
        }
    }

    /// A fresh zero storage of the given representation and shape.
    pub fn zeros_of_kind(kind: StorageKind, rows: usize, cols: usize) -> Result<Self> {
        Ok(match kind {
            StorageKind::Dense => Storage::Dense(DenseStorage::zeros(rows, cols)?),
            StorageKind::Sparse => Storage::Sparse(CsrStorage::zeros(rows, cols)?),
            StorageKind::Diagonal => Storage::Diagonal(DiagonalStorage::zeros(rows, cols)?),
        })
    }

    /// Add `value` to the element at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`set`](Self::set).
    pub fn add_at(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        match self {
            Storage::Dense(s) => {
                *s.at_mut(row, col) += value;
                Ok(())
            }
            Storage::Sparse(s) => {
                s.add_at(row, col, value);
                Ok(())
            }
            Storage::Diagonal(s) => {
                let sum = s.at(row, col) + value;
                s.set(row, col, sum)
            }
        }
    }

    /// Reset every element to zero, keeping shape and representation.
    pub fn clear(&mut self) {
        match self {
            Storage::Dense(s) => s.clear(),
            Storage::Sparse(s) => s.clear(),
            Storage::Diagonal(s) => s.clear(),
        }
    }

    /// Iterate the entries this representation actually stores, as
    /// `(row, col, value)` triples. Dense storage yields every cell.
    pub fn iter_stored(&self) -> Box<dyn Iterator<Item = (usize, usize, T)> + '_> {
        match self {
            Storage::Dense(s) => {
                let rows = s.rows();
                let cols = s.cols();
                Box::new((0..cols).flat_map(move |col| {
                    (0..rows).map(move |row| (row, col, s.at(row, col)))
                }))
            }
            Storage::Sparse(s) => Box::new(s.iter()),
            Storage::Diagonal(s) => Box::new(
                (0..s.len()).map(move |i| (i, i, s.as_slice()[i])),
            ),
        }
    }

    /// Borrow the dense variant, if that is the representation.
    #[inline]
    pub fn as_dense(&self) -> Option<&DenseStorage<T>> {
        match self {
            Storage::Dense(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the sparse variant, if that is the representation.
    #[inline]
    pub fn as_sparse(&self) -> Option<&CsrStorage<T>> {
        match self {
            Storage::Sparse(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the diagonal variant, if that is the representation.
    #[inline]
    pub fn as_diagonal(&self) -> Option<&DiagonalStorage<T>> {
        match self {
            Storage::Diagonal(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        let d = Storage::Dense(DenseStorage::<f64>::zeros(2, 2).unwrap());
        let s = Storage::Sparse(CsrStorage::<f64>::zeros(2, 2).unwrap());
        let g = Storage::Diagonal(DiagonalStorage::<f64>::zeros(2, 2).unwrap());
        assert_eq!(d.kind(), StorageKind::Dense);
        assert_eq!(s.kind(), StorageKind::Sparse);
        assert_eq!(g.kind(), StorageKind::Diagonal);
    }

    #[test]
    fn test_uniform_access_across_kinds() {
        let mut storages = vec![
            Storage::Dense(DenseStorage::<f64>::zeros(3, 3).unwrap()),
            Storage::Sparse(CsrStorage::<f64>::zeros(3, 3).unwrap()),
            Storage::Diagonal(DiagonalStorage::<f64>::zeros(3, 3).unwrap()),
        ];
        for storage in &mut storages {
            storage.set(1, 1, 4.0).unwrap();
            assert_eq!(storage.at(1, 1), 4.0);
            assert_eq!(storage.at(0, 2), 0.0);
            assert_eq!(storage.rows(), 3);
            assert_eq!(storage.cols(), 3);
        }
    }

    #[test]
    fn test_iter_stored_sparse_skips_zeros() {
        let mut csr = CsrStorage::<f64>::zeros(2, 2).unwrap();
        csr.set(0, 1, 2.0);
        let storage = Storage::Sparse(csr);
        let entries: Vec<_> = storage.iter_stored().collect();
        assert_eq!(entries, vec![(0, 1, 2.0)]);
    }

    #[test]
    fn test_iter_stored_dense_yields_all() {
        let storage = Storage::Dense(DenseStorage::<f64>::zeros(2, 2).unwrap());
        assert_eq!(storage.iter_stored().count(), 4);
    }
}
