//! Per-element-type builders for matrices and vectors.
//!
//! A [`Builder`] constructs containers without the caller naming a
//! concrete representation, and chooses the representation of operation
//! results via [`same_as`]/[`same_as_pair`] so that a result container can
//! always hold whatever the operation may legitimately produce.
//!
//! One builder singleton exists per element type, resolved through
//! [`builder_for`]. The registry behind it is populated lazily and
//! idempotently: lookups are read-only once an entry exists, and the
//! double-checked write path at worst races benignly on first use.
//!
//! [`same_as`]: Builder::same_as
//! [`same_as_pair`]: Builder::same_as_pair

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::storage::{CsrStorage, DenseStorage, DiagonalStorage, Storage, StorageKind};
use crate::vector::Vector;
use num_complex::{Complex32, Complex64};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{OnceLock, RwLock};

/// Factory for matrices and vectors of element type `T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builder<T: Scalar> {
    _marker: PhantomData<T>,
}

static REGISTRY: OnceLock<RwLock<HashMap<TypeId, &'static (dyn Any + Send + Sync)>>> =
    OnceLock::new();

fn is_registered<T: Scalar>() -> bool {
    let key = TypeId::of::<T>();
    key == TypeId::of::<f32>()
        || key == TypeId::of::<f64>()
        || key == TypeId::of::<Complex32>()
        || key == TypeId::of::<Complex64>()
}

/// Resolve the builder singleton for element type `T`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedElementType`] naming `T` when it is outside
/// the closed registry set (`f32`, `f64`, `Complex32`, `Complex64`).
///
/// # Example
///
/// ```
/// use lineal::builder_for;
///
/// let builder = builder_for::<f64>().unwrap();
/// let m = builder.dense(2, 3).unwrap();
/// assert_eq!((m.rows(), m.cols()), (2, 3));
/// ```
pub fn builder_for<T: Scalar>() -> Result<&'static Builder<T>> {
    let registry = REGISTRY.get_or_init(|| RwLock::new(HashMap::new()));
    let key = TypeId::of::<T>();
    {
        let map = registry.read().expect("builder registry lock poisoned");
        if let Some(entry) = map.get(&key) {
            return entry
                .downcast_ref::<Builder<T>>()
                .ok_or(Error::UnsupportedElementType {
                    name: T::TYPE_NAME,
                });
        }
    }
    if !is_registered::<T>() {
        return Err(Error::UnsupportedElementType {
            name: T::TYPE_NAME,
        });
    }
    let mut map = registry.write().expect("builder registry lock poisoned");
    let entry = map
        .entry(key)
        .or_insert_with(|| Box::leak(Box::new(Builder::<T>::default())));
    entry
        .downcast_ref::<Builder<T>>()
        .ok_or(Error::UnsupportedElementType {
            name: T::TYPE_NAME,
        })
}

impl<T: Scalar> Builder<T> {
    /// Zero-initialized dense matrix.
    pub fn dense(&self, rows: usize, cols: usize) -> Result<Matrix<T>> {
        Ok(Matrix::of_storage(Storage::Dense(DenseStorage::zeros(
            rows, cols,
        )?)))
    }

    /// Dense matrix with every element set to `value`.
    pub fn dense_of_value(&self, rows: usize, cols: usize, value: T) -> Result<Matrix<T>> {
        Ok(Matrix::of_storage(Storage::Dense(DenseStorage::of_value(
            rows, cols, value,
        )?)))
    }

    /// Dense matrix initialized from `f(row, col)`.
    pub fn dense_of_init(
        &self,
        rows: usize,
        cols: usize,
        f: impl Fn(usize, usize) -> T,
    ) -> Result<Matrix<T>> {
        Ok(Matrix::of_storage(Storage::Dense(DenseStorage::of_init(
            rows, cols, f,
        )?)))
    }

    /// Dense matrix binding directly to a caller-supplied column-major
    /// buffer (taken by move, not copied).
    pub fn dense_of_vec(&self, rows: usize, cols: usize, data: Vec<T>) -> Result<Matrix<T>> {
        Ok(Matrix::of_storage(Storage::Dense(DenseStorage::of_vec(
            rows, cols, data,
        )?)))
    }

    /// Identity matrix of order `n`, held in diagonal storage.
    pub fn identity(&self, n: usize) -> Result<Matrix<T>> {
        Ok(Matrix::of_storage(Storage::Diagonal(
            DiagonalStorage::identity(n)?,
        )))
    }

    /// Sparse matrix with no stored entries.
    pub fn sparse(&self, rows: usize, cols: usize) -> Result<Matrix<T>> {
        Ok(Matrix::of_storage(Storage::Sparse(CsrStorage::zeros(
            rows, cols,
        )?)))
    }

    /// Sparse matrix from coordinate-format triples. Duplicate
    /// coordinates accumulate by summation; explicit zeros are stored.
    pub fn sparse_of_coo(
        &self,
        rows: usize,
        cols: usize,
        entries: &[(usize, usize, T)],
    ) -> Result<Matrix<T>> {
        Ok(Matrix::of_storage(Storage::Sparse(CsrStorage::of_coo(
            rows, cols, entries,
        )?)))
    }

    /// Sparse matrix from compressed-sparse-row arrays.
    pub fn sparse_of_csr(
        &self,
        rows: usize,
        cols: usize,
        row_pointers: Vec<usize>,
        column_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Matrix<T>> {
        Ok(Matrix::of_storage(Storage::Sparse(CsrStorage::of_csr(
            rows,
            cols,
            row_pointers,
            column_indices,
            values,
        )?)))
    }

    /// Sparse matrix from compressed-sparse-column arrays.
    pub fn sparse_of_csc(
        &self,
        rows: usize,
        cols: usize,
        col_pointers: Vec<usize>,
        row_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Matrix<T>> {
        Ok(Matrix::of_storage(Storage::Sparse(CsrStorage::of_csc(
            rows,
            cols,
            col_pointers,
            row_indices,
            values,
        )?)))
    }

    /// Zero diagonal matrix.
    pub fn diagonal(&self, rows: usize, cols: usize) -> Result<Matrix<T>> {
        Ok(Matrix::of_storage(Storage::Diagonal(
            DiagonalStorage::zeros(rows, cols)?,
        )))
    }

    /// Diagonal matrix with every diagonal element set to `value`.
    pub fn diagonal_of_value(&self, rows: usize, cols: usize, value: T) -> Result<Matrix<T>> {
        Ok(Matrix::of_storage(Storage::Diagonal(
            DiagonalStorage::of_value(rows, cols, value)?,
        )))
    }

    /// Diagonal matrix from a caller-supplied diagonal array.
    pub fn diagonal_of_vec(&self, rows: usize, cols: usize, data: Vec<T>) -> Result<Matrix<T>> {
        Ok(Matrix::of_storage(Storage::Diagonal(
            DiagonalStorage::of_vec(rows, cols, data)?,
        )))
    }

    /// Wrap an existing storage in a matrix.
    pub fn of_storage(&self, storage: Storage<T>) -> Matrix<T> {
        Matrix::of_storage(storage)
    }

    /// A zero container modeled on `example`'s representation.
    ///
    /// Dense stays dense and sparse stays sparse. Diagonal stays diagonal
    /// unless `fully_mutable` requests a sparse fallback - a diagonal
    /// result container cannot record off-diagonal entries, so operations
    /// whose output may leave the diagonal must ask for full mutability.
    pub fn same_as(
        &self,
        example: &Matrix<T>,
        rows: usize,
        cols: usize,
        fully_mutable: bool,
    ) -> Result<Matrix<T>> {
        self.of_kind(resolve_kind(example.storage().kind(), fully_mutable), rows, cols)
    }

    /// A zero container able to hold the union of what two operands'
    /// representations may produce: dense if either operand is dense,
    /// diagonal only if both are diagonal, sparse if either is sparse.
    pub fn same_as_pair(
        &self,
        a: &Matrix<T>,
        b: &Matrix<T>,
        rows: usize,
        cols: usize,
        fully_mutable: bool,
    ) -> Result<Matrix<T>> {
        let kind = resolve_kind_pair(a.storage().kind(), b.storage().kind(), fully_mutable);
        self.of_kind(kind, rows, cols)
    }

    fn of_kind(&self, kind: StorageKind, rows: usize, cols: usize) -> Result<Matrix<T>> {
        match kind {
            StorageKind::Dense => self.dense(rows, cols),
            StorageKind::Sparse => self.sparse(rows, cols),
            StorageKind::Diagonal => self.diagonal(rows, cols),
        }
    }

    /// Zero-initialized dense vector.
    pub fn dense_vector(&self, len: usize) -> Result<Vector<T>> {
        Vector::dense(len)
    }

    /// Dense vector binding directly to a caller-supplied buffer.
    pub fn dense_vector_of_vec(&self, data: Vec<T>) -> Result<Vector<T>> {
        Vector::dense_of_vec(data)
    }

    /// Sparse vector with no stored entries.
    pub fn sparse_vector(&self, len: usize) -> Result<Vector<T>> {
        Vector::sparse(len)
    }

    /// Sparse vector from `(index, value)` pairs; duplicate indices
    /// accumulate by summation.
    pub fn sparse_vector_of_indexed(
        &self,
        len: usize,
        entries: &[(usize, T)],
    ) -> Result<Vector<T>> {
        Vector::sparse_of_indexed(len, entries)
    }
}

pub(crate) fn resolve_kind(example: StorageKind, fully_mutable: bool) -> StorageKind {
    match example {
        StorageKind::Dense => StorageKind::Dense,
        StorageKind::Sparse => StorageKind::Sparse,
        StorageKind::Diagonal => {
            if fully_mutable {
                StorageKind::Sparse
            } else {
                StorageKind::Diagonal
            }
        }
    }
}

pub(crate) fn resolve_kind_pair(a: StorageKind, b: StorageKind, fully_mutable: bool) -> StorageKind {
    if a == StorageKind::Dense || b == StorageKind::Dense {
        StorageKind::Dense
    } else if a == StorageKind::Diagonal && b == StorageKind::Diagonal {
        resolve_kind(StorageKind::Diagonal, fully_mutable)
    } else if a == StorageKind::Sparse || b == StorageKind::Sparse {
        StorageKind::Sparse
    } else {
        StorageKind::Dense
    }
}
