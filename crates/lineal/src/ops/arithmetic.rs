//! Addition and subtraction kernels.
//!
//! Matched representations walk their buffers directly; the sparse pair
//! merges rows with two cursors in a single O(nnz) pass. Mixed
//! representations scatter both operands' stored entries into a fresh
//! container of the resolved result kind.

use crate::error::Result;
use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::storage::{CsrStorage, Storage, StorageKind};

pub(crate) fn add_into<T: Scalar>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    result: &mut Matrix<T>,
) -> Result<()> {
    combine_into(a, b, result, false)
}

pub(crate) fn subtract_into<T: Scalar>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    result: &mut Matrix<T>,
) -> Result<()> {
    combine_into(a, b, result, true)
}

fn combine_into<T: Scalar>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    result: &mut Matrix<T>,
    negate: bool,
) -> Result<()> {
    match (a.storage(), b.storage(), result.storage().kind()) {
        (Storage::Dense(x), Storage::Dense(y), StorageKind::Dense) => {
            let mut out = x.clone();
            for (o, &v) in out.as_mut_slice().iter_mut().zip(y.as_slice()) {
                *o = if negate { *o - v } else { *o + v };
            }
            *result.storage_mut() = Storage::Dense(out);
            Ok(())
        }
        (Storage::Sparse(x), Storage::Sparse(y), StorageKind::Sparse) => {
            let merged = if negate {
                merge_sparse(x, y, |av, bv| av - bv)
            } else {
                merge_sparse(x, y, |av, bv| av + bv)
            };
            *result.storage_mut() = Storage::Sparse(merged);
            Ok(())
        }
        (Storage::Diagonal(x), Storage::Diagonal(y), StorageKind::Diagonal) => {
            let mut out = x.clone();
            for (o, &v) in out.as_mut_slice().iter_mut().zip(y.as_slice()) {
                *o = if negate { *o - v } else { *o + v };
            }
            *result.storage_mut() = Storage::Diagonal(out);
            Ok(())
        }
        (_, _, kind) => {
            let mut scratch = Storage::zeros_of_kind(kind, a.rows(), a.cols())?;
            for (row, col, value) in a.storage().iter_stored() {
                scratch.add_at(row, col, value)?;
            }
            for (row, col, value) in b.storage().iter_stored() {
                let value = if negate { -value } else { value };
                scratch.add_at(row, col, value)?;
            }
            *result.storage_mut() = scratch;
            Ok(())
        }
    }
}

/// Merge two CSR operands of equal shape, applying `f` positionwise with
/// zero substituted for the side that stores nothing. Rows merge with two
/// cursors over already-sorted columns, so the output needs no
/// normalization; exact-zero results are dropped.
pub(crate) fn merge_sparse<T: Scalar>(
    a: &CsrStorage<T>,
    b: &CsrStorage<T>,
    f: impl Fn(T, T) -> T,
) -> CsrStorage<T> {
    let rows = a.rows();
    let upper = a.nonzero_count() + b.nonzero_count();
    let mut row_pointers = Vec::with_capacity(rows + 1);
    row_pointers.push(0);
    let mut column_indices = Vec::with_capacity(upper);
    let mut values = Vec::with_capacity(upper);

    for row in 0..rows {
        let (acols, avals) = a.row_entries(row);
        let (bcols, bvals) = b.row_entries(row);
        let (mut i, mut j) = (0, 0);
        while i < acols.len() || j < bcols.len() {
            let (col, value) = if j >= bcols.len() || (i < acols.len() && acols[i] < bcols[j]) {
                let entry = (acols[i], f(avals[i], T::zero()));
                i += 1;
                entry
            } else if i >= acols.len() || bcols[j] < acols[i] {
                let entry = (bcols[j], f(T::zero(), bvals[j]));
                j += 1;
                entry
            } else {
                let entry = (acols[i], f(avals[i], bvals[j]));
                i += 1;
                j += 1;
                entry
            };
            if !value.is_zero() {
                column_indices.push(col);
                values.push(value);
            }
        }
        row_pointers.push(values.len());
    }
    CsrStorage::from_parts(rows, a.cols(), row_pointers, column_indices, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::builder_for;
    use crate::storage::StorageKind;

    #[test]
    fn test_dense_add_subtract() {
        let b = builder_for::<f64>().unwrap();
        let x = b.dense_of_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = b.dense_of_value(2, 2, 1.0).unwrap();
        let sum = x.add(&y).unwrap();
        assert_eq!(sum.at(0, 0), 2.0);
        assert_eq!(sum.at(1, 1), 5.0);
        let diff = sum.subtract(&y).unwrap();
        assert!(diff.value_equals(&x));
    }

    #[test]
    fn test_sparse_add_merges_disjoint_rows() {
        let b = builder_for::<f64>().unwrap();
        let x = b.sparse_of_coo(2, 3, &[(0, 0, 1.0), (1, 2, 2.0)]).unwrap();
        let y = b.sparse_of_coo(2, 3, &[(0, 1, 3.0), (1, 2, 4.0)]).unwrap();
        let sum = x.add(&y).unwrap();
        assert_eq!(sum.storage().kind(), StorageKind::Sparse);
        assert_eq!(sum.at(0, 0), 1.0);
        assert_eq!(sum.at(0, 1), 3.0);
        assert_eq!(sum.at(1, 2), 6.0);
        assert_eq!(sum.nonzero_count(), Some(3));
    }

    #[test]
    fn test_sparse_subtract_cancellation_drops_entry() {
        let b = builder_for::<f64>().unwrap();
        let x = b.sparse_of_coo(2, 2, &[(0, 0, 5.0), (1, 1, 1.0)]).unwrap();
        let y = b.sparse_of_coo(2, 2, &[(0, 0, 5.0)]).unwrap();
        let diff = x.subtract(&y).unwrap();
        assert_eq!(diff.at(0, 0), 0.0);
        assert_eq!(diff.nonzero_count(), Some(1));
    }

    #[test]
    fn test_diagonal_add_stays_diagonal() {
        let b = builder_for::<f64>().unwrap();
        let x = b.diagonal_of_value(3, 3, 1.0).unwrap();
        let y = b.diagonal_of_value(3, 3, 2.0).unwrap();
        let sum = x.add(&y).unwrap();
        assert_eq!(sum.storage().kind(), StorageKind::Diagonal);
        assert_eq!(sum.at(1, 1), 3.0);
        assert_eq!(sum.at(0, 1), 0.0);
    }

    #[test]
    fn test_mixed_sparse_diagonal_add_widens_to_sparse() {
        let b = builder_for::<f64>().unwrap();
        let s = b.sparse_of_coo(2, 2, &[(0, 1, 4.0)]).unwrap();
        let d = b.diagonal_of_value(2, 2, 1.0).unwrap();
        let sum = s.add(&d).unwrap();
        assert_eq!(sum.storage().kind(), StorageKind::Sparse);
        assert_eq!(sum.at(0, 0), 1.0);
        assert_eq!(sum.at(0, 1), 4.0);
        assert_eq!(sum.at(1, 1), 1.0);
    }

    #[test]
    fn test_mixed_dense_sparse_add_widens_to_dense() {
        let b = builder_for::<f64>().unwrap();
        let d = b.dense_of_value(2, 2, 1.0).unwrap();
        let s = b.sparse_of_coo(2, 2, &[(1, 0, 2.0)]).unwrap();
        let sum = d.add(&s).unwrap();
        assert_eq!(sum.storage().kind(), StorageKind::Dense);
        assert_eq!(sum.at(1, 0), 3.0);
        assert_eq!(sum.at(0, 0), 1.0);
    }

    #[test]
    fn test_add_into_reuses_container() {
        let b = builder_for::<f64>().unwrap();
        let x = b.dense_of_value(2, 2, 1.0).unwrap();
        let y = b.dense_of_value(2, 2, 2.0).unwrap();
        let mut out = b.dense(2, 2).unwrap();
        x.add_into(&y, &mut out).unwrap();
        assert_eq!(out.at(0, 0), 3.0);
    }
}
