//! Matrix multiplication kernels.
//!
//! The product is always computed into a fresh storage of the natural
//! result representation and only then handed to the caller (or moved
//! into a caller-supplied container), so no operand is ever read after
//! the result starts changing.
//!
//! The sparse x sparse kernel runs two passes over compressed rows. The
//! symbolic pass counts the distinct columns of each output row with a
//! per-column marker array; the numeric pass re-uses the marker to
//! accumulate products in place, recording each output row's columns in
//! discovery order. A final normalization restores the sorted-column
//! invariant.

use crate::error::Result;
use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::storage::{CsrStorage, DenseStorage, DiagonalStorage, Storage};
use crate::vector::Vector;

const UNMARKED: usize = usize::MAX;

pub(crate) fn multiply<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
    Ok(Matrix::of_storage(product_storage(
        a.storage(),
        b.storage(),
    )?))
}

fn product_storage<T: Scalar>(a: &Storage<T>, b: &Storage<T>) -> Result<Storage<T>> {
    let m = a.rows();
    let n = b.cols();
    match (a, b) {
        (Storage::Dense(x), Storage::Dense(y)) => {
            Ok(Storage::Dense(dense_dense(x, y)?))
        }
        (Storage::Sparse(x), Storage::Sparse(y)) => {
            Ok(Storage::Sparse(sparse_sparse(x, y)))
        }
        (Storage::Sparse(x), Storage::Dense(y)) => {
            Ok(Storage::Dense(sparse_dense(x, y)?))
        }
        (Storage::Dense(x), Storage::Sparse(y)) => {
            Ok(Storage::Dense(dense_sparse(x, y)?))
        }
        (Storage::Diagonal(x), Storage::Diagonal(y)) => {
            let mut out = DiagonalStorage::zeros(m, n)?;
            let shared = out.len().min(x.len()).min(y.len());
            for i in 0..shared {
                out.as_mut_slice()[i] = x.as_slice()[i] * y.as_slice()[i];
            }
            Ok(Storage::Diagonal(out))
        }
        (Storage::Diagonal(x), Storage::Dense(y)) => {
            // Row scaling.
            let out = DenseStorage::of_init(m, n, |row, col| {
                if row < x.len() {
                    x.as_slice()[row] * y.at(row, col)
                } else {
                    T::zero()
                }
            })?;
            Ok(Storage::Dense(out))
        }
        (Storage::Dense(x), Storage::Diagonal(y)) => {
            // Column scaling.
            let out = DenseStorage::of_init(m, n, |row, col| {
                if col < y.len() {
                    x.at(row, col) * y.as_slice()[col]
                } else {
                    T::zero()
                }
            })?;
            Ok(Storage::Dense(out))
        }
        (Storage::Diagonal(x), Storage::Sparse(y)) => {
            // Row scaling over stored entries only.
            let mut out = CsrStorage::zeros(m, n)?;
            for (row, col, value) in y.iter() {
                if row < x.len() && row < m {
                    let scaled = x.as_slice()[row] * value;
                    if !scaled.is_zero() {
                        out.set(row, col, scaled);
                    }
                }
            }
            Ok(Storage::Sparse(out))
        }
        (Storage::Sparse(x), Storage::Diagonal(y)) => {
            // Column scaling over stored entries only.
            let mut out = CsrStorage::zeros(m, n)?;
            for (row, col, value) in x.iter() {
                if col < y.len() {
                    let scaled = value * y.as_slice()[col];
                    if !scaled.is_zero() {
                        out.set(row, col, scaled);
                    }
                }
            }
            Ok(Storage::Sparse(out))
        }
    }
}

/// Column-major dense product: for each output column, accumulate scaled
/// columns of the left operand.
fn dense_dense<T: Scalar>(a: &DenseStorage<T>, b: &DenseStorage<T>) -> Result<DenseStorage<T>> {
    let m = a.rows();
    let k = a.cols();
    let n = b.cols();
    let mut out = DenseStorage::zeros(m, n)?;
    let a_data = a.as_slice();
    let b_data = b.as_slice();
    let out_data = out.as_mut_slice();
    for j in 0..n {
        let out_col = &mut out_data[j * m..(j + 1) * m];
        for l in 0..k {
            let scale = b_data[j * k + l];
            if scale.is_zero() {
                continue;
            }
            let a_col = &a_data[l * m..(l + 1) * m];
            for (o, &av) in out_col.iter_mut().zip(a_col) {
                *o += av * scale;
            }
        }
    }
    Ok(out)
}

/// Two-pass CSR product.
fn sparse_sparse<T: Scalar>(a: &CsrStorage<T>, b: &CsrStorage<T>) -> CsrStorage<T> {
    let m = a.rows();
    let n = b.cols();

    // Symbolic pass: count distinct output columns per row. The marker
    // holds the last row that touched each column.
    let mut marker = vec![UNMARKED; n];
    let mut row_pointers = vec![0usize; m + 1];
    for row in 0..m {
        let mut count = 0usize;
        let (acols, _) = a.row_entries(row);
        for &acol in acols {
            let (bcols, _) = b.row_entries(acol);
            for &bcol in bcols {
                if marker[bcol] != row {
                    marker[bcol] = row;
                    count += 1;
                }
            }
        }
        row_pointers[row + 1] = row_pointers[row] + count;
    }

    // Numeric pass: the marker now holds each column's position in the
    // output arrays; a position before the current row's start means the
    // column has not been discovered for this row yet.
    let nnz = row_pointers[m];
    let mut column_indices = vec![0usize; nnz];
    let mut values = vec![T::zero(); nnz];
    let mut marker = vec![UNMARKED; n];
    for row in 0..m {
        let row_start = row_pointers[row];
        let mut len = row_start;
        let (acols, avals) = a.row_entries(row);
        for (&acol, &aval) in acols.iter().zip(avals) {
            let (bcols, bvals) = b.row_entries(acol);
            for (&bcol, &bval) in bcols.iter().zip(bvals) {
                if marker[bcol] == UNMARKED || marker[bcol] < row_start {
                    marker[bcol] = len;
                    column_indices[len] = bcol;
                    values[len] = aval * bval;
                    len += 1;
                } else {
                    values[marker[bcol]] += aval * bval;
                }
            }
        }
    }

    let mut out = CsrStorage::from_parts(m, n, row_pointers, column_indices, values);
    // Columns were recorded in discovery order.
    out.normalize();
    out
}

fn sparse_dense<T: Scalar>(a: &CsrStorage<T>, b: &DenseStorage<T>) -> Result<DenseStorage<T>> {
    let m = a.rows();
    let n = b.cols();
    let mut out = DenseStorage::zeros(m, n)?;
    for row in 0..m {
        let (acols, avals) = a.row_entries(row);
        for (&acol, &aval) in acols.iter().zip(avals) {
            for j in 0..n {
                *out.at_mut(row, j) += aval * b.at(acol, j);
            }
        }
    }
    Ok(out)
}

fn dense_sparse<T: Scalar>(a: &DenseStorage<T>, b: &CsrStorage<T>) -> Result<DenseStorage<T>> {
    let m = a.rows();
    let n = b.cols();
    let mut out = DenseStorage::zeros(m, n)?;
    for k in 0..b.rows() {
        let (bcols, bvals) = b.row_entries(k);
        for (&bcol, &bval) in bcols.iter().zip(bvals) {
            for i in 0..m {
                *out.at_mut(i, bcol) += a.at(i, k) * bval;
            }
        }
    }
    Ok(out)
}

/// `y = A * x`, into a dense vector of length `A.rows()`.
pub(crate) fn multiply_vector<T: Scalar>(a: &Matrix<T>, x: &Vector<T>) -> Result<Vector<T>> {
    let m = a.rows();
    let mut y = vec![T::zero(); m];
    match a.storage() {
        Storage::Dense(d) => {
            let data = d.as_slice();
            for (j, xj) in x.iter_stored() {
                if xj.is_zero() {
                    continue;
                }
                let col = &data[j * m..(j + 1) * m];
                for (acc, &av) in y.iter_mut().zip(col) {
                    *acc += av * xj;
                }
            }
        }
        Storage::Sparse(s) => {
            for (row, acc) in y.iter_mut().enumerate() {
                let (cols, vals) = s.row_entries(row);
                for (&col, &val) in cols.iter().zip(vals) {
                    *acc += val * x.at(col);
                }
            }
        }
        Storage::Diagonal(d) => {
            for (i, &di) in d.as_slice().iter().enumerate() {
                y[i] = di * x.at(i);
            }
        }
    }
    Vector::dense_of_vec(y)
}

/// `y = A^T * x` without materializing the transpose.
pub(crate) fn transpose_multiply_vector<T: Scalar>(
    a: &Matrix<T>,
    x: &Vector<T>,
) -> Result<Vector<T>> {
    let n = a.cols();
    let m = a.rows();
    let mut y = vec![T::zero(); n];
    match a.storage() {
        Storage::Dense(d) => {
            let data = d.as_slice();
            for (j, acc) in y.iter_mut().enumerate() {
                let col = &data[j * m..(j + 1) * m];
                for (i, xi) in x.iter_stored() {
                    *acc += col[i] * xi;
                }
            }
        }
        Storage::Sparse(s) => {
            // Scatter row entries into the output they contribute to.
            for (i, xi) in x.iter_stored() {
                if xi.is_zero() {
                    continue;
                }
                let (cols, vals) = s.row_entries(i);
                for (&col, &val) in cols.iter().zip(vals) {
                    y[col] += val * xi;
                }
            }
        }
        Storage::Diagonal(d) => {
            for (j, &dj) in d.as_slice().iter().enumerate() {
                y[j] = dj * x.at(j);
            }
        }
    }
    Vector::dense_of_vec(y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::builder_for;
    use crate::storage::StorageKind;

    #[test]
    fn test_dense_product() {
        let b = builder_for::<f64>().unwrap();
        // Column-major literals: x = [[1, 3], [2, 4]], y = [[5, 7], [6, 8]].
        let x = b.dense_of_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = b.dense_of_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let p = x.multiply(&y).unwrap();
        assert_eq!(p.at(0, 0), 1.0 * 5.0 + 3.0 * 6.0);
        assert_eq!(p.at(1, 0), 2.0 * 5.0 + 4.0 * 6.0);
        assert_eq!(p.at(0, 1), 1.0 * 7.0 + 3.0 * 8.0);
        assert_eq!(p.at(1, 1), 2.0 * 7.0 + 4.0 * 8.0);
    }

    #[test]
    fn test_sparse_product_worked_example() {
        let b = builder_for::<f64>().unwrap();
        let x = b
            .sparse_of_coo(2, 2, &[(0, 0, 2.0), (0, 1, 3.0), (1, 1, 4.0)])
            .unwrap();
        let y = b
            .sparse_of_coo(2, 2, &[(0, 0, 1.0), (1, 0, 5.0), (1, 1, 1.0)])
            .unwrap();
        let p = x.multiply(&y).unwrap();
        assert_eq!(p.storage().kind(), StorageKind::Sparse);
        assert_eq!(p.at(0, 0), 17.0);
        assert_eq!(p.at(0, 1), 3.0);
        assert_eq!(p.at(1, 0), 20.0);
        assert_eq!(p.at(1, 1), 4.0);
    }

    #[test]
    fn test_sparse_product_columns_sorted() {
        let b = builder_for::<f64>().unwrap();
        // Row 0 of the product discovers column 2 before column 0.
        let x = b
            .sparse_of_coo(2, 3, &[(0, 0, 1.0), (0, 1, 1.0)])
            .unwrap();
        let y = b
            .sparse_of_coo(3, 3, &[(0, 2, 1.0), (1, 0, 1.0), (1, 2, 1.0)])
            .unwrap();
        let p = x.multiply(&y).unwrap();
        let csr = p.storage().as_sparse().unwrap();
        assert_eq!(csr.column_indices(), &[0, 2]);
        assert_eq!(csr.values(), &[1.0, 2.0]);
    }

    #[test]
    fn test_sparse_times_dense_is_dense() {
        let b = builder_for::<f64>().unwrap();
        let s = b.sparse_of_coo(2, 2, &[(0, 1, 3.0), (1, 0, 2.0)]).unwrap();
        let d = b.dense_of_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let p = s.multiply(&d).unwrap();
        assert_eq!(p.storage().kind(), StorageKind::Dense);
        assert_eq!(p.at(0, 0), 3.0 * 2.0);
        assert_eq!(p.at(0, 1), 3.0 * 4.0);
        assert_eq!(p.at(1, 0), 2.0 * 1.0);
        assert_eq!(p.at(1, 1), 2.0 * 3.0);
    }

    #[test]
    fn test_diagonal_scaling() {
        let b = builder_for::<f64>().unwrap();
        let d = b.diagonal_of_vec(2, 2, vec![2.0, 3.0]).unwrap();
        let m = b.dense_of_vec(2, 2, vec![1.0, 1.0, 1.0, 1.0]).unwrap();
        let rows_scaled = d.multiply(&m).unwrap();
        assert_eq!(rows_scaled.at(0, 0), 2.0);
        assert_eq!(rows_scaled.at(1, 0), 3.0);
        let cols_scaled = m.multiply(&d).unwrap();
        assert_eq!(cols_scaled.at(0, 0), 2.0);
        assert_eq!(cols_scaled.at(0, 1), 3.0);
    }

    #[test]
    fn test_diagonal_times_sparse_stays_sparse() {
        let b = builder_for::<f64>().unwrap();
        let d = b.diagonal_of_vec(2, 2, vec![2.0, 0.0]).unwrap();
        let s = b.sparse_of_coo(2, 2, &[(0, 1, 3.0), (1, 0, 4.0)]).unwrap();
        let p = d.multiply(&s).unwrap();
        assert_eq!(p.storage().kind(), StorageKind::Sparse);
        assert_eq!(p.at(0, 1), 6.0);
        assert_eq!(p.at(1, 0), 0.0);
        assert_eq!(p.nonzero_count(), Some(1));
    }

    #[test]
    fn test_rectangular_product_shapes() {
        let b = builder_for::<f64>().unwrap();
        let x = b.dense_of_value(2, 3, 1.0).unwrap();
        let y = b.dense_of_value(3, 4, 1.0).unwrap();
        let p = x.multiply(&y).unwrap();
        assert_eq!(p.shape(), (2, 4));
        assert_eq!(p.at(1, 3), 3.0);
    }

    #[test]
    fn test_multiply_vector_sparse() {
        let b = builder_for::<f64>().unwrap();
        let a = b
            .sparse_of_coo(2, 3, &[(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0)])
            .unwrap();
        let x = b.dense_vector_of_vec(vec![1.0, 2.0, 3.0]).unwrap();
        let y = a.multiply_vector(&x).unwrap();
        assert_eq!(y.at(0), 1.0 + 6.0);
        assert_eq!(y.at(1), 6.0);
    }

    #[test]
    fn test_transpose_multiply_vector_matches_explicit_transpose() {
        let b = builder_for::<f64>().unwrap();
        let a = b
            .sparse_of_coo(2, 3, &[(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0)])
            .unwrap();
        let x = b.dense_vector_of_vec(vec![2.0, 5.0]).unwrap();
        let fast = a.transpose_this_and_multiply_vector(&x).unwrap();
        let slow = a.transpose().unwrap().multiply_vector(&x).unwrap();
        for i in 0..3 {
            assert_eq!(fast.at(i), slow.at(i));
        }
    }

    #[test]
    fn test_multiply_in_place() {
        let b = builder_for::<f64>().unwrap();
        let mut x = b.dense_of_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let expected = x.multiply(&x).unwrap();
        let copy = x.clone();
        x.multiply_in_place(&copy).unwrap();
        assert!(x.value_equals(&expected));
    }
}
