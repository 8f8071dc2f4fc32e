//! Triangular extraction kernels.
//!
//! Each extraction returns a new matrix in the source's representation.
//! The CSR path filters each compressed row in one pass; columns stay
//! sorted, so no normalization is needed.

use crate::error::Result;
use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::storage::{CsrStorage, DenseStorage, DiagonalStorage, Storage};

/// Which part of the matrix to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Triangle {
    Lower,
    Upper,
    StrictLower,
    StrictUpper,
}

impl Triangle {
    #[inline]
    fn keeps(self, row: usize, col: usize) -> bool {
        match self {
            Triangle::Lower => col <= row,
            Triangle::Upper => col >= row,
            Triangle::StrictLower => col < row,
            Triangle::StrictUpper => col > row,
        }
    }

    #[inline]
    fn keeps_diagonal(self) -> bool {
        matches!(self, Triangle::Lower | Triangle::Upper)
    }
}

pub(crate) fn triangle<T: Scalar>(m: &Matrix<T>, part: Triangle) -> Result<Matrix<T>> {
    let storage = match m.storage() {
        Storage::Dense(d) => Storage::Dense(DenseStorage::of_init(
            d.rows(),
            d.cols(),
            |row, col| {
                if part.keeps(row, col) {
                    d.at(row, col)
                } else {
                    T::zero()
                }
            },
        )?),
        Storage::Sparse(s) => Storage::Sparse(filter_csr(s, part)),
        Storage::Diagonal(d) => {
            if part.keeps_diagonal() {
                Storage::Diagonal(d.clone())
            } else {
                Storage::Diagonal(DiagonalStorage::zeros(d.rows(), d.cols())?)
            }
        }
    };
    Ok(Matrix::of_storage(storage))
}

fn filter_csr<T: Scalar>(s: &CsrStorage<T>, part: Triangle) -> CsrStorage<T> {
    let rows = s.rows();
    let mut row_pointers = Vec::with_capacity(rows + 1);
    row_pointers.push(0);
    let mut column_indices = Vec::new();
    let mut values = Vec::new();
    for row in 0..rows {
        let (cols, vals) = s.row_entries(row);
        for (&col, &val) in cols.iter().zip(vals) {
            if part.keeps(row, col) {
                column_indices.push(col);
                values.push(val);
            }
        }
        row_pointers.push(values.len());
    }
    CsrStorage::from_parts(rows, s.cols(), row_pointers, column_indices, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::builder_for;
    use crate::storage::StorageKind;

    fn dense_3x3() -> Matrix<f64> {
        builder_for::<f64>()
            .unwrap()
            .dense_of_init(3, 3, |r, c| (r * 3 + c + 1) as f64)
            .unwrap()
    }

    #[test]
    fn test_lower_triangle_dense() {
        let m = dense_3x3();
        let l = m.lower_triangle().unwrap();
        for r in 0..3 {
            for c in 0..3 {
                let expected = if c <= r { m.at(r, c) } else { 0.0 };
                assert_eq!(l.at(r, c), expected);
            }
        }
    }

    #[test]
    fn test_strict_triangles_are_disjoint() {
        let m = dense_3x3();
        let sl = m.strictly_lower_triangle().unwrap();
        let su = m.strictly_upper_triangle().unwrap();
        for r in 0..3 {
            for c in 0..3 {
                assert!(sl.at(r, c) == 0.0 || su.at(r, c) == 0.0);
                if r == c {
                    assert_eq!(sl.at(r, c), 0.0);
                    assert_eq!(su.at(r, c), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_lower_plus_strict_upper_reconstructs() {
        let m = dense_3x3();
        let reconstructed = m
            .lower_triangle()
            .unwrap()
            .add(&m.strictly_upper_triangle().unwrap())
            .unwrap();
        assert!(reconstructed.value_equals(&m));
    }

    #[test]
    fn test_sparse_filter_preserves_representation() {
        let b = builder_for::<f64>().unwrap();
        let s = b
            .sparse_of_coo(
                3,
                3,
                &[(0, 2, 1.0), (1, 1, 2.0), (2, 0, 3.0), (2, 2, 4.0)],
            )
            .unwrap();
        let u = s.upper_triangle().unwrap();
        assert_eq!(u.storage().kind(), StorageKind::Sparse);
        assert_eq!(u.nonzero_count(), Some(3));
        assert_eq!(u.at(0, 2), 1.0);
        assert_eq!(u.at(1, 1), 2.0);
        assert_eq!(u.at(2, 2), 4.0);
        assert_eq!(u.at(2, 0), 0.0);
    }

    #[test]
    fn test_diagonal_triangles() {
        let b = builder_for::<f64>().unwrap();
        let d = b.diagonal_of_value(3, 3, 5.0).unwrap();
        let l = d.lower_triangle().unwrap();
        assert!(l.value_equals(&d));
        let sl = d.strictly_lower_triangle().unwrap();
        assert_eq!(sl.storage().kind(), StorageKind::Diagonal);
        for i in 0..3 {
            assert_eq!(sl.at(i, i), 0.0);
        }
    }

    #[test]
    fn test_rectangular_triangle() {
        let b = builder_for::<f64>().unwrap();
        let m = b.dense_of_value(2, 4, 1.0).unwrap();
        let u = m.upper_triangle().unwrap();
        assert_eq!(u.at(1, 0), 0.0);
        assert_eq!(u.at(1, 3), 1.0);
    }
}
