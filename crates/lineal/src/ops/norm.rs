//! Matrix norm kernels.

use crate::error::Result;
use crate::matrix::Matrix;
use crate::scalar::{RealScalar, Scalar};
use crate::storage::Storage;
use num_traits::{Float, Zero};

/// Maximum absolute row sum. Stored-entry traversal covers every
/// representation; unstored entries contribute nothing.
pub(crate) fn infinity_norm<T: Scalar>(m: &Matrix<T>) -> T::Real {
    let mut row_sums = vec![<T::Real as Zero>::zero(); m.rows()];
    for (row, _, value) in m.storage().iter_stored() {
        row_sums[row] = row_sums[row] + value.modulus();
    }
    max_of(&row_sums)
}

/// Maximum absolute column sum.
pub(crate) fn l1_norm<T: Scalar>(m: &Matrix<T>) -> T::Real {
    let mut col_sums = vec![<T::Real as Zero>::zero(); m.cols()];
    for (_, col, value) in m.storage().iter_stored() {
        col_sums[col] = col_sums[col] + value.modulus();
    }
    max_of(&col_sums)
}

/// The Frobenius norm.
///
/// Dense and diagonal representations sum squared moduli directly. The
/// sparse representation goes through the sparse multiplication kernel:
/// the diagonal of `A * A^H` holds each row's squared-modulus sum, so the
/// norm is the square root of the diagonal's total.
pub(crate) fn frobenius_norm<T: Scalar>(m: &Matrix<T>) -> Result<T::Real> {
    let sum_sq = match m.storage() {
        Storage::Dense(d) => sum_modulus_sqr(d.as_slice()),
        Storage::Diagonal(d) => sum_modulus_sqr(d.as_slice()),
        Storage::Sparse(_) => {
            let product = m.multiply(&m.conjugate_transpose()?)?;
            let mut total = <T::Real as Zero>::zero();
            for i in 0..product.rows() {
                total = total + product.at(i, i).real_part();
            }
            total
        }
    };
    Ok(sum_sq.sqrt())
}

fn sum_modulus_sqr<T: Scalar>(values: &[T]) -> T::Real {
    values
        .iter()
        .fold(<T::Real as Zero>::zero(), |acc, v| acc + v.modulus_sqr())
}

fn max_of<R: RealScalar>(values: &[R]) -> R {
    values.iter().copied().fold(R::zero(), |a, b| a.max(b))
}
