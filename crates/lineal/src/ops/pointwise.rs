//! Pointwise map kernels.
//!
//! A single pair of kernels backs every elementwise operation: `map_into`
//! for unary functions and `map2_into` for binary ones. The caller states
//! whether the function maps zero to zero via [`Zeros`]; when it does,
//! sparse and diagonal representations traverse only their stored entries.

use crate::error::Result;
use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::storage::{Storage, StorageKind};

/// Whether a pointwise function preserves zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zeros {
    /// `f(0) == 0` (and `f(0, 0) == 0` for binary maps), so unstored
    /// entries of sparse and diagonal representations can be skipped.
    AllowSkip,
    /// The function may map zero to a nonzero value; every logical
    /// position must be visited.
    Include,
}

pub(crate) fn map_into<T: Scalar>(
    a: &Matrix<T>,
    result: &mut Matrix<T>,
    f: impl Fn(T) -> T,
    zeros: Zeros,
) -> Result<()> {
    match (a.storage(), result.storage().kind()) {
        // Dense visits every cell either way.
        (Storage::Dense(d), StorageKind::Dense) => {
            let mut out = d.clone();
            for x in out.as_mut_slice() {
                *x = f(*x);
            }
            *result.storage_mut() = Storage::Dense(out);
            Ok(())
        }
        (Storage::Sparse(s), StorageKind::Sparse) if zeros == Zeros::AllowSkip => {
            let mut out = s.clone();
            for x in out.values_mut() {
                *x = f(*x);
            }
            *result.storage_mut() = Storage::Sparse(out);
            Ok(())
        }
        (Storage::Diagonal(d), StorageKind::Diagonal) if zeros == Zeros::AllowSkip => {
            let mut out = d.clone();
            for x in out.as_mut_slice() {
                *x = f(*x);
            }
            *result.storage_mut() = Storage::Diagonal(out);
            Ok(())
        }
        (_, kind) => {
            let mut scratch = Storage::zeros_of_kind(kind, a.rows(), a.cols())?;
            match zeros {
                Zeros::AllowSkip => {
                    for (row, col, value) in a.storage().iter_stored() {
                        scratch.set(row, col, f(value))?;
                    }
                }
                Zeros::Include => {
                    for col in 0..a.cols() {
                        for row in 0..a.rows() {
                            scratch.set(row, col, f(a.storage().at(row, col)))?;
                        }
                    }
                }
            }
            *result.storage_mut() = scratch;
            Ok(())
        }
    }
}

pub(crate) fn map2_into<T: Scalar>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    result: &mut Matrix<T>,
    f: impl Fn(T, T) -> T,
    zeros: Zeros,
) -> Result<()> {
    match (a.storage(), b.storage(), result.storage().kind()) {
        (Storage::Dense(x), Storage::Dense(y), StorageKind::Dense) => {
            let mut out = x.clone();
            for (o, &v) in out.as_mut_slice().iter_mut().zip(y.as_slice()) {
                *o = f(*o, v);
            }
            *result.storage_mut() = Storage::Dense(out);
            Ok(())
        }
        (Storage::Sparse(x), Storage::Sparse(y), StorageKind::Sparse)
            if zeros == Zeros::AllowSkip =>
        {
            *result.storage_mut() =
                Storage::Sparse(super::arithmetic::merge_sparse(x, y, |av, bv| f(av, bv)));
            Ok(())
        }
        (Storage::Diagonal(x), Storage::Diagonal(y), StorageKind::Diagonal)
            if zeros == Zeros::AllowSkip =>
        {
            let mut out = x.clone();
            for (o, &v) in out.as_mut_slice().iter_mut().zip(y.as_slice()) {
                *o = f(*o, v);
            }
            *result.storage_mut() = Storage::Diagonal(out);
            Ok(())
        }
        (_, _, kind) => {
            // Mixed representations have no aligned buffers to walk, so
            // visit every logical position.
            let mut scratch = Storage::zeros_of_kind(kind, a.rows(), a.cols())?;
            for col in 0..a.cols() {
                for row in 0..a.rows() {
                    let value = f(a.storage().at(row, col), b.storage().at(row, col));
                    if !value.is_zero() {
                        scratch.set(row, col, value)?;
                    }
                }
            }
            *result.storage_mut() = scratch;
            Ok(())
        }
    }
}
