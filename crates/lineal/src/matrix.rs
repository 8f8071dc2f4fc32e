//! The generic matrix container.
//!
//! A [`Matrix`] is a shape plus one exclusively-owned [`Storage`]. Every
//! public binary operation follows the same pattern: validate shape
//! compatibility, obtain (or validate) a result container, and delegate to
//! a kernel dispatched on the operands' storage kinds. In-place entry
//! points compute into a scratch container of the result's representation
//! and then move it in, so a result can never be corrupted by reading an
//! operand it is overwriting.

use crate::builder::builder_for;
use crate::error::{Error, Result};
use crate::ops;
use crate::ops::pointwise::Zeros;
use crate::ops::triangular::Triangle;
use crate::scalar::{RealScalar, Scalar};
use crate::storage::{CsrStorage, DenseStorage, DiagonalStorage, Storage, StorageKind};
use crate::vector::Vector;

/// A two-dimensional container over one of the closed set of storage
/// representations (dense, sparse, diagonal).
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: Scalar> {
    storage: Storage<T>,
}

impl<T: Scalar> Matrix<T> {
    /// Wrap a storage in a matrix.
    pub fn of_storage(storage: Storage<T>) -> Self {
        Self { storage }
    }

    /// Row count.
    #[inline]
    pub fn rows(&self) -> usize {
        self.storage.rows()
    }

    /// Column count.
    #[inline]
    pub fn cols(&self) -> usize {
        self.storage.cols()
    }

    /// The shape as `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Borrow the underlying storage.
    #[inline]
    pub fn storage(&self) -> &Storage<T> {
        &self.storage
    }

    /// Mutable access for kernels.
    #[inline]
    pub(crate) fn storage_mut(&mut self) -> &mut Storage<T> {
        &mut self.storage
    }

    /// Consume the matrix and return its storage.
    #[inline]
    pub fn into_storage(self) -> Storage<T> {
        self.storage
    }

    /// Number of stored entries for the sparse representation; `None` for
    /// other representations.
    pub fn nonzero_count(&self) -> Option<usize> {
        self.storage.as_sparse().map(|s| s.nonzero_count())
    }

    /// Element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of bounds.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        assert!(row < self.rows() && col < self.cols(), "index out of bounds");
        self.storage.at(row, col)
    }

    /// Write the element at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for an out-of-range index and
    /// [`Error::OffDiagonalWrite`] for a nonzero off-diagonal write into a
    /// diagonal representation.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() {
            return Err(Error::IndexOutOfBounds {
                index: row,
                bound: self.rows(),
            });
        }
        if col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                index: col,
                bound: self.cols(),
            });
        }
        self.storage.set(row, col, value)
    }

    fn check_same_shape(&self, other: &Self) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }

    fn check_result_shape(&self, result: &Self, expected: (usize, usize)) -> Result<()> {
        if result.shape() != expected {
            return Err(Error::ResultShapeMismatch {
                expected,
                actual: result.shape(),
            });
        }
        Ok(())
    }

    /// Move a computed matrix into this container. Matching
    /// representations hand the storage over; otherwise the computed
    /// entries scatter into the existing representation. A diagonal
    /// container that cannot record a computed off-diagonal entry fails
    /// with [`Error::OffDiagonalWrite`] before the container is touched.
    fn fill_from(&mut self, computed: Self) -> Result<()> {
        if computed.storage.kind() == self.storage.kind() {
            self.storage = computed.storage;
            return Ok(());
        }
        if self.storage.kind() == StorageKind::Diagonal {
            if let Some((row, col, _)) = computed
                .storage
                .iter_stored()
                .find(|&(row, col, value)| row != col && !value.is_zero())
            {
                return Err(Error::OffDiagonalWrite { row, col });
            }
        }
        self.storage.clear();
        for (row, col, value) in computed.storage.iter_stored() {
            if !value.is_zero() {
                self.storage.set(row, col, value)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Additive operations
    // ------------------------------------------------------------------

    /// `self + other`, in a result representation able to hold the union
    /// of both operands' entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] reporting both shapes when the
    /// operands differ in shape.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other)?;
        let builder = builder_for::<T>()?;
        let mut result = builder.same_as_pair(self, other, self.rows(), self.cols(), false)?;
        ops::arithmetic::add_into(self, other, &mut result)?;
        Ok(result)
    }

    /// `self + other` written into a caller-supplied result container.
    pub fn add_into(&self, other: &Self, result: &mut Self) -> Result<()> {
        self.check_same_shape(other)?;
        self.check_result_shape(result, self.shape())?;
        ops::arithmetic::add_into(self, other, result)
    }

    /// `self - other`.
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other)?;
        let builder = builder_for::<T>()?;
        let mut result = builder.same_as_pair(self, other, self.rows(), self.cols(), false)?;
        ops::arithmetic::subtract_into(self, other, &mut result)?;
        Ok(result)
    }

    /// `self - other` written into a caller-supplied result container.
    pub fn subtract_into(&self, other: &Self, result: &mut Self) -> Result<()> {
        self.check_same_shape(other)?;
        self.check_result_shape(result, self.shape())?;
        ops::arithmetic::subtract_into(self, other, result)
    }

    // ------------------------------------------------------------------
    // Scalar operations
    // ------------------------------------------------------------------

    /// `self + scalar` applied to every element. Adding the field's zero
    /// short-circuits to a copy.
    pub fn add_scalar(&self, scalar: T) -> Result<Self> {
        if scalar.is_zero() {
            return Ok(self.clone());
        }
        // f(0) != 0, so zero entries must be materialized.
        self.map(|x| x + scalar, Zeros::Include)
    }

    /// `self - scalar` applied to every element.
    pub fn subtract_scalar(&self, scalar: T) -> Result<Self> {
        if scalar.is_zero() {
            return Ok(self.clone());
        }
        self.map(|x| x - scalar, Zeros::Include)
    }

    /// `self * scalar`. Multiplying by the field's one short-circuits to a
    /// copy; multiplying by zero yields the zero container directly. Both
    /// shortcuts also keep NaN out of degenerate cases.
    pub fn multiply_scalar(&self, scalar: T) -> Result<Self> {
        if scalar == T::one() {
            return Ok(self.clone());
        }
        if scalar.is_zero() {
            let mut zeroed = self.clone();
            zeroed.storage.clear();
            return Ok(zeroed);
        }
        self.map(|x| x * scalar, Zeros::AllowSkip)
    }

    /// `self / scalar`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivideByZero`] when `scalar` is the field's zero.
    pub fn divide_scalar(&self, scalar: T) -> Result<Self> {
        if scalar.is_zero() {
            return Err(Error::DivideByZero);
        }
        if scalar == T::one() {
            return Ok(self.clone());
        }
        self.map(|x| x / scalar, Zeros::AllowSkip)
    }

    /// `self + scalar` written into a caller-supplied result container.
    pub fn add_scalar_into(&self, scalar: T, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.add_scalar(scalar)?)
    }

    /// `self - scalar` written into a caller-supplied result container.
    pub fn subtract_scalar_into(&self, scalar: T, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.subtract_scalar(scalar)?)
    }

    /// `self * scalar` written into a caller-supplied result container.
    pub fn multiply_scalar_into(&self, scalar: T, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.multiply_scalar(scalar)?)
    }

    /// `self / scalar` written into a caller-supplied result container.
    pub fn divide_scalar_into(&self, scalar: T, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.divide_scalar(scalar)?)
    }

    /// `-self`.
    pub fn negate(&self) -> Result<Self> {
        self.map(|x| -x, Zeros::AllowSkip)
    }

    /// `-self` written into a caller-supplied result container.
    pub fn negate_into(&self, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.negate()?)
    }

    /// Elementwise complex conjugate (a copy for real element types).
    pub fn conjugate(&self) -> Result<Self> {
        self.map(|x| x.conjugate(), Zeros::AllowSkip)
    }

    /// Elementwise conjugate written into a caller-supplied result
    /// container.
    pub fn conjugate_into(&self, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.conjugate()?)
    }

    /// Apply `f` to every element. `zeros` states whether `f` maps zero to
    /// zero; when it does, sparse and diagonal representations skip their
    /// unstored entries and the result keeps the source representation.
    /// Otherwise every position is visited and a diagonal source widens to
    /// sparse, which can record the off-diagonal results.
    pub fn map(&self, f: impl Fn(T) -> T, zeros: Zeros) -> Result<Self> {
        let builder = builder_for::<T>()?;
        let fully_mutable = zeros == Zeros::Include;
        let mut result = builder.same_as(self, self.rows(), self.cols(), fully_mutable)?;
        ops::pointwise::map_into(self, &mut result, f, zeros)?;
        Ok(result)
    }

    // ------------------------------------------------------------------
    // Multiplication
    // ------------------------------------------------------------------

    /// Matrix product `self * other`.
    ///
    /// Dispatches to a representation-aware kernel: two-pass symbolic/
    /// numeric CSR multiplication when both operands are sparse, flat-
    /// buffer fast paths for sparse/dense mixes, diagonal scaling for
    /// diagonal operands.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InnerDimensionMismatch`] unless
    /// `self.cols() == other.rows()`.
    ///
    /// # Example
    ///
    /// ```
    /// use lineal::builder_for;
    ///
    /// let b = builder_for::<f64>().unwrap();
    /// let a = b.sparse_of_coo(2, 2, &[(0, 0, 2.0), (0, 1, 3.0), (1, 1, 4.0)]).unwrap();
    /// let i = b.identity(2).unwrap();
    /// let p = a.multiply(&i).unwrap();
    /// assert_eq!(p.at(0, 1), 3.0);
    /// ```
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        self.check_inner_dims(other)?;
        ops::multiply::multiply(self, other)
    }

    /// `self * other` written into a caller-supplied result container.
    ///
    /// The product is always computed into a fresh work container first
    /// and then moved into `result`, so the call is safe even when the
    /// caller reuses containers aggressively.
    pub fn multiply_into(&self, other: &Self, result: &mut Self) -> Result<()> {
        self.check_inner_dims(other)?;
        self.check_result_shape(result, (self.rows(), other.cols()))?;
        result.fill_from(ops::multiply::multiply(self, other)?)
    }

    /// `self * other` replacing `self`, via the scratch-container guard.
    /// Requires a square `other` so the shape is preserved.
    pub fn multiply_in_place(&mut self, other: &Self) -> Result<()> {
        self.check_inner_dims(other)?;
        if other.rows() != other.cols() {
            return Err(Error::NotSquare {
                rows: other.rows(),
                cols: other.cols(),
            });
        }
        let product = ops::multiply::multiply(self, other)?;
        self.storage = product.storage;
        Ok(())
    }

    /// Matrix-vector product `self * x`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] unless `x.len() == self.cols()`.
    pub fn multiply_vector(&self, x: &Vector<T>) -> Result<Vector<T>> {
        if x.len() != self.cols() {
            return Err(Error::LengthMismatch {
                expected: self.cols(),
                actual: x.len(),
            });
        }
        ops::multiply::multiply_vector(self, x)
    }

    /// `self * x` written into a caller-supplied result vector, which
    /// keeps its representation.
    pub fn multiply_vector_into(&self, x: &Vector<T>, result: &mut Vector<T>) -> Result<()> {
        if result.len() != self.rows() {
            return Err(Error::LengthMismatch {
                expected: self.rows(),
                actual: result.len(),
            });
        }
        let computed = self.multiply_vector(x)?;
        for i in 0..computed.len() {
            result.set(i, computed.at(i))?;
        }
        Ok(())
    }

    /// `self * otherᵀ`.
    pub fn transpose_and_multiply(&self, other: &Self) -> Result<Self> {
        if self.cols() != other.cols() {
            return Err(Error::InnerDimensionMismatch {
                left: self.shape(),
                right: (other.cols(), other.rows()),
            });
        }
        let transposed = other.transpose()?;
        ops::multiply::multiply(self, &transposed)
    }

    /// `selfᵀ * other`.
    pub fn transpose_this_and_multiply(&self, other: &Self) -> Result<Self> {
        if self.rows() != other.rows() {
            return Err(Error::InnerDimensionMismatch {
                left: (self.cols(), self.rows()),
                right: other.shape(),
            });
        }
        let transposed = self.transpose()?;
        ops::multiply::multiply(&transposed, other)
    }

    /// `self * otherᵀ` written into a caller-supplied result container.
    pub fn transpose_and_multiply_into(&self, other: &Self, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, (self.rows(), other.rows()))?;
        result.fill_from(self.transpose_and_multiply(other)?)
    }

    /// `selfᵀ * other` written into a caller-supplied result container.
    pub fn transpose_this_and_multiply_into(&self, other: &Self, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, (self.cols(), other.cols()))?;
        result.fill_from(self.transpose_this_and_multiply(other)?)
    }

    /// `selfᵀ * x` without materializing the transpose for the sparse
    /// representation.
    pub fn transpose_this_and_multiply_vector(&self, x: &Vector<T>) -> Result<Vector<T>> {
        if x.len() != self.rows() {
            return Err(Error::LengthMismatch {
                expected: self.rows(),
                actual: x.len(),
            });
        }
        ops::multiply::transpose_multiply_vector(self, x)
    }

    /// `selfᵀ * x` written into a caller-supplied result vector, which
    /// keeps its representation.
    pub fn transpose_this_and_multiply_vector_into(
        &self,
        x: &Vector<T>,
        result: &mut Vector<T>,
    ) -> Result<()> {
        if result.len() != self.cols() {
            return Err(Error::LengthMismatch {
                expected: self.cols(),
                actual: result.len(),
            });
        }
        let computed = self.transpose_this_and_multiply_vector(x)?;
        for i in 0..computed.len() {
            result.set(i, computed.at(i))?;
        }
        Ok(())
    }

    /// Integer matrix power by binary exponentiation. Exponent 0 yields
    /// the identity, 1 a copy, 2 a single multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSquare`] for a non-square base.
    pub fn power(&self, exponent: u32) -> Result<Self> {
        if self.rows() != self.cols() {
            return Err(Error::NotSquare {
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        ops::power::int_power(self, exponent)
    }

    /// Integer matrix power written into a caller-supplied result
    /// container.
    pub fn power_into(&self, exponent: u32, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.power(exponent)?)
    }

    fn check_inner_dims(&self, other: &Self) -> Result<()> {
        if self.cols() != other.rows() {
            return Err(Error::InnerDimensionMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Pointwise operations
    // ------------------------------------------------------------------

    /// Elementwise product `self .* other`.
    pub fn pointwise_multiply(&self, other: &Self) -> Result<Self> {
        self.pointwise(other, |x, y| x * y, Zeros::AllowSkip)
    }

    /// Elementwise product written into a caller-supplied result
    /// container.
    pub fn pointwise_multiply_into(&self, other: &Self, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.pointwise_multiply(other)?)
    }

    /// Elementwise quotient `self ./ other`. Divisor zeros are included
    /// in the traversal so they produce the element type's own inf/NaN
    /// semantics rather than an error.
    pub fn pointwise_divide(&self, other: &Self) -> Result<Self> {
        self.pointwise(other, |x, y| x / y, Zeros::Include)
    }

    /// Elementwise quotient written into a caller-supplied result
    /// container.
    pub fn pointwise_divide_into(&self, other: &Self, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.pointwise_divide(other)?)
    }

    /// Elementwise integer power by scalar square-and-multiply.
    pub fn pointwise_power(&self, exponent: u32) -> Result<Self> {
        if exponent == 0 {
            // x^0 == 1 everywhere, including stored and unstored zeros.
            return self.map(|_| T::one(), Zeros::Include);
        }
        self.map(|x| ops::power::scalar_int_power(x, exponent), Zeros::AllowSkip)
    }

    /// Elementwise integer power written into a caller-supplied result
    /// container.
    pub fn pointwise_power_into(&self, exponent: u32, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.pointwise_power(exponent)?)
    }

    fn pointwise(
        &self,
        other: &Self,
        f: impl Fn(T, T) -> T,
        zeros: Zeros,
    ) -> Result<Self> {
        self.check_same_shape(other)?;
        let builder = builder_for::<T>()?;
        let fully_mutable = zeros == Zeros::Include;
        let mut result =
            builder.same_as_pair(self, other, self.rows(), self.cols(), fully_mutable)?;
        ops::pointwise::map2_into(self, other, &mut result, f, zeros)?;
        Ok(result)
    }

    // ------------------------------------------------------------------
    // Transposition
    // ------------------------------------------------------------------

    /// The transpose, in the same representation (CSR transposes via a
    /// counting pass over stored entries).
    pub fn transpose(&self) -> Result<Self> {
        let storage = match &self.storage {
            Storage::Dense(d) => Storage::Dense(DenseStorage::of_init(
                d.cols(),
                d.rows(),
                |row, col| d.at(col, row),
            )?),
            Storage::Sparse(s) => Storage::Sparse(s.transpose()),
            Storage::Diagonal(d) => Storage::Diagonal(DiagonalStorage::of_vec(
                d.cols(),
                d.rows(),
                d.as_slice().to_vec(),
            )?),
        };
        Ok(Self::of_storage(storage))
    }

    /// The transpose written into a caller-supplied result container.
    pub fn transpose_into(&self, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, (self.cols(), self.rows()))?;
        result.fill_from(self.transpose()?)
    }

    /// The conjugate transpose.
    pub fn conjugate_transpose(&self) -> Result<Self> {
        self.transpose()?.conjugate()
    }

    /// The conjugate transpose written into a caller-supplied result
    /// container.
    pub fn conjugate_transpose_into(&self, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, (self.cols(), self.rows()))?;
        result.fill_from(self.conjugate_transpose()?)
    }

    // ------------------------------------------------------------------
    // Triangular extraction
    // ------------------------------------------------------------------

    /// Entries on or below the diagonal.
    pub fn lower_triangle(&self) -> Result<Self> {
        ops::triangular::triangle(self, Triangle::Lower)
    }

    /// Entries on or above the diagonal.
    pub fn upper_triangle(&self) -> Result<Self> {
        ops::triangular::triangle(self, Triangle::Upper)
    }

    /// Entries strictly below the diagonal.
    pub fn strictly_lower_triangle(&self) -> Result<Self> {
        ops::triangular::triangle(self, Triangle::StrictLower)
    }

    /// Entries strictly above the diagonal.
    pub fn strictly_upper_triangle(&self) -> Result<Self> {
        ops::triangular::triangle(self, Triangle::StrictUpper)
    }

    /// Lower triangle written into a caller-supplied result container.
    pub fn lower_triangle_into(&self, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.lower_triangle()?)
    }

    /// Upper triangle written into a caller-supplied result container.
    pub fn upper_triangle_into(&self, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.upper_triangle()?)
    }

    /// Strict lower triangle written into a caller-supplied result
    /// container.
    pub fn strictly_lower_triangle_into(&self, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.strictly_lower_triangle()?)
    }

    /// Strict upper triangle written into a caller-supplied result
    /// container.
    pub fn strictly_upper_triangle_into(&self, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.strictly_upper_triangle()?)
    }

    // ------------------------------------------------------------------
    // Norms and predicates
    // ------------------------------------------------------------------

    /// Maximum absolute row sum.
    pub fn infinity_norm(&self) -> T::Real {
        ops::norm::infinity_norm(self)
    }

    /// Maximum absolute column sum.
    pub fn l1_norm(&self) -> T::Real {
        ops::norm::l1_norm(self)
    }

    /// The Frobenius norm. The sparse representation computes it from the
    /// diagonal of `A * Aᴴ` through the sparse multiplication fast path.
    pub fn frobenius_norm(&self) -> Result<T::Real> {
        ops::norm::frobenius_norm(self)
    }

    /// Whether the matrix equals its transpose. `false` for any non-square
    /// shape; early-exits on the first mismatched pair.
    pub fn is_symmetric(&self) -> bool {
        if self.rows() != self.cols() {
            return false;
        }
        self.storage
            .iter_stored()
            .all(|(row, col, value)| value == self.storage.at(col, row))
    }

    /// Whether the matrix equals its conjugate transpose.
    pub fn is_hermitian(&self) -> bool {
        if self.rows() != self.cols() {
            return false;
        }
        self.storage
            .iter_stored()
            .all(|(row, col, value)| value == self.storage.at(col, row).conjugate())
    }

    /// Whether every logical element of `self` equals the corresponding
    /// element of `other`, regardless of representation.
    pub fn value_equals(&self, other: &Self) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                if self.storage.at(row, col) != other.storage.at(row, col) {
                    return false;
                }
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Representation conversion
    // ------------------------------------------------------------------

    /// Copy into a dense representation.
    pub fn to_dense(&self) -> Result<Self> {
        let mut dense = DenseStorage::zeros(self.rows(), self.cols())?;
        for (row, col, value) in self.storage.iter_stored() {
            dense.set(row, col, value);
        }
        Ok(Self::of_storage(Storage::Dense(dense)))
    }

    /// Copy into a sparse representation, dropping zero entries.
    pub fn to_sparse(&self) -> Result<Self> {
        let mut sparse = CsrStorage::zeros(self.rows(), self.cols())?;
        for (row, col, value) in self.storage.iter_stored() {
            if !value.is_zero() {
                sparse.set(row, col, value);
            }
        }
        Ok(Self::of_storage(Storage::Sparse(sparse)))
    }
}

impl<T: RealScalar> Matrix<T> {
    /// Elementwise canonical modulus by a scalar divisor (result carries
    /// the sign of the divisor). The sparse path maps stored values only
    /// when the divisor is nonzero; a zero divisor forces the full
    /// traversal so unstored zeros also yield NaN, matching the dense
    /// path.
    pub fn pointwise_modulus(&self, divisor: T) -> Result<Self> {
        let zeros = if divisor.is_zero() {
            Zeros::Include
        } else {
            Zeros::AllowSkip
        };
        self.map(move |x| ((x % divisor) + divisor) % divisor, zeros)
    }

    /// Elementwise canonical modulus written into a caller-supplied
    /// result container.
    pub fn pointwise_modulus_into(&self, divisor: T, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.pointwise_modulus(divisor)?)
    }

    /// Elementwise remainder by a scalar divisor (result carries the sign
    /// of the dividend). Same divisor-zero handling as
    /// [`pointwise_modulus`](Self::pointwise_modulus).
    pub fn pointwise_remainder(&self, divisor: T) -> Result<Self> {
        let zeros = if divisor.is_zero() {
            Zeros::Include
        } else {
            Zeros::AllowSkip
        };
        self.map(move |x| x % divisor, zeros)
    }

    /// Elementwise remainder written into a caller-supplied result
    /// container.
    pub fn pointwise_remainder_into(&self, divisor: T, result: &mut Self) -> Result<()> {
        self.check_result_shape(result, self.shape())?;
        result.fill_from(self.pointwise_remainder(divisor)?)
    }
}
