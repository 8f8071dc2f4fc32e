//! The generic vector container.
//!
//! A [`Vector`] holds its elements either as a dense buffer or as parallel
//! sorted index/value arrays. The arithmetic surface mirrors the matrix
//! one at a smaller scale: validate lengths, pick the result
//! representation, delegate to a kernel on the operand pair.

use crate::error::{Error, Result};
use crate::scalar::Scalar;
use num_traits::{Float, Zero};

/// Backing data of a vector.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorStorage<T: Scalar> {
    /// One element per logical position.
    Dense(Vec<T>),
    /// Parallel arrays of strictly increasing indices and their values.
    Sparse {
        /// Stored positions, strictly increasing.
        indices: Vec<usize>,
        /// Values at the stored positions.
        values: Vec<T>,
    },
}

/// A one-dimensional container with dense or sparse backing.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T: Scalar> {
    len: usize,
    storage: VectorStorage<T>,
}

impl<T: Scalar> Vector<T> {
    /// Zero-initialized dense vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyLength`] for a zero length.
    pub fn dense(len: usize) -> Result<Self> {
        check_len(len)?;
        Ok(Self {
            len,
            storage: VectorStorage::Dense(vec![T::zero(); len]),
        })
    }

    /// Dense vector binding directly to a caller-supplied buffer (taken
    /// by move, not copied).
    pub fn dense_of_vec(data: Vec<T>) -> Result<Self> {
        check_len(data.len())?;
        Ok(Self {
            len: data.len(),
            storage: VectorStorage::Dense(data),
        })
    }

    /// Sparse vector with no stored entries.
    pub fn sparse(len: usize) -> Result<Self> {
        check_len(len)?;
        Ok(Self {
            len,
            storage: VectorStorage::Sparse {
                indices: Vec::new(),
                values: Vec::new(),
            },
        })
    }

    /// Sparse vector from `(index, value)` pairs. Duplicate indices
    /// accumulate by summation; explicitly supplied zeros are stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for an index at or past `len`,
    /// [`Error::EmptyLength`] for a zero length.
    pub fn sparse_of_indexed(len: usize, entries: &[(usize, T)]) -> Result<Self> {
        check_len(len)?;
        for &(index, _) in entries {
            if index >= len {
                return Err(Error::IndexOutOfBounds { index, bound: len });
            }
        }
        let mut sorted: Vec<(usize, T)> = entries.to_vec();
        sorted.sort_by_key(|&(index, _)| index);
        let mut indices = Vec::with_capacity(sorted.len());
        let mut values: Vec<T> = Vec::with_capacity(sorted.len());
        for (index, value) in sorted {
            if indices.last() == Some(&index) {
                let last = values.len() - 1;
                values[last] += value;
            } else {
                indices.push(index);
                values.push(value);
            }
        }
        Ok(Self {
            len,
            storage: VectorStorage::Sparse { indices, values },
        })
    }

    pub(crate) fn from_parts(len: usize, storage: VectorStorage<T>) -> Self {
        Self { len, storage }
    }

    /// Number of logical elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; zero-length vectors cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the backing data.
    #[inline]
    pub fn storage(&self) -> &VectorStorage<T> {
        &self.storage
    }

    /// Number of stored entries for the sparse representation; `None` for
    /// dense.
    pub fn nonzero_count(&self) -> Option<usize> {
        match &self.storage {
            VectorStorage::Dense(_) => None,
            VectorStorage::Sparse { values, .. } => Some(values.len()),
        }
    }

    /// Element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn at(&self, index: usize) -> T {
        assert!(index < self.len, "index out of bounds");
        match &self.storage {
            VectorStorage::Dense(data) => data[index],
            VectorStorage::Sparse { indices, values } => match indices.binary_search(&index) {
                Ok(pos) => values[pos],
                Err(_) => T::zero(),
            },
        }
    }

    /// Write the element at `index`. On the sparse representation a zero
    /// removes an existing entry, a nonzero overwrites or inserts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for an out-of-range index.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        if index >= self.len {
            return Err(Error::IndexOutOfBounds {
                index,
                bound: self.len,
            });
        }
        match &mut self.storage {
            VectorStorage::Dense(data) => data[index] = value,
            VectorStorage::Sparse { indices, values } => match indices.binary_search(&index) {
                Ok(pos) => {
                    if value.is_zero() {
                        indices.remove(pos);
                        values.remove(pos);
                    } else {
                        values[pos] = value;
                    }
                }
                Err(pos) => {
                    if !value.is_zero() {
                        indices.insert(pos, index);
                        values.insert(pos, value);
                    }
                }
            },
        }
        Ok(())
    }

    /// Iterate the stored entries as `(index, value)` pairs. Dense
    /// storage yields every position.
    pub fn iter_stored(&self) -> Box<dyn Iterator<Item = (usize, T)> + '_> {
        match &self.storage {
            VectorStorage::Dense(data) => {
                Box::new(data.iter().copied().enumerate())
            }
            VectorStorage::Sparse { indices, values } => Box::new(
                indices
                    .iter()
                    .copied()
                    .zip(values.iter().copied()),
            ),
        }
    }

    fn check_same_len(&self, other: &Self) -> Result<()> {
        if self.len != other.len {
            return Err(Error::LengthMismatch {
                expected: self.len,
                actual: other.len,
            });
        }
        Ok(())
    }

    fn both_sparse(&self, other: &Self) -> bool {
        matches!(
            (&self.storage, &other.storage),
            (VectorStorage::Sparse { .. }, VectorStorage::Sparse { .. })
        )
    }

    /// Merge two sparse operands positionwise with `f`, zero substituted
    /// for the absent side; exact-zero results are dropped.
    fn merge_sparse(&self, other: &Self, f: impl Fn(T, T) -> T) -> Self {
        let mut indices = Vec::new();
        let mut values = Vec::new();
        let mut lhs = self.iter_stored().peekable();
        let mut rhs = other.iter_stored().peekable();
        loop {
            let entry = match (lhs.peek().copied(), rhs.peek().copied()) {
                (None, None) => break,
                (Some((i, a)), None) => {
                    lhs.next();
                    (i, f(a, T::zero()))
                }
                (None, Some((j, b))) => {
                    rhs.next();
                    (j, f(T::zero(), b))
                }
                (Some((i, a)), Some((j, b))) => {
                    if i < j {
                        lhs.next();
                        (i, f(a, T::zero()))
                    } else if j < i {
                        rhs.next();
                        (j, f(T::zero(), b))
                    } else {
                        lhs.next();
                        rhs.next();
                        (i, f(a, b))
                    }
                }
            };
            if !entry.1.is_zero() {
                indices.push(entry.0);
                values.push(entry.1);
            }
        }
        Self {
            len: self.len,
            storage: VectorStorage::Sparse { indices, values },
        }
    }

    fn combine(&self, other: &Self, f: impl Fn(T, T) -> T) -> Result<Self> {
        self.check_same_len(other)?;
        if self.both_sparse(other) {
            return Ok(self.merge_sparse(other, f));
        }
        let data = (0..self.len)
            .map(|i| f(self.at(i), other.at(i)))
            .collect();
        Self::dense_of_vec(data)
    }

    /// `self + other`; sparse when both operands are sparse, dense
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] when the lengths differ.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.combine(other, |a, b| a + b)
    }

    /// `self - other`.
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.combine(other, |a, b| a - b)
    }

    /// Elementwise product.
    pub fn pointwise_multiply(&self, other: &Self) -> Result<Self> {
        self.combine(other, |a, b| a * b)
    }

    /// Elementwise quotient, with the element type's own inf/NaN
    /// semantics for zero divisors.
    pub fn pointwise_divide(&self, other: &Self) -> Result<Self> {
        self.check_same_len(other)?;
        // Unstored divisor zeros must surface, so always go dense.
        let data = (0..self.len)
            .map(|i| self.at(i) / other.at(i))
            .collect();
        Self::dense_of_vec(data)
    }

    /// Apply `f` to every stored value, keeping the representation.
    /// Requires `f(0) == 0` for the sparse representation to stay honest.
    fn map_stored(&self, f: impl Fn(T) -> T) -> Self {
        let storage = match &self.storage {
            VectorStorage::Dense(data) => {
                VectorStorage::Dense(data.iter().map(|&v| f(v)).collect())
            }
            VectorStorage::Sparse { indices, values } => VectorStorage::Sparse {
                indices: indices.clone(),
                values: values.iter().map(|&v| f(v)).collect(),
            },
        };
        Self {
            len: self.len,
            storage,
        }
    }

    /// `self + scalar` applied to every element. Adding the field's zero
    /// short-circuits to a copy; otherwise every position is visited, so
    /// the result is dense.
    pub fn add_scalar(&self, scalar: T) -> Self {
        if scalar.is_zero() {
            return self.clone();
        }
        let data = (0..self.len).map(|i| self.at(i) + scalar).collect();
        Self {
            len: self.len,
            storage: VectorStorage::Dense(data),
        }
    }

    /// `self - scalar` applied to every element.
    pub fn subtract_scalar(&self, scalar: T) -> Self {
        if scalar.is_zero() {
            return self.clone();
        }
        let data = (0..self.len).map(|i| self.at(i) - scalar).collect();
        Self {
            len: self.len,
            storage: VectorStorage::Dense(data),
        }
    }

    /// `self * scalar`, with identity and zero short-circuits.
    pub fn multiply_scalar(&self, scalar: T) -> Self {
        if scalar == T::one() {
            return self.clone();
        }
        if scalar.is_zero() {
            let mut zeroed = self.clone();
            match &mut zeroed.storage {
                VectorStorage::Dense(data) => data.iter_mut().for_each(|v| *v = T::zero()),
                VectorStorage::Sparse { indices, values } => {
                    indices.clear();
                    values.clear();
                }
            }
            return zeroed;
        }
        self.map_stored(|v| v * scalar)
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
        Ok(self.map_stored(|v| v / scalar))
    }

    /// `-self`.
    pub fn negate(&self) -> Self {
        self.map_stored(|v| -v)
    }

    /// Elementwise complex conjugate.
    pub fn conjugate(&self) -> Self {
        self.map_stored(|v| v.conjugate())
    }

    /// Dot product `sum(self[i] * other[i])`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] when the lengths differ.
    pub fn dot(&self, other: &Self) -> Result<T> {
        self.check_same_len(other)?;
        let mut acc = T::zero();
        // Walking the sparser side skips everything it does not store.
        if matches!(self.storage, VectorStorage::Sparse { .. }) {
            for (i, v) in self.iter_stored() {
                acc += v * other.at(i);
            }
        } else {
            for (i, v) in other.iter_stored() {
                acc += self.at(i) * v;
            }
        }
        Ok(acc)
    }

    /// Conjugate dot product `sum(self[i] * conj(other[i]))`.
    pub fn conjugate_dot(&self, other: &Self) -> Result<T> {
        self.check_same_len(other)?;
        let mut acc = T::zero();
        if matches!(self.storage, VectorStorage::Sparse { .. }) {
            for (i, v) in self.iter_stored() {
                acc += v * other.at(i).conjugate();
            }
        } else {
            for (i, v) in other.iter_stored() {
                acc += self.at(i) * v.conjugate();
            }
        }
        Ok(acc)
    }

    /// Sum of all elements.
    pub fn sum(&self) -> T {
        self.iter_stored()
            .fold(T::zero(), |acc, (_, v)| acc + v)
    }

    /// Sum of absolute values.
    pub fn l1_norm(&self) -> T::Real {
        self.iter_stored()
            .fold(<T::Real as Zero>::zero(), |acc, (_, v)| acc + v.modulus())
    }

    /// Euclidean norm.
    pub fn l2_norm(&self) -> T::Real {
        self.iter_stored()
            .fold(<T::Real as Zero>::zero(), |acc, (_, v)| {
                acc + v.modulus_sqr()
            })
            .sqrt()
    }

    /// Largest absolute value.
    pub fn infinity_norm(&self) -> T::Real {
        self.iter_stored()
            .fold(<T::Real as Zero>::zero(), |acc, (_, v)| {
                acc.max(v.modulus())
            })
    }

    /// Outer product `self * other^T`, as a matrix of shape
    /// `self.len() x other.len()`. Sparse when both operands are sparse,
    /// dense otherwise.
    pub fn outer_product(&self, other: &Self) -> Result<crate::Matrix<T>> {
        use crate::storage::{CsrStorage, DenseStorage, Storage};
        if self.both_sparse(other) {
            let mut out = CsrStorage::zeros(self.len, other.len)?;
            for (row, a) in self.iter_stored() {
                for (col, b) in other.iter_stored() {
                    let product = a * b;
                    if !product.is_zero() {
                        out.set(row, col, product);
                    }
                }
            }
            return Ok(crate::Matrix::of_storage(Storage::Sparse(out)));
        }
        let dense = DenseStorage::of_init(self.len, other.len, |row, col| {
            self.at(row) * other.at(col)
        })?;
        Ok(crate::Matrix::of_storage(Storage::Dense(dense)))
    }

    /// Whether every logical element equals the corresponding element of
    /// `other`, regardless of representation.
    pub fn value_equals(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        (0..self.len).all(|i| self.at(i) == other.at(i))
    }
}

fn check_len(len: usize) -> Result<()> {
    if len == 0 {
        return Err(Error::EmptyLength);
    }
    Ok(())
}
