//! Scalar traits for matrix and vector element types.
//!
//! The element types form a closed set: `f32`, `f64`, `Complex32`,
//! `Complex64`. Each supplies the field identities (`zero`, `one`) and the
//! handful of accessors generic arithmetic code depends on. The [`Scalar`]
//! trait is sealed so that representation-dispatch code can rely on the set
//! never growing behind its back.

use num_complex::{Complex32, Complex64};
use num_traits::{Float, One, Zero};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

mod private {
    use num_complex::{Complex32, Complex64};

    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for Complex32 {}
    impl Sealed for Complex64 {}
}

/// Trait for scalar types supported by the engine.
///
/// Bundles the algebraic identities and element accessors required by the
/// generic containers. Implemented exactly for `f32`, `f64`, `Complex32`
/// and `Complex64`; the trait is sealed.
pub trait Scalar:
    Copy
    + Debug
    + Default
    + PartialEq
    + Send
    + Sync
    + 'static
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + private::Sealed
{
    /// The real type associated with this scalar.
    type Real: RealScalar;

    /// Human-readable element type name, used by the builder registry.
    const TYPE_NAME: &'static str;

    /// Complex conjugate (identity for real types).
    fn conjugate(self) -> Self;

    /// Modulus `|z|` (absolute value for real types).
    fn modulus(self) -> Self::Real;

    /// Squared modulus `|z|^2`. Cheaper than `modulus` when the square
    /// root is not needed.
    fn modulus_sqr(self) -> Self::Real;

    /// Real part.
    fn real_part(self) -> Self::Real;

    /// Imaginary part (zero for real types).
    fn imag_part(self) -> Self::Real;

    /// Promote a real value into `Self`.
    fn from_real(r: Self::Real) -> Self;
}

/// Trait for real scalar types (`f32`, `f64`).
///
/// Required by ordered operations: norms return `T::Real`, and the
/// modulus/remainder pointwise operations are defined for real element
/// types only.
pub trait RealScalar: Scalar<Real = Self> + Float + PartialOrd {}

impl<T: Scalar<Real = T> + Float> RealScalar for T {}

macro_rules! impl_scalar_real {
    ($($t:ty => $name:literal),*) => {
        $(
            impl Scalar for $t {
                type Real = $t;

                const TYPE_NAME: &'static str = $name;

                #[inline]
                fn conjugate(self) -> Self {
                    self
                }

                #[inline]
                fn modulus(self) -> $t {
                    Float::abs(self)
                }

                #[inline]
                fn modulus_sqr(self) -> $t {
                    self * self
                }

                #[inline]
                fn real_part(self) -> $t {
                    self
                }

                #[inline]
                fn imag_part(self) -> $t {
                    0.0
                }

                #[inline]
                fn from_real(r: $t) -> $t {
                    r
                }
            }
        )*
    };
}

impl_scalar_real!(f32 => "f32", f64 => "f64");

macro_rules! impl_scalar_complex {
    ($($t:ty, $real:ty => $name:literal),*) => {
        $(
            impl Scalar for $t {
                type Real = $real;

                const TYPE_NAME: &'static str = $name;

                #[inline]
                fn conjugate(self) -> Self {
                    self.conj()
                }

                #[inline]
                fn modulus(self) -> $real {
                    self.norm()
                }

                #[inline]
                fn modulus_sqr(self) -> $real {
                    self.norm_sqr()
                }

                #[inline]
                fn real_part(self) -> $real {
                    self.re
                }

                #[inline]
                fn imag_part(self) -> $real {
                    self.im
                }

                #[inline]
                fn from_real(r: $real) -> Self {
                    Self::new(r, 0.0)
                }
            }
        )*
    };
}

impl_scalar_complex!(Complex32, f32 => "Complex32", Complex64, f64 => "Complex64");
