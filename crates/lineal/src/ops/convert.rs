//! Element-type conversions between the supported scalar types.
//!
//! Conversions preserve the storage representation: a sparse matrix keeps
//! its compressed structure and only maps the stored values, which is
//! valid because every conversion here maps zero to zero.

use crate::error::Result;
use crate::matrix::Matrix;
use crate::scalar::Scalar;
use crate::storage::{CsrStorage, DenseStorage, DiagonalStorage, Storage};
use crate::vector::{Vector, VectorStorage};
use num_complex::{Complex32, Complex64};

fn map_convert<S: Scalar, D: Scalar>(
    m: &Matrix<S>,
    f: impl Fn(S) -> D,
) -> Result<Matrix<D>> {
    let storage = match m.storage() {
        Storage::Dense(d) => Storage::Dense(DenseStorage::of_vec(
            d.rows(),
            d.cols(),
            d.as_slice().iter().map(|&v| f(v)).collect(),
        )?),
        Storage::Sparse(s) => Storage::Sparse(CsrStorage::from_parts(
            s.rows(),
            s.cols(),
            s.row_pointers().to_vec(),
            s.column_indices().to_vec(),
            s.values().iter().map(|&v| f(v)).collect(),
        )),
        Storage::Diagonal(d) => Storage::Diagonal(DiagonalStorage::of_vec(
            d.rows(),
            d.cols(),
            d.as_slice().iter().map(|&v| f(v)).collect(),
        )?),
    };
    Ok(Matrix::of_storage(storage))
}

fn map_convert_vector<S: Scalar, D: Scalar>(v: &Vector<S>, f: impl Fn(S) -> D) -> Vector<D> {
    let storage = match v.storage() {
        VectorStorage::Dense(data) => {
            VectorStorage::Dense(data.iter().map(|&x| f(x)).collect())
        }
        VectorStorage::Sparse { indices, values } => VectorStorage::Sparse {
            indices: indices.clone(),
            values: values.iter().map(|&x| f(x)).collect(),
        },
    };
    Vector::from_parts(v.len(), storage)
}

impl Matrix<f32> {
    /// Widen to `f64` elements.
    pub fn to_double(&self) -> Result<Matrix<f64>> {
        map_convert(self, f64::from)
    }

    /// Promote to `Complex32` elements with zero imaginary parts.
    pub fn to_complex32(&self) -> Result<Matrix<Complex32>> {
        map_convert(self, |v| Complex32::new(v, 0.0))
    }

    /// Promote to `Complex64` elements with zero imaginary parts.
    pub fn to_complex64(&self) -> Result<Matrix<Complex64>> {
        map_convert(self, |v| Complex64::new(f64::from(v), 0.0))
    }
}

impl Matrix<f64> {
    /// Narrow to `f32` elements (lossy).
    pub fn to_single(&self) -> Result<Matrix<f32>> {
        map_convert(self, |v| v as f32)
    }

    /// Promote to `Complex32` elements with zero imaginary parts (lossy).
    pub fn to_complex32(&self) -> Result<Matrix<Complex32>> {
        map_convert(self, |v| Complex32::new(v as f32, 0.0))
    }

    /// Promote to `Complex64` elements with zero imaginary parts.
    pub fn to_complex64(&self) -> Result<Matrix<Complex64>> {
        map_convert(self, |v| Complex64::new(v, 0.0))
    }
}

impl Matrix<Complex32> {
    /// Widen to `Complex64` elements.
    pub fn to_complex64(&self) -> Result<Matrix<Complex64>> {
        map_convert(self, |v| Complex64::new(f64::from(v.re), f64::from(v.im)))
    }

    /// The real parts, as an `f32` matrix.
    pub fn real(&self) -> Result<Matrix<f32>> {
        map_convert(self, |v| v.re)
    }

    /// The imaginary parts, as an `f32` matrix.
    pub fn imaginary(&self) -> Result<Matrix<f32>> {
        map_convert(self, |v| v.im)
    }
}

impl Matrix<Complex64> {
    /// Narrow to `Complex32` elements (lossy).
    pub fn to_complex32(&self) -> Result<Matrix<Complex32>> {
        map_convert(self, |v| Complex32::new(v.re as f32, v.im as f32))
    }

    /// The real parts, as an `f64` matrix.
    pub fn real(&self) -> Result<Matrix<f64>> {
        map_convert(self, |v| v.re)
    }

    /// The imaginary parts, as an `f64` matrix.
    pub fn imaginary(&self) -> Result<Matrix<f64>> {
        map_convert(self, |v| v.im)
    }
}

impl Vector<f32> {
    /// Widen to `f64` elements.
    pub fn to_double(&self) -> Vector<f64> {
        map_convert_vector(self, f64::from)
    }

    /// Promote to `Complex32` elements with zero imaginary parts.
    pub fn to_complex32(&self) -> Vector<Complex32> {
        map_convert_vector(self, |v| Complex32::new(v, 0.0))
    }

    /// Promote to `Complex64` elements with zero imaginary parts.
    pub fn to_complex64(&self) -> Vector<Complex64> {
        map_convert_vector(self, |v| Complex64::new(f64::from(v), 0.0))
    }
}

impl Vector<f64> {
    /// Narrow to `f32` elements (lossy).
    pub fn to_single(&self) -> Vector<f32> {
        map_convert_vector(self, |v| v as f32)
    }

    /// Promote to `Complex32` elements with zero imaginary parts (lossy).
    pub fn to_complex32(&self) -> Vector<Complex32> {
        map_convert_vector(self, |v| Complex32::new(v as f32, 0.0))
    }

    /// Promote to `Complex64` elements with zero imaginary parts.
    pub fn to_complex64(&self) -> Vector<Complex64> {
        map_convert_vector(self, |v| Complex64::new(v, 0.0))
    }
}

impl Vector<Complex32> {
    /// Widen to `Complex64` elements.
    pub fn to_complex64(&self) -> Vector<Complex64> {
        map_convert_vector(self, |v| Complex64::new(f64::from(v.re), f64::from(v.im)))
    }

    /// The real parts, as an `f32` vector.
    pub fn real(&self) -> Vector<f32> {
        map_convert_vector(self, |v| v.re)
    }

    /// The imaginary parts, as an `f32` vector.
    pub fn imaginary(&self) -> Vector<f32> {
        map_convert_vector(self, |v| v.im)
    }
}

impl Vector<Complex64> {
    /// Narrow to `Complex32` elements (lossy).
    pub fn to_complex32(&self) -> Vector<Complex32> {
        map_convert_vector(self, |v| Complex32::new(v.re as f32, v.im as f32))
    }

    /// The real parts, as an `f64` vector.
    pub fn real(&self) -> Vector<f64> {
        map_convert_vector(self, |v| v.re)
    }

    /// The imaginary parts, as an `f64` vector.
    pub fn imaginary(&self) -> Vector<f64> {
        map_convert_vector(self, |v| v.im)
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::builder_for;
    use crate::storage::StorageKind;
    use num_complex::Complex64;

    #[test]
    fn test_widen_preserves_values() {
        let b = builder_for::<f32>().unwrap();
        let m = b.dense_of_vec(2, 2, vec![1.5, 2.5, 3.5, 4.5]).unwrap();
        let d = m.to_double().unwrap();
        assert_eq!(d.at(0, 0), 1.5);
        assert_eq!(d.at(1, 1), 4.5);
    }

    #[test]
    fn test_sparse_conversion_keeps_structure() {
        let b = builder_for::<f64>().unwrap();
        let s = b.sparse_of_coo(2, 3, &[(0, 1, 2.0), (1, 2, 3.0)]).unwrap();
        let c = s.to_complex64().unwrap();
        assert_eq!(c.storage().kind(), StorageKind::Sparse);
        assert_eq!(c.nonzero_count(), Some(2));
        assert_eq!(c.at(0, 1), Complex64::new(2.0, 0.0));
    }

    #[test]
    fn test_real_imaginary_split() {
        let b = builder_for::<Complex64>().unwrap();
        let m = b
            .dense_of_vec(1, 2, vec![Complex64::new(1.0, 2.0), Complex64::new(3.0, -4.0)])
            .unwrap();
        let re = m.real().unwrap();
        let im = m.imaginary().unwrap();
        assert_eq!(re.at(0, 0), 1.0);
        assert_eq!(re.at(0, 1), 3.0);
        assert_eq!(im.at(0, 0), 2.0);
        assert_eq!(im.at(0, 1), -4.0);
    }

    #[test]
    fn test_diagonal_conversion_stays_diagonal() {
        let b = builder_for::<f32>().unwrap();
        let d = b.diagonal_of_vec(3, 3, vec![1.0, 2.0, 3.0]).unwrap();
        let wide = d.to_double().unwrap();
        assert_eq!(wide.storage().kind(), StorageKind::Diagonal);
        assert_eq!(wide.at(2, 2), 3.0);
    }

    #[test]
    fn test_vector_sparse_conversion_keeps_structure() {
        let b = builder_for::<f64>().unwrap();
        let v = b.sparse_vector_of_indexed(4, &[(1, 2.0), (3, -1.0)]).unwrap();
        let c = v.to_complex64();
        assert_eq!(c.nonzero_count(), Some(2));
        assert_eq!(c.at(1), Complex64::new(2.0, 0.0));
        assert_eq!(c.at(0), Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_vector_real_imaginary_split() {
        let b = builder_for::<Complex64>().unwrap();
        let v = b
            .dense_vector_of_vec(vec![Complex64::new(1.0, 2.0), Complex64::new(3.0, -4.0)])
            .unwrap();
        let re = v.real();
        let im = v.imaginary();
        assert_eq!(re.at(0), 1.0);
        assert_eq!(re.at(1), 3.0);
        assert_eq!(im.at(0), 2.0);
        assert_eq!(im.at(1), -4.0);
    }

    #[test]
    fn test_vector_widen_narrow_round_trip() {
        let b = builder_for::<f32>().unwrap();
        let v = b.dense_vector_of_vec(vec![1.5f32, -2.25]).unwrap();
        let back = v.to_double().to_single();
        assert!(back.value_equals(&v));
    }

    #[test]
    fn test_round_trip_single_double() {
        let b = builder_for::<f64>().unwrap();
        let m = b.dense_of_vec(1, 2, vec![0.5, -2.25]).unwrap();
        let back = m.to_single().unwrap().to_double().unwrap();
        assert!(back.value_equals(&m));
    }
}
