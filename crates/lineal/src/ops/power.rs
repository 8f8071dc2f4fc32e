//! Integer power kernels.

use crate::builder::builder_for;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::scalar::Scalar;

/// Matrix power by binary exponentiation. The caller has already checked
/// squareness.
pub(crate) fn int_power<T: Scalar>(x: &Matrix<T>, exponent: u32) -> Result<Matrix<T>> {
    match exponent {
        0 => builder_for::<T>()?.identity(x.rows()),
        1 => Ok(x.clone()),
        2 => x.multiply(x),
        e if e % 2 == 0 => {
            let half = int_power(x, e / 2)?;
            half.multiply(&half)
        }
        e => {
            let rest = int_power(x, e - 1)?;
            x.multiply(&rest)
        }
    }
}

/// Scalar square-and-multiply, used by elementwise powers.
pub(crate) fn scalar_int_power<T: Scalar>(base: T, exponent: u32) -> T {
    let mut result = T::one();
    let mut base = base;
    let mut e = exponent;
    while e > 0 {
        if e & 1 == 1 {
            result *= base;
        }
        base *= base;
        e >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::builder_for;
    use crate::storage::StorageKind;

    #[test]
    fn test_power_zero_is_identity() {
        let b = builder_for::<f64>().unwrap();
        let m = b.dense_of_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let p = m.power(0).unwrap();
        assert_eq!(p.storage().kind(), StorageKind::Diagonal);
        assert_eq!(p.at(0, 0), 1.0);
        assert_eq!(p.at(0, 1), 0.0);
    }

    #[test]
    fn test_power_one_is_copy() {
        let b = builder_for::<f64>().unwrap();
        let m = b.dense_of_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(m.power(1).unwrap().value_equals(&m));
    }

    #[test]
    fn test_power_matches_repeated_multiplication() {
        let b = builder_for::<f64>().unwrap();
        let m = b.dense_of_vec(2, 2, vec![1.0, 1.0, 1.0, 0.0]).unwrap();
        let mut expected = m.clone();
        for _ in 0..4 {
            expected = expected.multiply(&m).unwrap();
        }
        assert!(m.power(5).unwrap().value_equals(&expected));
    }

    #[test]
    fn test_power_non_square_rejected() {
        use crate::error::Error;
        let b = builder_for::<f64>().unwrap();
        let m = b.dense(2, 3).unwrap();
        assert_eq!(
            m.power(2).unwrap_err(),
            Error::NotSquare { rows: 2, cols: 3 }
        );
    }

    #[test]
    fn test_scalar_int_power() {
        assert_eq!(scalar_int_power(2.0f64, 0), 1.0);
        assert_eq!(scalar_int_power(2.0f64, 10), 1024.0);
        assert_eq!(scalar_int_power(-1.0f64, 3), -1.0);
    }

    #[test]
    fn test_pointwise_power() {
        let b = builder_for::<f64>().unwrap();
        let s = b.sparse_of_coo(2, 2, &[(0, 0, 3.0), (1, 1, 2.0)]).unwrap();
        let sq = s.pointwise_power(2).unwrap();
        assert_eq!(sq.at(0, 0), 9.0);
        assert_eq!(sq.at(1, 1), 4.0);
        assert_eq!(sq.at(0, 1), 0.0);
        let ones = s.pointwise_power(0).unwrap();
        assert_eq!(ones.at(0, 1), 1.0);
    }
}
