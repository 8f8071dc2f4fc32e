//! Representation transparency: the same logical operands must produce
//! the same logical results whichever storage representations hold them.

use lineal::prelude::*;

/// A general 3x3 operand in the requested representation.
fn general(kind: StorageKind) -> Matrix<f64> {
    let b = builder_for::<f64>().unwrap();
    let entries = [
        (0, 0, 2.0),
        (0, 2, -1.0),
        (1, 1, 3.0),
        (2, 0, 4.0),
        (2, 2, 5.0),
    ];
    match kind {
        StorageKind::Dense => {
            let mut m = b.dense(3, 3).unwrap();
            for &(r, c, v) in &entries {
                m.set(r, c, v).unwrap();
            }
            m
        }
        StorageKind::Sparse => b.sparse_of_coo(3, 3, &entries).unwrap(),
        StorageKind::Diagonal => unreachable!("general operand has off-diagonal entries"),
    }
}

/// A diagonal-valued 3x3 operand in the requested representation.
fn diagonal_valued(kind: StorageKind) -> Matrix<f64> {
    let b = builder_for::<f64>().unwrap();
    let diag = [1.0, -2.0, 3.0];
    match kind {
        StorageKind::Dense => {
            let mut m = b.dense(3, 3).unwrap();
            for (i, &v) in diag.iter().enumerate() {
                m.set(i, i, v).unwrap();
            }
            m
        }
        StorageKind::Sparse => b
            .sparse_of_coo(3, 3, &[(0, 0, 1.0), (1, 1, -2.0), (2, 2, 3.0)])
            .unwrap(),
        StorageKind::Diagonal => b.diagonal_of_vec(3, 3, diag.to_vec()).unwrap(),
    }
}

fn operands() -> Vec<Matrix<f64>> {
    vec![
        general(StorageKind::Dense),
        general(StorageKind::Sparse),
        diagonal_valued(StorageKind::Dense),
        diagonal_valued(StorageKind::Sparse),
        diagonal_valued(StorageKind::Diagonal),
    ]
}

fn reference_add(a: &Matrix<f64>, b: &Matrix<f64>) -> Vec<Vec<f64>> {
    (0..a.rows())
        .map(|r| (0..a.cols()).map(|c| a.at(r, c) + b.at(r, c)).collect())
        .collect()
}

fn reference_multiply(a: &Matrix<f64>, b: &Matrix<f64>) -> Vec<Vec<f64>> {
    (0..a.rows())
        .map(|r| {
            (0..b.cols())
                .map(|c| (0..a.cols()).map(|k| a.at(r, k) * b.at(k, c)).sum())
                .collect()
        })
        .collect()
}

fn assert_matches(actual: &Matrix<f64>, expected: &[Vec<f64>]) {
    for (r, row) in expected.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            assert_eq!(actual.at(r, c), v, "mismatch at ({r}, {c})");
        }
    }
}

#[test]
fn test_add_agrees_across_all_representation_pairs() {
    for x in operands() {
        for y in operands() {
            let expected = reference_add(&x, &y);
            let sum = x.add(&y).unwrap();
            assert_matches(&sum, &expected);
        }
    }
}

#[test]
fn test_subtract_agrees_across_all_representation_pairs() {
    for x in operands() {
        for y in operands() {
            let diff = x.subtract(&y).unwrap();
            for r in 0..3 {
                for c in 0..3 {
                    assert_eq!(diff.at(r, c), x.at(r, c) - y.at(r, c));
                }
            }
        }
    }
}

#[test]
fn test_multiply_agrees_across_all_representation_pairs() {
    for x in operands() {
        for y in operands() {
            let expected = reference_multiply(&x, &y);
            let product = x.multiply(&y).unwrap();
            assert_matches(&product, &expected);
        }
    }
}

#[test]
fn test_pointwise_multiply_agrees_across_all_representation_pairs() {
    for x in operands() {
        for y in operands() {
            let product = x.pointwise_multiply(&y).unwrap();
            for r in 0..3 {
                for c in 0..3 {
                    assert_eq!(product.at(r, c), x.at(r, c) * y.at(r, c));
                }
            }
        }
    }
}

#[test]
fn test_transpose_round_trip_preserves_values() {
    for x in operands() {
        let back = x.transpose().unwrap().transpose().unwrap();
        assert!(back.value_equals(&x));
    }
}

#[test]
fn test_result_kind_follows_pair_resolution() {
    let dense = general(StorageKind::Dense);
    let sparse = general(StorageKind::Sparse);
    let diag = diagonal_valued(StorageKind::Diagonal);

    assert_eq!(
        dense.add(&sparse).unwrap().storage().kind(),
        StorageKind::Dense
    );
    assert_eq!(
        sparse.add(&diag).unwrap().storage().kind(),
        StorageKind::Sparse
    );
    assert_eq!(
        diag.add(&diag).unwrap().storage().kind(),
        StorageKind::Diagonal
    );
}

#[test]
fn test_in_place_result_reuse_is_alias_safe() {
    // Writing a product into a container that also serves as an operand
    // elsewhere in the expression must not corrupt the computation; the
    // kernels compute into scratch before moving results in.
    let b = builder_for::<f64>().unwrap();
    let x = general(StorageKind::Dense);
    let expected = x.multiply(&x).unwrap();
    let mut result = b.dense(3, 3).unwrap();
    x.multiply_into(&x, &mut result).unwrap();
    assert!(result.value_equals(&expected));

    let mut y = x.clone();
    y.multiply_in_place(&x).unwrap();
    assert!(y.value_equals(&expected));
}

#[test]
fn test_norms_agree_across_representations() {
    use approx::assert_relative_eq;
    let d = general(StorageKind::Dense);
    let s = general(StorageKind::Sparse);
    assert_eq!(d.infinity_norm(), s.infinity_norm());
    assert_eq!(d.l1_norm(), s.l1_norm());
    assert_relative_eq!(
        d.frobenius_norm().unwrap(),
        s.frobenius_norm().unwrap(),
        epsilon = 1e-12
    );
}
