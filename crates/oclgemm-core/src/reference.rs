//! Sequential CPU reference multiply and result comparison.
//!
//! The reference path is the ground-truth oracle for device results and the
//! timing baseline. It accumulates each output cell in a single `f32` scalar
//! with ascending k, matching the device kernel's summation order, so the two
//! paths agree up to floating-point rounding of an identical operation
//! sequence. For identical inputs the reference output is bit-identical
//! across runs.

use crate::matrix::{matmul_dims, DimensionError, Matrix};

/// Default relative tolerance for device/host result comparison.
pub const DEFAULT_REL_TOLERANCE: f32 = 1e-4;

/// `C = A * B` on the host. A is (m x k), B is (k x n), C is (m x n).
pub fn matmul(a: &Matrix, b: &Matrix) -> Result<Matrix, DimensionError> {
    let dims = matmul_dims(a, b)?;
    let mut c = Matrix::zeros(dims.m, dims.n);
    matmul_into(a.as_slice(), b.as_slice(), c.as_mut_slice(), dims.m, dims.n, dims.k);
    Ok(c)
}

/// Raw-slice variant for pre-validated, pre-allocated buffers.
pub fn matmul_into(a: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize) {
    assert_eq!(a.len(), m * k, "A dimensions mismatch");
    assert_eq!(b.len(), k * n, "B dimensions mismatch");
    assert_eq!(c.len(), m * n, "C dimensions mismatch");

    for i in 0..m {
        for j in 0..n {
            let mut acc = 0.0f32;
            for p in 0..k {
                acc += a[i * k + p] * b[p * n + j];
            }
            c[i * n + j] = acc;
        }
    }
}

/// Largest element-wise relative error between `expected` and `actual`.
///
/// The denominator is clamped to 1.0 so near-zero expected values compare by
/// absolute error instead of blowing up. Panics if lengths differ.
pub fn max_relative_error(expected: &[f32], actual: &[f32]) -> f32 {
    assert_eq!(expected.len(), actual.len(), "comparison length mismatch");
    expected
        .iter()
        .zip(actual)
        .map(|(&e, &a)| (e - a).abs() / e.abs().max(1.0))
        .fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_3x3() {
        let a = Matrix::sequential(3, 3);
        let b = Matrix::sequential(3, 3);
        let c = matmul(&a, &b).unwrap();
        // Hand-computed: [1 2 3; 4 5 6; 7 8 9]^2
        assert_eq!(
            c.as_slice(),
            &[30.0, 36.0, 42.0, 66.0, 81.0, 96.0, 102.0, 126.0, 150.0]
        );
    }

    #[test]
    fn zero_operand_yields_zero_result() {
        let a = Matrix::zeros(4, 3);
        let b = Matrix::sequential(3, 5);
        let c = matmul(&a, &b).unwrap();
        assert!(c.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn right_identity_preserves_left_operand() {
        let a = Matrix::random(5, 5, 11);
        let c = matmul(&a, &Matrix::identity(5)).unwrap();
        assert_eq!(c, a);
    }

    #[test]
    fn left_identity_preserves_right_operand() {
        let b = Matrix::random(4, 4, 12);
        let c = matmul(&Matrix::identity(4), &b).unwrap();
        assert_eq!(c, b);
    }

    #[test]
    fn non_square_shapes() {
        let a = Matrix::from_vec(2, 3, vec![1.0, 0.0, 2.0, 0.0, 3.0, 1.0]).unwrap();
        let b = Matrix::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let c = matmul(&a, &b).unwrap();
        assert_eq!(c.rows(), 2);
        assert_eq!(c.cols(), 2);
        assert_eq!(c.as_slice(), &[11.0, 14.0, 14.0, 18.0]);
    }

    #[test]
    fn incompatible_operands_rejected() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        assert!(matmul(&a, &b).is_err());
    }

    #[test]
    fn deterministic_across_runs() {
        let a = Matrix::sequential(16, 16);
        let b = Matrix::sequential(16, 16);
        let first = matmul(&a, &b).unwrap();
        let second = matmul(&a, &b).unwrap();
        // Bit-identical, not merely within tolerance.
        assert_eq!(first.as_slice(), second.as_slice());
    }

    #[test]
    fn max_relative_error_zero_for_identical() {
        let x = [1.0, -2.0, 3.5];
        assert_eq!(max_relative_error(&x, &x), 0.0);
    }

    #[test]
    fn max_relative_error_picks_worst_element() {
        let expected = [100.0, 10.0];
        let actual = [100.0, 11.0];
        let err = max_relative_error(&expected, &actual);
        assert!((err - 0.1).abs() < 1e-6);
    }

    #[test]
    fn max_relative_error_near_zero_uses_absolute() {
        // Denominator clamps at 1.0, so a 1e-5 absolute slip stays 1e-5.
        let err = max_relative_error(&[0.0], &[1e-5]);
        assert!((err - 1e-5).abs() < 1e-9);
    }
}
