//! Property tests for the host reference multiply.

use oclgemm_core::{matmul_dims, reference, Matrix};
use proptest::prelude::*;

fn dims() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..16, 1usize..16, 1usize..16)
}

proptest! {
    #[test]
    fn zero_left_operand_gives_zero_result((m, n, k) in dims()) {
        let a = Matrix::zeros(m, k);
        let b = Matrix::random(k, n, 3);
        let c = reference::matmul(&a, &b).unwrap();
        prop_assert!(c.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn right_identity_is_a_no_op((m, k) in (1usize..16, 1usize..16)) {
        let a = Matrix::random(m, k, 4);
        let c = reference::matmul(&a, &Matrix::identity(k)).unwrap();
        prop_assert_eq!(c, a);
    }

    #[test]
    fn output_shape_matches_operands((m, n, k) in dims()) {
        let a = Matrix::random(m, k, 5);
        let b = Matrix::random(k, n, 6);
        let dims = matmul_dims(&a, &b).unwrap();
        let c = reference::matmul(&a, &b).unwrap();
        prop_assert_eq!(c.rows(), dims.m);
        prop_assert_eq!(c.cols(), dims.n);
        prop_assert_eq!(c.len(), dims.m * dims.n);
    }

    #[test]
    fn mismatched_inner_dims_rejected((m, n, k) in dims()) {
        let a = Matrix::zeros(m, k);
        let b = Matrix::zeros(k + 1, n);
        prop_assert!(reference::matmul(&a, &b).is_err());
    }
}
