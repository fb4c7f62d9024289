//! Row-major f32 matrix with explicit dimensions.
//!
//! The buffer-length invariant (`data.len() == rows * cols`) is enforced by
//! every constructor, so downstream code can index without re-checking.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Errors from matrix construction and operand pairing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DimensionError {
    /// The backing buffer does not match the declared shape.
    #[error("buffer of {len} elements does not match a {rows}x{cols} matrix")]
    BufferLength { rows: usize, cols: usize, len: usize },
    /// The operands cannot be multiplied.
    #[error(
        "incompatible operands: left is {left_rows}x{left_cols}, right is \
         {right_rows}x{right_cols} (left columns must equal right rows)"
    )]
    Incompatible {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },
}

/// Dimensions of a `C = A * B` multiplication: A is (m x k), B is (k x n),
/// C is (m x n).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemmDims {
    pub m: usize,
    pub n: usize,
    pub k: usize,
}

/// A dense row-major matrix of `f32` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// A zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Wrap an existing buffer, validating the length invariant.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, DimensionError> {
        if data.len() != rows * cols {
            return Err(DimensionError::BufferLength { rows, cols, len: data.len() });
        }
        Ok(Self { rows, cols, data })
    }

    /// Sequential fill: element `i` (in row-major order) holds `i + 1`.
    ///
    /// This is the deterministic fixture pattern used by the reproducibility
    /// tests. Values lose integer precision past 2^24 elements, which is fine
    /// for a fixture as long as both execution paths see the same data.
    pub fn sequential(rows: usize, cols: usize) -> Self {
        let data = (0..rows * cols).map(|i| (i + 1) as f32).collect();
        Self { rows, cols, data }
    }

    /// Seeded random fill in `[-1, 1)`.
    pub fn random(rows: usize, cols: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let data = (0..rows * cols).map(|_| rng.random_range(-1.0..1.0)).collect();
        Self { rows, cols, data }
    }

    /// An identity matrix of the given order.
    pub fn identity(order: usize) -> Self {
        let mut m = Self::zeros(order, order);
        for i in 0..order {
            m.data[i * order + i] = 1.0;
        }
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total element count (`rows * cols`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Element at (row, col). Panics on out-of-range indices.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(row < self.rows && col < self.cols, "index out of range");
        self.data[row * self.cols + col]
    }
}

/// Validate that `a * b` is well-formed and return the GEMM dimensions.
///
/// This is the dimension-mismatch gate the pipeline runs before touching any
/// device resource.
pub fn matmul_dims(a: &Matrix, b: &Matrix) -> Result<GemmDims, DimensionError> {
    if a.cols() != b.rows() {
        return Err(DimensionError::Incompatible {
            left_rows: a.rows(),
            left_cols: a.cols(),
            right_rows: b.rows(),
            right_cols: b.cols(),
        });
    }
    Ok(GemmDims { m: a.rows(), n: b.cols(), k: a.cols() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_has_correct_shape_and_length() {
        let m = Matrix::zeros(3, 5);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 5);
        assert_eq!(m.len(), 15);
        assert!(m.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn from_vec_accepts_matching_length() {
        let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.get(1, 0), 3.0);
    }

    #[test]
    fn from_vec_rejects_length_mismatch() {
        let err = Matrix::from_vec(2, 3, vec![0.0; 5]).unwrap_err();
        assert_eq!(err, DimensionError::BufferLength { rows: 2, cols: 3, len: 5 });
    }

    #[test]
    fn sequential_starts_at_one() {
        let m = Matrix::sequential(2, 2);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn random_is_deterministic_for_fixed_seed() {
        let a = Matrix::random(4, 4, 42);
        let b = Matrix::random(4, 4, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn random_differs_across_seeds() {
        let a = Matrix::random(4, 4, 1);
        let b = Matrix::random(4, 4, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn random_values_in_range() {
        let m = Matrix::random(8, 8, 7);
        assert!(m.as_slice().iter().all(|&v| (-1.0..1.0).contains(&v)));
    }

    #[test]
    fn identity_diagonal() {
        let m = Matrix::identity(3);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m.get(i, j), if i == j { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn matmul_dims_compatible() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(3, 4);
        assert_eq!(matmul_dims(&a, &b).unwrap(), GemmDims { m: 2, n: 4, k: 3 });
    }

    #[test]
    fn matmul_dims_incompatible() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(4, 2);
        let err = matmul_dims(&a, &b).unwrap_err();
        assert_eq!(
            err,
            DimensionError::Incompatible {
                left_rows: 2,
                left_cols: 3,
                right_rows: 4,
                right_cols: 2,
            }
        );
    }

    #[test]
    fn dimension_error_display_names_all_dims() {
        let err = DimensionError::Incompatible {
            left_rows: 2,
            left_cols: 3,
            right_rows: 4,
            right_cols: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("2x3"));
        assert!(msg.contains("4x5"));
    }
}
