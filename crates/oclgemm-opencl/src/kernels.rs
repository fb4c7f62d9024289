//! Embedded OpenCL C kernel source.
//!
//! The constant holds the full source for the matrix multiply entry point,
//! compiled at runtime via `clCreateProgramWithSource`. It mirrors
//! `kernels/matrix_multiply.cl`, which the CLI loads from disk by default;
//! the embedded copy lets tests and benches run without a filesystem path.

/// Name of the kernel entry point, consistent across build and resolve.
pub const MATMUL_ENTRY_POINT: &str = "matrix_multiply";

/// OpenCL C source for the dense f32 matrix multiply kernel.
///
/// One work item per output element; each accumulates its cell in a single
/// scalar over the full reduction dimension. The bounds guard permits global
/// work sizes rounded up to a work-group multiple.
pub const MATMUL_SOURCE: &str = r#"
/* Dense f32 matrix multiply: C = A * B.
 * A is (m x k), B is (k x n), C is (m x n), all row-major.
 * One work item per output element; the bounds guard allows the
 * global work size to be rounded up to a work-group multiple.
 */
__kernel void matrix_multiply(
    __global const float* a,
    __global const float* b,
    __global float*       c,
    const uint m,
    const uint n,
    const uint k)
{
    const uint i = get_global_id(0);
    const uint j = get_global_id(1);
    if (i >= m || j >= n) return;

    float acc = 0.0f;
    for (uint p = 0; p < k; ++p) {
        acc += a[i * k + p] * b[p * n + j];
    }
    c[i * n + j] = acc;
}
"#;
