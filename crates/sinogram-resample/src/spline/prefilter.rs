//! Interpolating prefilter for cubic B-splines.
//!
//! Evaluating a cubic B-spline at integer node `k` gives
//! `(c[k-1] + 4 c[k] + c[k+1]) / 6`, with out-of-range coefficients mirrored.
//! That is a tridiagonal system `B c = y`; fitting solves it and the push
//! path solves the transposed system `B^T c = y`.

use rayon::prelude::*;

/// Solve `B c = values` in place along one line.
pub fn cubic_fit_line(values: &mut [f64]) {
    let (sub, diag, sup) = cubic_system(values.len());
    solve_tridiagonal(&sub, &diag, &sup, values);
}

/// Solve `B^T c = values` in place along one line.
pub fn cubic_fit_line_transposed(values: &mut [f64]) {
    let (sub, diag, sup) = cubic_system(values.len());
    solve_tridiagonal(&sup, &diag, &sub, values);
}

/// Sub-diagonal, diagonal and super-diagonal of `B` for `n` samples.
fn cubic_system(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    if n <= 1 {
        return (Vec::new(), vec![1.0; n], Vec::new());
    }
    let diag = vec![4.0 / 6.0; n];
    let mut sub = vec![1.0 / 6.0; n - 1];
    let mut sup = vec![1.0 / 6.0; n - 1];
    // mirrored neighbours fold onto the second sample at each end
    sup[0] = 2.0 / 6.0;
    sub[n - 2] = 2.0 / 6.0;
    (sub, diag, sup)
}

/// Thomas algorithm. `sub[i]` is `A[i+1][i]`, `sup[i]` is `A[i][i+1]`.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &mut [f64]) {
    let n = rhs.len();
    if n == 0 {
        return;
    }

    let mut c_prime = vec![0.0; n];
    let mut denom = diag[0];
    rhs[0] /= denom;
    for i in 1..n {
        c_prime[i - 1] = sup[i - 1] / denom;
        denom = diag[i] - sub[i - 1] * c_prime[i - 1];
        rhs[i] = (rhs[i] - sub[i - 1] * rhs[i - 1]) / denom;
    }
    for i in (0..n - 1).rev() {
        rhs[i] -= c_prime[i] * rhs[i + 1];
    }
}

/// Apply `line_op` to every line of a row-major `shape` buffer along `axis`.
pub(crate) fn apply_along_axis<F>(buffer: &mut [f64], shape: [usize; 3], axis: usize, line_op: F)
where
    F: Fn(&mut [f64]) + Sync,
{
    let [na, nv, nt] = shape;
    if buffer.is_empty() {
        return;
    }
    let plane_len = nv * nt;

    match axis {
        2 => buffer.par_chunks_mut(nt).for_each(|line| line_op(line)),
        1 => buffer.par_chunks_mut(plane_len).for_each(|plane| {
            let mut line = vec![0.0; nv];
            for t in 0..nt {
                for v in 0..nv {
                    line[v] = plane[v * nt + t];
                }
                line_op(&mut line);
                for v in 0..nv {
                    plane[v * nt + t] = line[v];
                }
            }
        }),
        _ => {
            let mut line = vec![0.0; na];
            for offset in 0..plane_len {
                for a in 0..na {
                    line[a] = buffer[a * plane_len + offset];
                }
                line_op(&mut line);
                for a in 0..na {
                    buffer[a * plane_len + offset] = line[a];
                }
            }
        }
    }
}
