//! Tridiagonal QR eigendecomposition with implicit (Wilkinson) shift.
//!
//! Computes the eigenvalues, and optionally eigenvectors, of a symmetric
//! tridiagonal matrix. The quadrature builder only needs the first row of
//! the eigenvector matrix, which this implementation can restrict itself
//! to for an O(n) per-rotation cost.
//!
//! References: Wilkinson & Reinsch, *Linear Algebra* (Handbook for
//! Automatic Computation, vol. II); *Numerical Recipes in C*, 2nd ed.

use alo_core::{ensure, errors::Result, Real, Size};

/// How much of the eigenvector matrix to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EigenVectorCalculation {
    /// Full eigenvector matrix.
    WithEigenVector,
    /// Eigenvalues only.
    WithoutEigenVector,
    /// Only the first row of the eigenvector matrix (sufficient for
    /// Golub-Welsch quadrature weights).
    OnlyFirstRowEigenVector,
}

/// Shift strategy used to accelerate convergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftStrategy {
    /// Plain QR without shifts.
    NoShift,
    /// Wilkinson shift scaled by 1.25 on the last row.
    Overrelaxation,
    /// Wilkinson shift (closest eigenvalue of the trailing 2x2 block).
    CloseEigenValue,
}

/// Eigendecomposition of a symmetric tridiagonal matrix.
#[derive(Debug, Clone)]
pub struct TqrEigenDecomposition {
    d: Vec<Real>,
    // Row-major; `ev_rows` rows of n columns each.
    ev: Vec<Real>,
    ev_rows: Size,
    iterations: Size,
}

impl TqrEigenDecomposition {
    /// Decompose the symmetric tridiagonal matrix with diagonal `diag` and
    /// sub-diagonal `sub` (`sub.len() == diag.len() - 1`).
    pub fn new(
        diag: &[Real],
        sub: &[Real],
        calc: EigenVectorCalculation,
        strategy: ShiftStrategy,
    ) -> Result<Self> {
        let n = diag.len();
        ensure!(
            n == sub.len() + 1,
            "wrong dimensions for diagonal and sub-diagonal arrays: {} vs {}",
            n,
            sub.len()
        );

        let mut d = diag.to_vec();
        let ev_rows = match calc {
            EigenVectorCalculation::WithEigenVector => n,
            EigenVectorCalculation::WithoutEigenVector => 0,
            EigenVectorCalculation::OnlyFirstRowEigenVector => 1,
        };
        let mut ev = vec![0.0; ev_rows * n];
        for i in 0..ev_rows {
            ev[i * n + i] = 1.0;
        }

        // e[i] holds the sub-diagonal element below row i-1; e[0] is unused.
        let mut e = vec![0.0; n];
        e[1..n].copy_from_slice(sub);

        let mut iterations = 0;

        for k in (1..n).rev() {
            while !off_diag_is_zero(&d, &e, k) {
                let mut l = k;
                while l > 0 {
                    l -= 1;
                    if l == 0 || off_diag_is_zero(&d, &e, l) {
                        break;
                    }
                }
                iterations += 1;

                let mut q = d[l];
                if strategy != ShiftStrategy::NoShift {
                    // Eigenvalue of the trailing 2x2 block closest to d[k].
                    let t1 = (0.25 * (d[k] * d[k] + d[k - 1] * d[k - 1])
                        - 0.5 * d[k - 1] * d[k]
                        + e[k] * e[k])
                        .sqrt();
                    let t2 = 0.5 * (d[k] + d[k - 1]);

                    let lambda = if (t2 + t1 - d[k]).abs() < (t2 - t1 - d[k]).abs() {
                        t2 + t1
                    } else {
                        t2 - t1
                    };

                    match strategy {
                        ShiftStrategy::CloseEigenValue => q -= lambda,
                        _ => q -= if k == n - 1 { 1.25 } else { 1.0 } * lambda,
                    }
                }

                // The QR transformation
                let mut sine = 1.0;
                let mut cosine = 1.0;
                let mut u = 0.0;
                let mut recover_underflow = false;

                for i in l + 1..=k {
                    if recover_underflow {
                        break;
                    }
                    let h = cosine * e[i];
                    let p = sine * e[i];

                    e[i - 1] = (p * p + q * q).sqrt();
                    if e[i - 1] != 0.0 {
                        sine = p / e[i - 1];
                        cosine = q / e[i - 1];

                        let g = d[i - 1] - u;
                        let t = (d[i] - g) * sine + 2.0 * cosine * h;

                        u = sine * t;
                        d[i - 1] = g + u;
                        q = cosine * t - h;

                        for j in 0..ev_rows {
                            let tmp = ev[j * n + (i - 1)];
                            ev[j * n + (i - 1)] = sine * ev[j * n + i] + cosine * tmp;
                            ev[j * n + i] = cosine * ev[j * n + i] - sine * tmp;
                        }
                    } else {
                        d[i - 1] -= u;
                        e[l] = 0.0;
                        recover_underflow = true;
                    }
                }

                if !recover_underflow {
                    d[k] -= u;
                    e[k] = q;
                    e[l] = 0.0;
                }
            }
        }

        sort_descending(&mut d, &mut ev, ev_rows);

        Ok(Self {
            d,
            ev,
            ev_rows,
            iterations,
        })
    }

    /// Eigenvalues sorted in descending order.
    pub fn eigenvalues(&self) -> &[Real] {
        &self.d
    }

    /// Element `(row, col)` of the eigenvector matrix; column `col` is the
    /// eigenvector paired with `eigenvalues()[col]`.
    pub fn eigenvector(&self, row: Size, col: Size) -> Real {
        debug_assert!(row < self.ev_rows);
        self.ev[row * self.d.len() + col]
    }

    /// Number of QR iterations performed.
    pub fn iterations(&self) -> Size {
        self.iterations
    }
}

/// Precision trick from NR: `e[k]` counts as zero once adding it to the
/// absolute values of its diagonal neighbours no longer changes the sum.
#[inline]
fn off_diag_is_zero(d: &[Real], e: &[Real], k: Size) -> bool {
    (d[k - 1].abs() + d[k].abs()) == (d[k - 1].abs() + d[k].abs() + e[k].abs())
}

fn sort_descending(d: &mut [Real], ev: &mut [Real], ev_rows: Size) {
    let n = d.len();
    let mut order: Vec<Size> = (0..n).collect();
    order.sort_by(|&a, &b| d[b].partial_cmp(&d[a]).unwrap_or(std::cmp::Ordering::Equal));

    let old_d = d.to_vec();
    let old_ev = ev.to_vec();
    for (i, &src) in order.iter().enumerate() {
        d[i] = old_d[src];
        if ev_rows > 0 {
            // Normalize the sign so the first component is non-negative.
            let sign = if old_ev[src] < 0.0 { -1.0 } else { 1.0 };
            for j in 0..ev_rows {
                ev[j * n + i] = sign * old_ev[j * n + src];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_by_two_eigenvalues() {
        // [[2, 1], [1, 2]] has eigenvalues 3 and 1
        let tqr = TqrEigenDecomposition::new(
            &[2.0, 2.0],
            &[1.0],
            EigenVectorCalculation::WithEigenVector,
            ShiftStrategy::CloseEigenValue,
        )
        .unwrap();
        let ev = tqr.eigenvalues();
        assert!((ev[0] - 3.0).abs() < 1e-12, "got {ev:?}");
        assert!((ev[1] - 1.0).abs() < 1e-12, "got {ev:?}");
    }

    #[test]
    fn three_by_three_trace_preserved() {
        let diag = [1.0, 5.0, 3.0];
        let sub = [0.5, 0.25];
        let tqr = TqrEigenDecomposition::new(
            &diag,
            &sub,
            EigenVectorCalculation::WithoutEigenVector,
            ShiftStrategy::Overrelaxation,
        )
        .unwrap();
        let sum: Real = tqr.eigenvalues().iter().sum();
        assert!((sum - 9.0).abs() < 1e-12, "trace not preserved: {sum}");
        // descending order
        let ev = tqr.eigenvalues();
        assert!(ev[0] >= ev[1] && ev[1] >= ev[2]);
    }

    #[test]
    fn first_row_squares_sum_to_one() {
        // Rows of an orthogonal matrix have unit norm.
        let diag = [0.0, 0.0, 0.0, 0.0];
        let sub = [0.5_f64.sqrt(), 1.0_f64.sqrt(), 1.5_f64.sqrt()];
        let tqr = TqrEigenDecomposition::new(
            &diag,
            &sub,
            EigenVectorCalculation::OnlyFirstRowEigenVector,
            ShiftStrategy::Overrelaxation,
        )
        .unwrap();
        let sum: Real = (0..4).map(|i| tqr.eigenvector(0, i).powi(2)).sum();
        assert!((sum - 1.0).abs() < 1e-12, "got {sum}");
    }

    #[test]
    fn dimension_mismatch_rejected() {
        assert!(TqrEigenDecomposition::new(
            &[1.0, 2.0, 3.0],
            &[1.0],
            EigenVectorCalculation::WithoutEigenVector,
            ShiftStrategy::NoShift,
        )
        .is_err());
    }
}
