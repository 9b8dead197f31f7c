//! Chebyshev interpolation on Chebyshev nodes.
//!
//! Barycentric Lagrange interpolation at either first-kind or second-kind
//! Chebyshev nodes on `[-1, 1]`. The node layout is fixed at
//! construction; the y-values can be swapped wholesale with
//! [`ChebyshevInterpolation::update_y`], which is how the fixed-point
//! boundary sweeps advance the interpolant one full iteration at a time.
//!
//! Reference: S.A. Sarra, *Chebyshev Interpolation: An Interactive Tour*.

use std::f64::consts::PI;

use alo_core::{ensure, errors::Result, Real};

use super::Interpolation1D;

/// Which Chebyshev node set to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChebyshevPointsType {
    /// Roots of `T_n(x)`: `x_i = -cos((i + ½)π / n)`.
    FirstKind,
    /// Extrema of `T_{n-1}(x)`: `x_i = -cos(iπ / (n - 1))`.
    SecondKind,
}

/// Chebyshev interpolation on `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct ChebyshevInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
    /// Barycentric weights
    weights: Vec<Real>,
}

impl ChebyshevInterpolation {
    /// Build a Chebyshev interpolation from pre-evaluated function values
    /// at the nodes of the given type: `ys[i] = f(node_i)`.
    pub fn new(ys: &[Real], points_type: ChebyshevPointsType) -> Result<Self> {
        let n = ys.len();
        ensure!(n >= 2, "Chebyshev interpolation requires at least 2 points");
        let xs = chebyshev_nodes(n, points_type);
        let weights = barycentric_weights(&xs);
        Ok(Self {
            xs,
            ys: ys.to_vec(),
            weights,
        })
    }

    /// Build a Chebyshev interpolation by evaluating `f` at `n` nodes.
    pub fn from_function(
        n: usize,
        f: &dyn Fn(Real) -> Real,
        points_type: ChebyshevPointsType,
    ) -> Result<Self> {
        ensure!(n >= 2, "Chebyshev interpolation requires at least 2 points");
        let xs = chebyshev_nodes(n, points_type);
        let ys: Vec<Real> = xs.iter().map(|&x| f(x)).collect();
        let weights = barycentric_weights(&xs);
        Ok(Self { xs, ys, weights })
    }

    /// Return the Chebyshev nodes used by this interpolation.
    pub fn nodes(&self) -> &[Real] {
        &self.xs
    }

    /// Replace all y-values in one atomic step.
    ///
    /// The nodes and barycentric weights are untouched, so evaluations
    /// before the call see the old table and evaluations after see the
    /// new one — never a mix.
    pub fn update_y(&mut self, ys: &[Real]) -> Result<()> {
        ensure!(
            ys.len() == self.ys.len(),
            "interpolation update has the wrong length: {} vs {}",
            ys.len(),
            self.ys.len()
        );
        self.ys.copy_from_slice(ys);
        Ok(())
    }
}

/// Compute the `n` Chebyshev nodes of the given type on `[-1, 1]`,
/// in ascending order.
pub fn chebyshev_nodes(n: usize, points_type: ChebyshevPointsType) -> Vec<Real> {
    let mut t = Vec::with_capacity(n);
    match points_type {
        ChebyshevPointsType::FirstKind => {
            for i in 0..n {
                t.push(-((i as f64 + 0.5) * PI / n as f64).cos());
            }
        }
        ChebyshevPointsType::SecondKind => {
            if n == 1 {
                t.push(-1.0);
            } else {
                for i in 0..n {
                    t.push(-(i as f64 * PI / (n - 1) as f64).cos());
                }
            }
        }
    }
    t
}

fn barycentric_weights(xs: &[Real]) -> Vec<Real> {
    let n = xs.len();
    let mut weights = vec![1.0; n];
    for j in 0..n {
        for k in 0..n {
            if k != j {
                weights[j] /= xs[j] - xs[k];
            }
        }
    }
    weights
}

impl Interpolation1D for ChebyshevInterpolation {
    fn x_min(&self) -> Real {
        self.xs.first().copied().unwrap_or(-1.0)
    }

    fn x_max(&self) -> Real {
        self.xs.last().copied().unwrap_or(1.0)
    }

    /// Barycentric evaluation. Extrapolates freely outside `[-1, 1]`; the
    /// boundary engines rely on this for abscissas that land a rounding
    /// error past the endpoints.
    fn operator(&self, x: Real) -> Real {
        // A query on a node must return the tabulated value exactly.
        for (i, &xi) in self.xs.iter().enumerate() {
            if (x - xi).abs() < f64::EPSILON * (1.0 + x.abs()) {
                return self.ys[i];
            }
        }
        // f(x) = [Σ w_j y_j / (x - x_j)] / [Σ w_j / (x - x_j)]
        let mut numer = 0.0;
        let mut denom = 0.0;
        for j in 0..self.xs.len() {
            let t = self.weights[j] / (x - self.xs[j]);
            numer += t * self.ys[j];
            denom += t;
        }
        numer / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_kind_nodes() {
        let nodes = chebyshev_nodes(5, ChebyshevPointsType::SecondKind);
        assert_eq!(nodes.len(), 5);
        assert!((nodes[0] - (-1.0)).abs() < 1e-12);
        assert!((nodes[4] - 1.0).abs() < 1e-12);
        assert!(nodes[2].abs() < 1e-12);
    }

    #[test]
    fn first_kind_nodes_are_interior() {
        let nodes = chebyshev_nodes(4, ChebyshevPointsType::FirstKind);
        assert_eq!(nodes.len(), 4);
        for &x in &nodes {
            assert!(x > -1.0 && x < 1.0);
        }
    }

    #[test]
    fn approximates_cos() {
        let f = |x: Real| x.cos();
        let interp =
            ChebyshevInterpolation::from_function(10, &f, ChebyshevPointsType::SecondKind)
                .unwrap();
        for i in 0..=20 {
            let x = -1.0 + 2.0 * (i as f64) / 20.0;
            let expected = x.cos();
            let v = interp.operator(x);
            assert!(
                (v - expected).abs() < 1e-8,
                "at x={x}: expected {expected}, got {v}"
            );
        }
    }

    #[test]
    fn node_query_returns_tabulated_value() {
        let n = 8;
        let nodes = chebyshev_nodes(n, ChebyshevPointsType::SecondKind);
        let ys: Vec<Real> = nodes.iter().map(|&x| x * x).collect();
        let interp = ChebyshevInterpolation::new(&ys, ChebyshevPointsType::SecondKind).unwrap();
        for (i, &x) in nodes.iter().enumerate() {
            assert_eq!(interp.operator(x), ys[i]);
        }
    }

    #[test]
    fn update_y_swaps_the_table() {
        let n = 6;
        let nodes = chebyshev_nodes(n, ChebyshevPointsType::SecondKind);
        let ys1: Vec<Real> = nodes.iter().map(|&x| x).collect();
        let ys2: Vec<Real> = nodes.iter().map(|&x| x * x * x).collect();

        let mut interp = ChebyshevInterpolation::new(&ys1, ChebyshevPointsType::SecondKind).unwrap();
        assert!((interp.operator(0.3) - 0.3).abs() < 1e-12);

        interp.update_y(&ys2).unwrap();
        assert!((interp.operator(0.3) - 0.027).abs() < 1e-12);
    }

    #[test]
    fn update_y_length_mismatch_rejected() {
        let ys = [0.0, 1.0, 2.0, 3.0];
        let mut interp = ChebyshevInterpolation::new(&ys, ChebyshevPointsType::SecondKind).unwrap();
        assert!(interp.update_y(&[0.0, 1.0]).is_err());
    }

    #[test]
    fn extrapolates_smoothly_past_the_endpoints() {
        let f = |x: Real| 1.0 + x;
        let interp =
            ChebyshevInterpolation::from_function(5, &f, ChebyshevPointsType::SecondKind).unwrap();
        // Linear data stays linear a hair outside the interval.
        let v = interp.operator(1.0 + 1e-10);
        assert!((v - (2.0 + 1e-10)).abs() < 1e-9, "got {v}");
    }
}
