//! Gaussian quadratures from orthogonal-polynomial recurrences.
//!
//! The polynomial families are defined by the three-term recurrence
//! `P_{k+1}(x) = (x - α_k) P_k(x) - β_k P_{k-1}(x)` together with the
//! zeroth moment `μ0 = ∫ w(x) dx` of their weight function. Nodes and
//! weights follow Golub & Welsch: diagonalize the symmetric tridiagonal
//! Jacobi matrix built from `α`, `√β`, and read the weights off the first
//! row of the eigenvector matrix.
//!
//! References: Golub & Welsch, *Calculation of Gauss quadrature rules*,
//! Math. Comput. 23 (1969); *Numerical Recipes in C*, 2nd ed.

use alo_core::{
    ensure, fail,
    errors::Result,
    Real, Size,
};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::comparison::close_enough_default;
use crate::matrixutilities::{
    EigenVectorCalculation, ShiftStrategy, TqrEigenDecomposition,
};

use super::Integrator;

// ── Orthogonal polynomial families ────────────────────────────────────────────

/// An orthogonal polynomial family, described by its recurrence
/// coefficients and weight function.
///
/// `alpha`/`beta` are fallible because some families (Jacobi) have
/// degenerate parameter combinations that are only detected per index.
pub trait GaussianOrthogonalPolynomial {
    /// The zeroth moment `μ0 = ∫ w(x) dx` of the weight function.
    fn mu0(&self) -> Real;

    /// The recurrence coefficient `α_i`.
    fn alpha(&self, i: Size) -> Result<Real>;

    /// The recurrence coefficient `β_i`.
    fn beta(&self, i: Size) -> Result<Real>;

    /// The weight function `w(x)`.
    fn w(&self, x: Real) -> Real;

    /// Evaluate the n-th polynomial at `x` via the three-term recurrence.
    fn value(&self, n: Size, x: Real) -> Result<Real> {
        if n == 0 {
            return Ok(1.0);
        }
        let mut p_prev = 1.0;
        let mut p = x - self.alpha(0)?;
        for k in 2..=n {
            let p_next = (x - self.alpha(k - 1)?) * p - self.beta(k - 1)? * p_prev;
            p_prev = p;
            p = p_next;
        }
        Ok(p)
    }

    /// `sqrt(w(x)) * P_n(x)`.
    fn weighted_value(&self, n: Size, x: Real) -> Result<Real> {
        Ok(self.w(x).sqrt() * self.value(n, x)?)
    }
}

/// Gauss-Laguerre polynomials, orthogonal on `[0, ∞)` with weight
/// `w(x) = x^s e^{-x}`.
#[derive(Debug, Clone)]
pub struct GaussLaguerrePolynomial {
    s: Real,
}

impl GaussLaguerrePolynomial {
    /// Create the family with shape parameter `s > -1`.
    pub fn new(s: Real) -> Result<Self> {
        ensure!(s > -1.0, "s must be bigger than -1, got {s}");
        Ok(Self { s })
    }
}

impl GaussianOrthogonalPolynomial for GaussLaguerrePolynomial {
    fn mu0(&self) -> Real {
        statrs::function::gamma::ln_gamma(self.s + 1.0).exp()
    }

    fn alpha(&self, i: Size) -> Result<Real> {
        Ok(2.0 * i as Real + 1.0 + self.s)
    }

    fn beta(&self, i: Size) -> Result<Real> {
        Ok(i as Real * (i as Real + self.s))
    }

    fn w(&self, x: Real) -> Real {
        x.powf(self.s) * (-x).exp()
    }
}

/// Gauss-Hermite polynomials, orthogonal on `(-∞, ∞)` with weight
/// `w(x) = |x|^{2μ} e^{-x²}`.
#[derive(Debug, Clone)]
pub struct GaussHermitePolynomial {
    mu: Real,
}

impl GaussHermitePolynomial {
    /// Create the family with shape parameter `μ > -0.5`.
    pub fn new(mu: Real) -> Result<Self> {
        ensure!(mu > -0.5, "mu must be bigger than -0.5, got {mu}");
        Ok(Self { mu })
    }
}

impl GaussianOrthogonalPolynomial for GaussHermitePolynomial {
    fn mu0(&self) -> Real {
        statrs::function::gamma::ln_gamma(self.mu + 0.5).exp()
    }

    fn alpha(&self, _i: Size) -> Result<Real> {
        Ok(0.0)
    }

    fn beta(&self, i: Size) -> Result<Real> {
        Ok(if i % 2 != 0 {
            i as Real / 2.0 + self.mu
        } else {
            i as Real / 2.0
        })
    }

    fn w(&self, x: Real) -> Real {
        x.abs().powf(2.0 * self.mu) * (-x * x).exp()
    }
}

/// Gauss-Jacobi polynomials, orthogonal on `[-1, 1]` with weight
/// `w(x) = (1-x)^α (1+x)^β`.
///
/// Legendre, both Chebyshev kinds, and Gegenbauer are parameter special
/// cases, exposed as named constructors.
#[derive(Debug, Clone)]
pub struct GaussJacobiPolynomial {
    a: Real,
    b: Real,
}

impl GaussJacobiPolynomial {
    /// Create the family with shape parameters `α > -1`, `β > -1`,
    /// `α + β > -2`.
    pub fn new(alpha: Real, beta: Real) -> Result<Self> {
        ensure!(
            alpha + beta > -2.0,
            "alpha+beta must be bigger than -2, got {alpha}+{beta}"
        );
        ensure!(alpha > -1.0, "alpha must be bigger than -1, got {alpha}");
        ensure!(beta > -1.0, "beta must be bigger than -1, got {beta}");
        Ok(Self { a: alpha, b: beta })
    }

    /// Legendre polynomials: `w(x) = 1`.
    pub fn legendre() -> Self {
        Self { a: 0.0, b: 0.0 }
    }

    /// Chebyshev polynomials of the first kind: `w(x) = (1-x²)^{-1/2}`.
    pub fn chebyshev() -> Self {
        Self { a: -0.5, b: -0.5 }
    }

    /// Chebyshev polynomials of the second kind: `w(x) = (1-x²)^{1/2}`.
    pub fn chebyshev2nd() -> Self {
        Self { a: 0.5, b: 0.5 }
    }

    /// Gegenbauer (ultraspherical) polynomials: `w(x) = (1-x²)^{λ-1/2}`.
    pub fn gegenbauer(lambda: Real) -> Result<Self> {
        Self::new(lambda - 0.5, lambda - 0.5)
    }
}

impl GaussianOrthogonalPolynomial for GaussJacobiPolynomial {
    fn mu0(&self) -> Real {
        let g = statrs::function::gamma::ln_gamma;
        2.0_f64.powf(self.a + self.b + 1.0)
            * (g(self.a + 1.0) + g(self.b + 1.0) - g(self.a + self.b + 2.0)).exp()
    }

    fn alpha(&self, i: Size) -> Result<Real> {
        let i = i as Real;
        let mut num = self.b * self.b - self.a * self.a;
        let mut denom = (2.0 * i + self.a + self.b) * (2.0 * i + self.a + self.b + 2.0);

        if close_enough_default(denom, 0.0) {
            if !close_enough_default(num, 0.0) {
                fail!("can't compute a_k for jacobi integration");
            }
            // L'Hôpital's rule
            num = 2.0 * self.b;
            denom = 2.0 * (2.0 * i + self.a + self.b + 1.0);
            ensure!(
                !close_enough_default(denom, 0.0),
                "can't compute a_k for jacobi integration"
            );
        }

        Ok(num / denom)
    }

    fn beta(&self, i: Size) -> Result<Real> {
        let i = i as Real;
        let s = 2.0 * i + self.a + self.b;
        let mut num = 4.0 * i * (i + self.a) * (i + self.b) * (i + self.a + self.b);
        let mut denom = s * s * (s * s - 1.0);

        if close_enough_default(denom, 0.0) {
            if !close_enough_default(num, 0.0) {
                fail!("can't compute b_k for jacobi integration");
            }
            // L'Hôpital's rule
            num = 4.0 * i * (i + self.b) * (2.0 * i + 2.0 * self.a + self.b);
            denom = 2.0 * s;
            denom *= denom - 1.0;
            ensure!(
                !close_enough_default(denom, 0.0),
                "can't compute b_k for jacobi integration"
            );
        }

        Ok(num / denom)
    }

    fn w(&self, x: Real) -> Real {
        (1.0 - x).powf(self.a) * (1.0 + x).powf(self.b)
    }
}

/// Gauss hyperbolic polynomials, orthogonal on `(-∞, ∞)` with weight
/// `w(x) = sech(x)`.
#[derive(Debug, Clone, Default)]
pub struct GaussHyperbolicPolynomial;

impl GaussianOrthogonalPolynomial for GaussHyperbolicPolynomial {
    fn mu0(&self) -> Real {
        PI
    }

    fn alpha(&self, _i: Size) -> Result<Real> {
        Ok(0.0)
    }

    fn beta(&self, i: Size) -> Result<Real> {
        Ok(if i != 0 {
            FRAC_PI_2 * FRAC_PI_2 * (i * i) as Real
        } else {
            PI
        })
    }

    fn w(&self, x: Real) -> Real {
        1.0 / x.cosh()
    }
}

// ── Quadrature rule ───────────────────────────────────────────────────────────

/// An n-point Gaussian quadrature rule over the support of a polynomial
/// family's weight function.
///
/// The weight function is folded into the weights, so
/// `integrate(f) ≈ ∫ f(x) dx` over the support directly; the rule is
/// exact for `f = w·p` with `p` any polynomial of degree ≤ 2n-1.
#[derive(Debug, Clone)]
pub struct GaussianQuadrature {
    x: Vec<Real>,
    w: Vec<Real>,
}

impl GaussianQuadrature {
    /// Build the n-point rule for the given polynomial family.
    pub fn new(n: Size, poly: &dyn GaussianOrthogonalPolynomial) -> Result<Self> {
        ensure!(n >= 1, "at least one quadrature point required");

        let mut d = Vec::with_capacity(n);
        let mut e = Vec::with_capacity(n - 1);
        d.push(poly.alpha(0)?);
        for i in 1..n {
            d.push(poly.alpha(i)?);
            e.push(poly.beta(i)?.sqrt());
        }

        let tqr = TqrEigenDecomposition::new(
            &d,
            &e,
            EigenVectorCalculation::OnlyFirstRowEigenVector,
            ShiftStrategy::Overrelaxation,
        )?;

        let x = tqr.eigenvalues().to_vec();
        let mu0 = poly.mu0();
        let w = (0..n)
            .map(|i| {
                let v = tqr.eigenvector(0, i);
                mu0 * v * v / poly.w(x[i])
            })
            .collect();

        Ok(Self { x, w })
    }

    /// The quadrature nodes (descending).
    pub fn x(&self) -> &[Real] {
        &self.x
    }

    /// The quadrature weights.
    pub fn weights(&self) -> &[Real] {
        &self.w
    }

    /// The number of points in the rule.
    pub fn order(&self) -> Size {
        self.x.len()
    }

    /// `Σ w_i f(x_i)`.
    pub fn integrate(&self, f: &dyn Fn(Real) -> Real) -> Real {
        self.x
            .iter()
            .zip(self.w.iter())
            .map(|(&x, &w)| w * f(x))
            .sum()
    }
}

// ── Gauss-Legendre integrator over [a, b] ─────────────────────────────────────

/// Fixed-order Gauss-Legendre integration over an arbitrary interval.
///
/// No adaptivity: the caller's scheme picks the order. The raw
/// nodes/weights on `[-1, 1]` are exposed so hot loops can inline the
/// quadrature sum instead of paying the closure dispatch per call.
#[derive(Debug, Clone)]
pub struct GaussLegendreIntegrator {
    rule: GaussianQuadrature,
}

impl GaussLegendreIntegrator {
    /// Create an n-point Gauss-Legendre integrator.
    pub fn new(n: Size) -> Result<Self> {
        let rule = GaussianQuadrature::new(n, &GaussJacobiPolynomial::legendre())?;
        Ok(Self { rule })
    }

    /// The Legendre nodes on `[-1, 1]`.
    pub fn x(&self) -> &[Real] {
        self.rule.x()
    }

    /// The matching weights (summing to 2).
    pub fn weights(&self) -> &[Real] {
        self.rule.weights()
    }

    /// The order of the underlying rule.
    pub fn order(&self) -> Size {
        self.rule.order()
    }
}

impl Integrator for GaussLegendreIntegrator {
    fn integrate(&self, f: &dyn Fn(Real) -> Real, a: Real, b: Real) -> Result<Real> {
        if a == b {
            return Ok(0.0);
        }
        let mid = 0.5 * (a + b);
        let half = 0.5 * (b - a);
        Ok(half * self.rule.integrate(&|u| f(mid + half * u)))
    }
}

// Lets schemes hold either a bare rule or an adaptive integrator behind
// one trait object.
impl Integrator for GaussianQuadrature {
    fn integrate(&self, f: &dyn Fn(Real) -> Real, a: Real, b: Real) -> Result<Real> {
        if a == b {
            return Ok(0.0);
        }
        let mid = 0.5 * (a + b);
        let half = 0.5 * (b - a);
        Ok(half * GaussianQuadrature::integrate(self, &|u| f(mid + half * u)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legendre_weights_sum_to_two() {
        for n in [1, 2, 5, 10, 27] {
            let rule = GaussianQuadrature::new(n, &GaussJacobiPolynomial::legendre()).unwrap();
            let sum: Real = rule.weights().iter().sum();
            assert!((sum - 2.0).abs() < 1e-13, "n={n}: got {sum}");
        }
    }

    #[test]
    fn legendre_exact_for_degree_2n_minus_1() {
        // 5 points integrate x^9 exactly (odd, so zero) and x^8 exactly.
        let rule = GaussianQuadrature::new(5, &GaussJacobiPolynomial::legendre()).unwrap();
        let odd = rule.integrate(&|x| x.powi(9));
        assert!(odd.abs() < 1e-14, "got {odd}");
        let even = rule.integrate(&|x| x.powi(8));
        assert!((even - 2.0 / 9.0).abs() < 1e-14, "got {even}");
    }

    #[test]
    fn legendre_not_exact_beyond_2n_minus_1() {
        let rule = GaussianQuadrature::new(5, &GaussJacobiPolynomial::legendre()).unwrap();
        let v = rule.integrate(&|x| x.powi(10));
        assert!((v - 2.0 / 11.0).abs() > 1e-6, "x^10 should not be exact: {v}");
    }

    #[test]
    fn laguerre_integrates_exponential() {
        let rule = GaussianQuadrature::new(15, &GaussLaguerrePolynomial::new(0.0).unwrap()).unwrap();
        // ∫₀^∞ e^{-x} dx = 1 and ∫₀^∞ x e^{-x} dx = 1
        assert!((rule.integrate(&|x: Real| (-x).exp()) - 1.0).abs() < 1e-12);
        assert!((rule.integrate(&|x: Real| x * (-x).exp()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hermite_integrates_gaussian() {
        let rule = GaussianQuadrature::new(15, &GaussHermitePolynomial::new(0.0).unwrap()).unwrap();
        // ∫ e^{-x²} dx = √π
        let v = rule.integrate(&|x: Real| (-x * x).exp());
        assert!((v - PI.sqrt()).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn chebyshev_first_kind_moment() {
        let rule = GaussianQuadrature::new(15, &GaussJacobiPolynomial::chebyshev()).unwrap();
        // ∫ (1-x²)^{-1/2} dx = π
        let v = rule.integrate(&|x: Real| 1.0 / (1.0 - x * x).sqrt());
        assert!((v - PI).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn hyperbolic_integrates_sech() {
        let rule = GaussianQuadrature::new(15, &GaussHyperbolicPolynomial).unwrap();
        // ∫ sech(x) dx = π
        let v = rule.integrate(&|x: Real| 1.0 / x.cosh());
        assert!((v - PI).abs() < 1e-10, "got {v}");
    }

    #[test]
    fn gegenbauer_half_matches_legendre() {
        // λ = 0.5 gives the Legendre weight.
        let geg = GaussianQuadrature::new(7, &GaussJacobiPolynomial::gegenbauer(0.5).unwrap())
            .unwrap();
        let leg = GaussianQuadrature::new(7, &GaussJacobiPolynomial::legendre()).unwrap();
        for i in 0..7 {
            assert!((geg.x()[i] - leg.x()[i]).abs() < 1e-12);
            assert!((geg.weights()[i] - leg.weights()[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn invalid_shape_parameters_rejected() {
        assert!(GaussLaguerrePolynomial::new(-1.0).is_err());
        assert!(GaussHermitePolynomial::new(-0.5).is_err());
        assert!(GaussJacobiPolynomial::new(-1.5, 0.0).is_err());
        assert!(GaussJacobiPolynomial::new(0.0, -1.5).is_err());
        assert!(GaussJacobiPolynomial::new(-0.999, -0.999).is_ok());
    }

    #[test]
    fn legendre_integrator_affine_map() {
        let integrator = GaussLegendreIntegrator::new(7).unwrap();
        // ∫₁³ x² dx = 26/3
        let v = integrator.integrate(&|x| x * x, 1.0, 3.0).unwrap();
        assert!((v - 26.0 / 3.0).abs() < 1e-12, "got {v}");
        assert_eq!(integrator.order(), 7);
        let wsum: Real = integrator.weights().iter().sum();
        assert!((wsum - 2.0).abs() < 1e-13);
    }

    #[test]
    fn polynomial_recurrence_values() {
        // Legendre: P_2(x) has the monic form x² - 1/3.
        let p = GaussJacobiPolynomial::legendre();
        let v = p.value(2, 0.5).unwrap();
        assert!((v - (0.25 - 1.0 / 3.0)).abs() < 1e-14, "got {v}");
        assert_eq!(p.value(0, 2.0).unwrap(), 1.0);
    }
}
