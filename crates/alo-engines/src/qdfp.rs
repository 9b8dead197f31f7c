//! Fixed-point American option engine.
//!
//! High-precision American engine based on fixed-point iteration for the
//! exercise boundary, warm-started from the QD+ approximation. The
//! boundary is represented as a Chebyshev interpolation of
//! `y(z) = ln²(B(tau(z))/xmax)` on square-root-of-time coordinates; each
//! sweep re-evaluates the fixed-point functional at every node and swaps
//! the whole table at once (Gauss-Jacobi style), the first sweep with a
//! Jacobi-Newton correction and the remaining ones as naive Richardson
//! iterations.
//!
//! References:
//! Leif Andersen, Mark Lake and Dimitri Offengenden (2015),
//! "High Performance American Option Pricing".
//! Leif Andersen, Mark Lake (2021),
//! "Fast American Option Pricing: The Double-Boundary Case".

use std::cell::RefCell;
use std::f64::consts::PI;

use alo_core::{ensure, errors::Result, Rate, Real, Time, Volatility};
use alo_instruments::{OptionType, PricingEngine, PricingResults, VanillaOptionArguments};
use alo_math::{
    close_enough_default,
    integrals::{
        gaussianquadratures::GaussLegendreIntegrator, tanhsinh::TanhSinhIntegral,
        GaussLobattoIntegral,
    },
    interpolations::Interpolation1D,
    normal_cdf, normal_pdf,
    Integrator,
};
use alo_processes::BlackScholesProcess;

use crate::american;
use crate::black_calculator::BlackCalculator;
use crate::qdplus::{x_max, QdPlusAddOnValue, QdPlusBoundarySolver, SolverType};

/// Which fixed-point functional to iterate.
///
/// Equation A integrates on a half-angle substitution of the time axis
/// and stays well-conditioned when `r` is close to `q`; equation B
/// integrates the kernel directly and is the better choice otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedPointEquation {
    /// Always use equation A.
    FpA,
    /// Always use equation B.
    FpB,
    /// Pick A when `|r - q|` is small, B otherwise.
    Auto,
}

/// `Auto` switches to equation A below this rate spread.
const EQUATION_A_RATE_SPREAD: Real = 0.001;

fn tanh_sinh_or_lobatto(eps: Real) -> Box<dyn Integrator> {
    match TanhSinhIntegral::new(eps, 15) {
        Ok(integral) => Box::new(integral),
        Err(_) => Box::new(GaussLobattoIntegral::new(0.1 * eps, 100_000)),
    }
}

/// Iteration scheme: node counts, sweep counts, and the integrators used
/// inside the fixed-point functional and in the final boundary-to-price
/// conversion.
pub struct QdFpIterationScheme {
    n_chebyshev_nodes: usize,
    n_naive_steps: usize,
    n_jacobi_newton_steps: usize,
    fp_integrator: Box<dyn Integrator>,
    boundary_to_price_integrator: Box<dyn Integrator>,
    // Raw Gauss-Legendre abscissas let the equations inline the
    // quadrature sum instead of going through the Integrator trait.
    legendre_points: Option<(Vec<Real>, Vec<Real>)>,
}

impl QdFpIterationScheme {
    /// Gauss-Legendre `(l, m, n)-p` scheme: order-`l` quadrature inside
    /// every fixed-point step, `m` steps in total (one Jacobi-Newton,
    /// the rest naive), `n` Chebyshev nodes, and an order-`p` quadrature
    /// for the final conversion of the boundary into a price.
    pub fn legendre(l: usize, m: usize, n: usize, p: usize) -> Result<Self> {
        ensure!(m > 0, "at least one fixed point iteration step is needed");
        ensure!(n > 0, "at least one interpolation point is needed");
        let fp = GaussLegendreIntegrator::new(l)?;
        let points = (fp.x().to_vec(), fp.weights().to_vec());
        Ok(Self {
            n_chebyshev_nodes: n,
            n_naive_steps: m - 1,
            n_jacobi_newton_steps: 1,
            fp_integrator: Box::new(fp),
            boundary_to_price_integrator: Box::new(GaussLegendreIntegrator::new(p)?),
            legendre_points: Some(points),
        })
    }

    /// Legendre-tanh-sinh `(l, m, n)-eps` scheme: as [`Self::legendre`],
    /// but the final conversion uses a tanh-sinh integration with
    /// accuracy `eps`.
    pub fn legendre_tanh_sinh(l: usize, m: usize, n: usize, eps: Real) -> Result<Self> {
        let mut scheme = Self::legendre(l, m, n, 1)?;
        scheme.boundary_to_price_integrator = tanh_sinh_or_lobatto(eps);
        Ok(scheme)
    }

    /// Tanh-sinh `(m, n)-eps` scheme: tanh-sinh integration with
    /// accuracy `eps` both inside the fixed-point steps and in the final
    /// conversion.
    pub fn tanh_sinh(m: usize, n: usize, eps: Real) -> Result<Self> {
        ensure!(m > 0, "at least one fixed point iteration step is needed");
        ensure!(n > 0, "at least one interpolation point is needed");
        Ok(Self {
            n_chebyshev_nodes: n,
            n_naive_steps: m - 1,
            n_jacobi_newton_steps: 1,
            fp_integrator: tanh_sinh_or_lobatto(eps),
            boundary_to_price_integrator: tanh_sinh_or_lobatto(eps),
            legendre_points: None,
        })
    }

    /// Fast pricing scheme, roughly 1e-6 accuracy.
    pub fn fast() -> Result<Self> {
        Self::legendre(7, 2, 7, 27)
    }

    /// The default: high accuracy at a moderate cost, roughly 1e-8.
    pub fn accurate() -> Result<Self> {
        Self::legendre_tanh_sinh(25, 5, 13, 1e-8)
    }

    /// Close-to-machine-precision scheme.
    pub fn high_precision() -> Result<Self> {
        Self::tanh_sinh(10, 30, 1e-10)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EquationKind {
    A,
    B,
}

/// The fixed-point functional `F(tau, b) -> (N, D, f)` and the
/// derivatives of `N` and `D` in `b` used by the Jacobi-Newton sweep.
struct FpEquation<'a> {
    kind: EquationKind,
    strike: Real,
    r: Rate,
    q: Rate,
    vol: Volatility,
    boundary: &'a dyn Fn(Real) -> Real,
    integrator: &'a dyn Integrator,
    x: &'a [Real],
    w: &'a [Real],
}

impl<'a> FpEquation<'a> {
    fn d(&self, t: Time, z: Real) -> (Real, Real) {
        let v = self.vol * t.sqrt();
        let m = (z.ln() + (self.r - self.q) * t) / v + 0.5 * v;
        (m, m - v)
    }

    fn f(&self, tau: Time, b: Real) -> Result<(Real, Real, Real)> {
        match self.kind {
            EquationKind::A => self.f_a(tau, b),
            EquationKind::B => self.f_b(tau, b),
        }
    }

    fn nd_derivatives(&self, tau: Time, b: Real) -> (Real, Real) {
        match self.kind {
            EquationKind::A => self.nd_derivatives_a(tau, b),
            EquationKind::B => self.nd_derivatives_b(tau, b),
        }
    }

    fn f_a(&self, tau: Time, b: Real) -> Result<(Real, Real, Real)> {
        let v = self.vol * tau.sqrt();

        let (n, d) = if tau < f64::EPSILON * f64::EPSILON {
            if close_enough_default(b, self.strike) {
                let n = 1.0 / ((2.0 * PI).sqrt() * v);
                (n, n + 0.5)
            } else {
                (0.0, if b > self.strike { 1.0 } else { 0.0 })
            }
        } else {
            let stv = tau.sqrt() / self.vol;

            let (k12, k3) = if !self.x.is_empty() {
                let mut k12 = 0.0;
                let mut k3 = 0.0;
                for i in (0..self.x.len()).rev() {
                    let y = self.x[i];
                    let m = 0.25 * tau * (1.0 + y) * (1.0 + y);
                    let (dp, dm) = self.d(m, b / (self.boundary)(tau - m));

                    k12 += self.w[i]
                        * (self.q * tau - self.q * m).exp()
                        * (0.5 * tau * (y + 1.0) * normal_cdf(dp) + stv * normal_pdf(dp));
                    k3 += self.w[i] * stv * (self.r * tau - self.r * m).exp() * normal_pdf(dm);
                }
                (k12, k3)
            } else {
                let k12 = self.integrator.integrate(
                    &|y: Real| {
                        let m = 0.25 * tau * (1.0 + y) * (1.0 + y);
                        let df = (self.q * tau - self.q * m).exp();

                        if y <= 5.0 * f64::EPSILON - 1.0 {
                            if close_enough_default(b, (self.boundary)(tau - m)) {
                                df * stv / (2.0 * PI).sqrt()
                            } else {
                                0.0
                            }
                        } else {
                            let dp = self.d(m, b / (self.boundary)(tau - m)).0;
                            df * (0.5 * tau * (y + 1.0) * normal_cdf(dp) + stv * normal_pdf(dp))
                        }
                    },
                    -1.0,
                    1.0,
                )?;

                let k3 = self.integrator.integrate(
                    &|y: Real| {
                        let m = 0.25 * tau * (1.0 + y) * (1.0 + y);
                        let df = (self.r * tau - self.r * m).exp();

                        if y <= 5.0 * f64::EPSILON - 1.0 {
                            if close_enough_default(b, (self.boundary)(tau - m)) {
                                df * stv / (2.0 * PI).sqrt()
                            } else {
                                0.0
                            }
                        } else {
                            df * stv * normal_pdf(self.d(m, b / (self.boundary)(tau - m)).1)
                        }
                    },
                    -1.0,
                    1.0,
                )?;

                (k12, k3)
            };

            let (dp, dm) = self.d(tau, b / self.strike);
            (
                normal_pdf(dm) / v + self.r * k3,
                normal_pdf(dp) / v + normal_cdf(dp) + self.q * k12,
            )
        };

        Ok((n, d, self.boundary_value(tau, b, n, d)))
    }

    fn nd_derivatives_a(&self, tau: Time, b: Real) -> (Real, Real) {
        if tau < f64::EPSILON * f64::EPSILON {
            if close_enough_default(b, self.strike) {
                let sq_tau = tau.sqrt();
                let vol2 = self.vol * self.vol;
                let c = (2.0 / PI).sqrt();
                let dd = c
                    * (-(0.5 * vol2 + self.r - self.q) / (b * self.vol * vol2 * sq_tau)
                        + 1.0 / (b * self.vol * sq_tau));
                let nd = c * (-0.5 * vol2 + self.r - self.q) / (b * self.vol * vol2 * sq_tau);
                (nd, dd)
            } else {
                (0.0, 0.0)
            }
        } else {
            let (dp, dm) = self.d(tau, b / self.strike);
            let dd = -normal_pdf(dp) * dp / (b * self.vol * self.vol * tau)
                + normal_pdf(dp) / (b * self.vol * tau.sqrt());
            let nd = -normal_pdf(dm) * dm / (b * self.vol * self.vol * tau);
            (nd, dd)
        }
    }

    fn f_b(&self, tau: Time, b: Real) -> Result<(Real, Real, Real)> {
        let (n, d) = if tau < f64::EPSILON * f64::EPSILON {
            if close_enough_default(b, self.strike) {
                (0.5, 0.5)
            } else if b < self.strike {
                (0.0, 0.0)
            } else {
                (1.0, 1.0)
            }
        } else {
            let (ni, di) = if !self.x.is_empty() {
                let c = 0.5 * tau;
                let mut ni = 0.0;
                let mut di = 0.0;
                for i in (0..self.x.len()).rev() {
                    let u = c * self.x[i] + c;
                    let (dp, dm) = self.d(tau - u, b / (self.boundary)(u));
                    ni += self.w[i] * (self.r * u).exp() * normal_cdf(dm);
                    di += self.w[i] * (self.q * u).exp() * normal_cdf(dp);
                }
                (ni * c, di * c)
            } else {
                let ni = self.integrator.integrate(
                    &|u: Real| {
                        let df = (self.r * u).exp();
                        if u >= tau * (1.0 - 5.0 * f64::EPSILON) {
                            if close_enough_default(b, (self.boundary)(u)) {
                                0.5 * df
                            } else {
                                df * if b < (self.boundary)(u) { 0.0 } else { 1.0 }
                            }
                        } else {
                            df * normal_cdf(self.d(tau - u, b / (self.boundary)(u)).1)
                        }
                    },
                    0.0,
                    tau,
                )?;

                let di = self.integrator.integrate(
                    &|u: Real| {
                        let df = (self.q * u).exp();
                        if u >= tau * (1.0 - 5.0 * f64::EPSILON) {
                            if close_enough_default(b, (self.boundary)(u)) {
                                0.5 * df
                            } else {
                                df * if b < (self.boundary)(u) { 0.0 } else { 1.0 }
                            }
                        } else {
                            df * normal_cdf(self.d(tau - u, b / (self.boundary)(u)).0)
                        }
                    },
                    0.0,
                    tau,
                )?;

                (ni, di)
            };

            let (dp, dm) = self.d(tau, b / self.strike);
            (normal_cdf(dm) + self.r * ni, normal_cdf(dp) + self.q * di)
        };

        Ok((n, d, self.boundary_value(tau, b, n, d)))
    }

    fn nd_derivatives_b(&self, tau: Time, b: Real) -> (Real, Real) {
        let (dp, dm) = self.d(tau, b / self.strike);
        (
            normal_pdf(dm) / (b * self.vol * tau.sqrt()),
            normal_pdf(dp) / (b * self.vol * tau.sqrt()),
        )
    }

    /// `f(tau, b) = K e^{-(r-q)tau} N/D`, with the `tau -> 0` limits
    /// resolved analytically.
    fn boundary_value(&self, tau: Time, b: Real, n: Real, d: Real) -> Real {
        let alpha = self.strike * (-(self.r - self.q) * tau).exp();
        if tau < f64::EPSILON * f64::EPSILON {
            match self.kind {
                EquationKind::A => {
                    if close_enough_default(b, self.strike) {
                        alpha
                    } else if b > self.strike {
                        0.0
                    } else {
                        self.degenerate_ratio(alpha)
                    }
                }
                EquationKind::B => {
                    if close_enough_default(b, self.strike) || b > self.strike {
                        alpha
                    } else {
                        self.degenerate_ratio(alpha)
                    }
                }
            }
        } else {
            alpha * n / d
        }
    }

    fn degenerate_ratio(&self, alpha: Real) -> Real {
        if close_enough_default(self.q, 0.0) {
            alpha * self.r * (if self.q < 0.0 { -1.0 } else { 1.0 }) / f64::EPSILON
        } else {
            alpha * self.r / self.q
        }
    }
}

/// American engine based on fixed-point iteration for the exercise
/// boundary.
pub struct QdFpAmericanEngine<P> {
    process: P,
    scheme: QdFpIterationScheme,
    fp_equation: FixedPointEquation,
}

impl<P: BlackScholesProcess> QdFpAmericanEngine<P> {
    /// Create an engine with the accurate scheme and automatic equation
    /// selection.
    pub fn new(process: P) -> Result<Self> {
        Ok(Self {
            process,
            scheme: QdFpIterationScheme::accurate()?,
            fp_equation: FixedPointEquation::Auto,
        })
    }

    /// Create an engine with an explicit scheme and equation choice.
    pub fn with_scheme(
        process: P,
        scheme: QdFpIterationScheme,
        fp_equation: FixedPointEquation,
    ) -> Self {
        Self {
            process,
            scheme,
            fp_equation,
        }
    }

    fn calculate_put(
        &self,
        s: Real,
        strike: Real,
        r: Rate,
        q: Rate,
        vol: Volatility,
        t: Time,
    ) -> Result<Real> {
        american::reject_double_boundary(r, q)?;

        let xmax = x_max(strike, r, q);
        let n = self.scheme.n_chebyshev_nodes;

        // Warm start: QD+ boundary tabulated at n+1 Chebyshev nodes.
        let interp = RefCell::new(
            QdPlusBoundarySolver::new(SolverType::Halley, 1e-8, None)
                .put_exercise_boundary(s, strike, r, q, vol, t, n + 1)?,
        );

        let z: Vec<Real> = interp.borrow().nodes().to_vec();
        let x: Vec<Real> = z.iter().map(|&zi| 0.5 * t.sqrt() * (1.0 + zi)).collect();

        let boundary = |tau: Real| -> Real {
            let zv = 2.0 * (tau.abs() / t).sqrt() - 1.0;
            xmax * (-interp.borrow().operator(zv).max(0.0).sqrt()).exp()
        };
        let h = |fv: Real| -> Real {
            let l = (fv / xmax).ln();
            l * l
        };

        let kind = if self.fp_equation == FixedPointEquation::FpA
            || (self.fp_equation == FixedPointEquation::Auto
                && (r - q).abs() < EQUATION_A_RATE_SPREAD)
        {
            EquationKind::A
        } else {
            EquationKind::B
        };

        let (x_i, w_i): (&[Real], &[Real]) = match &self.scheme.legendre_points {
            Some((xs, ws)) => (xs, ws),
            None => (&[], &[]),
        };
        let eqn = FpEquation {
            kind,
            strike,
            r,
            q,
            vol,
            boundary: &boundary,
            integrator: self.scheme.fp_integrator.as_ref(),
            x: x_i,
            w: w_i,
        };

        let mut y = vec![0.0; x.len()];

        // One synchronous table swap per sweep: every node reads the
        // previous sweep's boundary.
        for _ in 0..self.scheme.n_jacobi_newton_steps {
            for i in 1..x.len() {
                let tau = x[i] * x[i];
                let b = boundary(tau);

                let (n_val, d_val, fv) = eqn.f(tau, b)?;

                if tau < f64::EPSILON {
                    y[i] = h(fv);
                } else {
                    let (nd, dd) = eqn.nd_derivatives(tau, b);
                    let fd = strike
                        * (-(r - q) * tau).exp()
                        * (nd / d_val - dd * n_val / (d_val * d_val));
                    y[i] = h(b - (fv - b) / (fd - 1.0));
                }
            }
            interp.borrow_mut().update_y(&y)?;
        }

        for _ in 0..self.scheme.n_naive_steps {
            for i in 1..x.len() {
                let tau = x[i] * x[i];
                let (_, _, fv) = eqn.f(tau, boundary(tau))?;
                y[i] = h(fv);
            }
            interp.borrow_mut().update_y(&y)?;
        }

        let interp_final = interp.borrow();
        let aov = QdPlusAddOnValue::new(t, s, strike, r, q, vol, xmax, &interp_final);
        let add_on = self
            .scheme
            .boundary_to_price_integrator
            .integrate(&|zv: Real| aov.value(zv), 0.0, t.sqrt())?;

        let european = BlackCalculator::vanilla(
            OptionType::Put,
            strike,
            s * ((r - q) * t).exp(),
            vol * t.sqrt(),
            (-r * t).exp(),
        )?
        .value();

        Ok(european.max(0.0) + add_on.max(0.0))
    }
}

impl<P: BlackScholesProcess> PricingEngine<VanillaOptionArguments> for QdFpAmericanEngine<P> {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<PricingResults> {
        let inputs = american::extract_inputs(&self.process, args)?;
        let npv = american::american_value(&inputs, |s, k, r, q, vol, t| {
            self.calculate_put(s, k, r, q, vol, t)
        })?;
        Ok(PricingResults::from_npv(npv))
    }
}
