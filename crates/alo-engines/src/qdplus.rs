//! QD+ American option engine.
//!
//! American engine based on the QD+ approximation to the exercise
//! boundary. Its main purpose is to provide a good initial guess to the
//! fixed-point engine in [`crate::qdfp`], but it is a serviceable pricer
//! in its own right.
//!
//! Reference: Li, M. (2009), "Analytical Approximations for the Critical
//! Stock Prices of American Options: A Performance Comparison",
//! Working paper, Georgia Institute of Technology.

use std::cell::Cell;

use alo_core::{ensure, errors::Result, fail, Rate, Real, Time, Volatility};
use alo_instruments::{OptionType, PricingEngine, PricingResults, VanillaOptionArguments};
use alo_math::{
    close_enough_default,
    integrals::{GaussLobattoIntegral, tanhsinh::TanhSinhIntegral},
    interpolations::{
        chebyshev::{chebyshev_nodes, ChebyshevInterpolation, ChebyshevPointsType},
        Interpolation1D,
    },
    normal_cdf, normal_pdf,
    solvers1d::{brent, newton, ridder},
    Integrator,
};
use alo_processes::BlackScholesProcess;

use crate::american;
use crate::black_calculator::BlackCalculator;

/// Root solver used for the QD+ boundary equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverType {
    /// Brent's bracketing solver.
    Brent,
    /// Newton-Raphson with the analytic derivative.
    Newton,
    /// Ridder's bracketing solver.
    Ridder,
    /// Halley's method with the analytic second derivative.
    Halley,
    /// The super-Halley variant (faster far from the root).
    SuperHalley,
}

/// Upper bound of the put exercise boundary, `B(0+)`.
///
/// Table 2 from Andersen and Lake (2021), "Fast American Option Pricing:
/// The Double-Boundary Case".
pub fn x_max(strike: Real, r: Rate, q: Rate) -> Real {
    if r > 0.0 && q > 0.0 {
        strike * (r / q).min(1.0)
    } else if r > 0.0 && q <= 0.0 {
        strike
    } else if r == 0.0 && q < 0.0 {
        strike
    } else if r == 0.0 && q >= 0.0 {
        0.0 // European case
    } else if r < 0.0 && q >= 0.0 {
        0.0 // European case
    } else if r < 0.0 && q < r {
        strike // double boundary case
    } else {
        0.0 // r < 0 && r <= q < 0: European case
    }
}

/// The QD+ boundary equation and its first two derivatives in `S`.
///
/// Every quantity that depends only on the trial boundary `S` is
/// memoized behind `Cell`s and refreshed when `S` changes, so the
/// Halley iterations pay for one set of distribution calls per step.
pub(crate) struct QdPlusBoundaryEvaluator {
    tau: Time,
    strike: Real,
    sigma2: Real,
    v: Real,
    r: Rate,
    q: Rate,
    dr: Real,
    dq: Real,
    lambda: Real,
    alpha: Real,
    beta: Real,
    x_max: Real,
    x_min: Real,

    n_evaluations: Cell<usize>,
    sc: Cell<Real>,
    dp: Cell<Real>,
    dm: Cell<Real>,
    cum_m_dp: Cell<Real>,
    cum_m_dm: Cell<Real>,
    pdf_dp: Cell<Real>,
    npv: Cell<Real>,
    theta: Cell<Real>,
    charm: Cell<Real>,
}

impl QdPlusBoundaryEvaluator {
    pub(crate) fn new(
        s: Real,
        strike: Real,
        r: Rate,
        q: Rate,
        vol: Volatility,
        tau: Time,
    ) -> Self {
        let sigma = vol;
        let sigma2 = sigma * sigma;
        let v = sigma * tau.sqrt();
        let dr = (-r * tau).exp();
        let dq = (-q * tau).exp();

        // 1/annuity; the Taylor expansion tames r*tau -> 0.
        let ddr = if (r * tau).abs() > 1e-5 {
            r / (1.0 - dr)
        } else {
            1.0 / (tau * (1.0 - 0.5 * r * tau * (1.0 - r * tau / 3.0)))
        };

        let omega = 2.0 * (r - q) / sigma2;
        let disc = ((omega - 1.0) * (omega - 1.0) + 8.0 * ddr / sigma2).sqrt();
        let lambda = 0.5 * (-(omega - 1.0) - disc);
        let lambda_prime = 2.0 * ddr * ddr / (sigma2 * disc);
        let alpha = 2.0 * dr / (sigma2 * (2.0 * lambda + omega - 1.0));
        let beta = alpha * (ddr + lambda_prime / (2.0 * lambda + omega - 1.0)) - lambda;
        let x_max = x_max(strike, r, q);
        let x_min = f64::EPSILON * 1e4 * (0.5 * (strike + s)).min(x_max);

        Self {
            tau,
            strike,
            sigma2,
            v,
            r,
            q,
            dr,
            dq,
            lambda,
            alpha,
            beta,
            x_max,
            x_min,
            n_evaluations: Cell::new(0),
            sc: Cell::new(f64::NAN),
            dp: Cell::new(0.0),
            dm: Cell::new(0.0),
            cum_m_dp: Cell::new(0.0),
            cum_m_dm: Cell::new(0.0),
            pdf_dp: Cell::new(0.0),
            npv: Cell::new(0.0),
            theta: Cell::new(0.0),
            charm: Cell::new(0.0),
        }
    }

    pub(crate) fn value(&self, s: Real) -> Real {
        self.n_evaluations.set(self.n_evaluations.get() + 1);

        if s != self.sc.get() {
            self.pre_calculate(s);
        }

        let npv = self.npv.get();
        if close_enough_default(self.strike - s, npv) {
            (1.0 - self.dq * self.cum_m_dp.get()) * s + self.alpha * self.theta.get() / self.dr
        } else {
            let c0 = -self.beta - self.lambda
                + self.alpha * self.theta.get() / (self.dr * (self.strike - s - npv));
            (1.0 - self.dq * self.cum_m_dp.get()) * s
                + (self.lambda + c0) * (self.strike - s - npv)
        }
    }

    pub(crate) fn derivative(&self, s: Real) -> Real {
        if s != self.sc.get() {
            self.pre_calculate(s);
        }

        1.0 - self.dq * self.cum_m_dp.get()
            + self.dq / self.v * self.pdf_dp.get()
            + self.beta * (1.0 - self.dq * self.cum_m_dp.get())
            + self.alpha / self.dr * self.charm.get()
    }

    pub(crate) fn second_derivative(&self, s: Real) -> Real {
        if s != self.sc.get() {
            self.pre_calculate(s);
        }

        let dp = self.dp.get();
        let dm = self.dm.get();
        let gamma = self.pdf_dp.get() * self.dq / (self.v * s);
        let colour = gamma
            * (self.q + (self.r - self.q) * dp / self.v + (1.0 - dp * dm) / (2.0 * self.tau));

        self.dq * (self.pdf_dp.get() / (s * self.v) - self.pdf_dp.get() * dp / (s * self.v * self.v))
            + self.beta * gamma
            + self.alpha / self.dr * colour
    }

    pub(crate) fn x_min(&self) -> Real {
        self.x_min
    }

    pub(crate) fn x_max(&self) -> Real {
        self.x_max
    }

    pub(crate) fn evaluations(&self) -> usize {
        self.n_evaluations.get()
    }

    fn pre_calculate(&self, s: Real) {
        let s = s.max(f64::EPSILON);
        self.sc.set(s);

        let dp = (s * self.dq / (self.strike * self.dr)).ln() / self.v + 0.5 * self.v;
        let dm = dp - self.v;
        self.dp.set(dp);
        self.dm.set(dm);
        self.cum_m_dp.set(normal_cdf(-dp));
        self.cum_m_dm.set(normal_cdf(-dm));
        self.pdf_dp.set(normal_pdf(dp));

        self.npv
            .set(self.dr * self.strike * self.cum_m_dm.get() - s * self.dq * self.cum_m_dp.get());
        self.theta.set(
            self.r * self.strike * self.dr * self.cum_m_dm.get()
                - self.q * s * self.dq * self.cum_m_dp.get()
                - self.sigma2 * s / (2.0 * self.v) * self.dq * self.pdf_dp.get(),
        );
        self.charm.set(
            -self.dq
                * (self.pdf_dp.get() * ((self.r - self.q) / self.v - dm / (2.0 * self.tau))
                    + self.q * self.cum_m_dp.get()),
        );
    }
}

/// Early exercise premium integrand.
///
/// Integrated over `z in [0, sqrt(T)]` with the substitution `t = z²`,
/// reading the exercise boundary from the interpolated
/// `y(z) = ln²(B/xmax)` table.
pub(crate) struct QdPlusAddOnValue<'a> {
    maturity: Time,
    s: Real,
    strike: Real,
    r: Rate,
    q: Rate,
    vol: Volatility,
    x_max: Real,
    q_z: &'a ChebyshevInterpolation,
}

impl<'a> QdPlusAddOnValue<'a> {
    pub(crate) fn new(
        maturity: Time,
        s: Real,
        strike: Real,
        r: Rate,
        q: Rate,
        vol: Volatility,
        x_max: Real,
        q_z: &'a ChebyshevInterpolation,
    ) -> Self {
        Self {
            maturity,
            s,
            strike,
            r,
            q,
            vol,
            x_max,
            q_z,
        }
    }

    pub(crate) fn value(&self, z: Real) -> Real {
        let t = z * z;
        let y = self
            .q_z
            .operator(2.0 * (((self.maturity - t).max(0.0)) / self.maturity).sqrt() - 1.0);
        let b_t = self.x_max * (-y.max(0.0).sqrt()).exp();

        let dr = (-self.r * t).exp();
        let dq = (-self.q * t).exp();
        let v = self.vol * t.sqrt();

        if v >= f64::EPSILON {
            if b_t > f64::EPSILON {
                let dp = (self.s * dq / (b_t * dr)).ln() / v + 0.5 * v;
                2.0 * z
                    * (self.r * self.strike * dr * normal_cdf(-dp + v)
                        - self.q * self.s * dq * normal_cdf(-dp))
            } else {
                0.0
            }
        } else if close_enough_default(self.s * dq, b_t * dr) {
            z * (self.r * self.strike * dr - self.q * self.s * dq)
        } else if b_t * dr > self.s * dq {
            2.0 * z * (self.r * self.strike * dr - self.q * self.s * dq)
        } else {
            0.0
        }
    }
}

/// The boundary-equation solver configuration shared by the QD+ engine
/// and the fixed-point engine's warm start.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QdPlusBoundarySolver {
    solver_type: SolverType,
    eps: Real,
    max_iter: usize,
}

impl QdPlusBoundarySolver {
    pub(crate) fn new(solver_type: SolverType, eps: Real, max_iter: Option<usize>) -> Self {
        let max_iter = max_iter.unwrap_or(match solver_type {
            SolverType::Newton | SolverType::Brent | SolverType::Ridder => 100,
            SolverType::Halley | SolverType::SuperHalley => 10,
        });
        Self {
            solver_type,
            eps,
            max_iter,
        }
    }

    /// Solve for the put exercise boundary at a single `tau`.
    ///
    /// Returns the number of boundary-equation evaluations spent and the
    /// boundary value.
    pub(crate) fn put_boundary_at_tau(
        &self,
        s: Real,
        strike: Real,
        r: Rate,
        q: Rate,
        vol: Volatility,
        tau: Time,
    ) -> Result<(usize, Real)> {
        if tau < f64::EPSILON {
            return Ok((0, x_max(strike, r, q)));
        }

        let eval = QdPlusBoundaryEvaluator::new(s, strike, r, q, vol, tau);

        let x = match self.solver_type {
            SolverType::Brent | SolverType::Newton | SolverType::Ridder => {
                self.bracketed_solve(&eval, s, self.solver_type, self.max_iter, None)?
            }
            SolverType::Halley | SolverType::SuperHalley => {
                let x_min = eval.x_min();
                let mut x = eval.x_max();
                let mut fx;
                let mut converged;

                loop {
                    let x_old = x;
                    fx = eval.value(x);
                    let f_prime = eval.derivative(x);
                    let lf = fx * eval.second_derivative(x) / (f_prime * f_prime);
                    let step = if self.solver_type == SolverType::Halley {
                        1.0 / (1.0 - 0.5 * lf) * fx / f_prime
                    } else {
                        (1.0 + 0.5 * lf / (1.0 - lf)) * fx / f_prime
                    };

                    x = x_min.max(x - step);
                    converged = (x - x_old).abs() < 0.5 * self.eps;
                    if converged || eval.evaluations() >= self.max_iter {
                        break;
                    }
                }

                if !converged && !close_enough_default(fx.abs(), 0.0) {
                    x = self.bracketed_solve(&eval, s, SolverType::Brent, 10 * self.max_iter, Some(x))?;
                }
                x
            }
        };

        Ok((eval.evaluations(), x))
    }

    /// Tabulate `y(z) = ln²(B(tau(z))/xmax)` at `n` second-kind Chebyshev
    /// nodes, with `tau(z) = T/4 (1+z)²`.
    pub(crate) fn put_exercise_boundary(
        &self,
        s: Real,
        strike: Real,
        r: Rate,
        q: Rate,
        vol: Volatility,
        maturity: Time,
        n_points: usize,
    ) -> Result<ChebyshevInterpolation> {
        let xmax = x_max(strike, r, q);
        let nodes = chebyshev_nodes(n_points, ChebyshevPointsType::SecondKind);
        let mut ys = Vec::with_capacity(n_points);
        for &z in &nodes {
            let tau = 0.25 * maturity * (1.0 + z) * (1.0 + z);
            let (_, b) = self.put_boundary_at_tau(s, strike, r, q, vol, tau)?;
            let l = (b / xmax).ln();
            ys.push(l * l);
        }
        ChebyshevInterpolation::new(&ys, ChebyshevPointsType::SecondKind)
    }

    fn bracketed_solve(
        &self,
        eval: &QdPlusBoundaryEvaluator,
        s: Real,
        solver: SolverType,
        max_iter: usize,
        guess: Option<Real>,
    ) -> Result<Real> {
        let x_min = eval.x_min();
        let f_xmin = eval.value(x_min);

        let mut x_max = (0.5 * (eval.x_max() + s)).max(eval.x_max());
        while eval.value(x_max) * f_xmin > 0.0 && eval.evaluations() < max_iter {
            x_max *= 2.0;
        }

        let mut guess = guess.unwrap_or(0.5 * (x_max + s));
        if guess >= x_max {
            guess = x_max - f64::EPSILON.max(x_max.abs() * f64::EPSILON);
        } else if guess <= x_min {
            guess = x_min + f64::EPSILON.max(x_min.abs() * f64::EPSILON);
        }

        match solver {
            SolverType::Brent => brent(|x| eval.value(x), x_min, x_max, self.eps, max_iter),
            SolverType::Ridder => ridder(|x| eval.value(x), x_min, x_max, self.eps, max_iter),
            SolverType::Newton => newton(
                |x| (eval.value(x), eval.derivative(x)),
                guess,
                x_min,
                x_max,
                self.eps,
                max_iter,
            ),
            _ => fail!("unsupported bracketing solver"),
        }
    }
}

/// American engine based on the QD+ boundary approximation.
#[derive(Debug)]
pub struct QdPlusAmericanEngine<P> {
    process: P,
    interpolation_points: usize,
    solver: QdPlusBoundarySolver,
}

impl<P: BlackScholesProcess> QdPlusAmericanEngine<P> {
    /// Create an engine with the default settings: 8 interpolation
    /// points, Halley iterations, accuracy 1e-6.
    pub fn new(process: P) -> Self {
        Self::with_params(process, 8, SolverType::Halley, 1e-6, None)
    }

    /// Create an engine with explicit settings. `max_iter` defaults to
    /// 100 for the bracketing solvers and 10 for the Halley family.
    pub fn with_params(
        process: P,
        interpolation_points: usize,
        solver_type: SolverType,
        eps: Real,
        max_iter: Option<usize>,
    ) -> Self {
        Self {
            process,
            interpolation_points,
            solver: QdPlusBoundarySolver::new(solver_type, eps, max_iter),
        }
    }

    /// The put exercise boundary at a single `tau`, together with the
    /// number of boundary-equation evaluations spent finding it.
    pub fn put_exercise_boundary_at_tau(
        &self,
        s: Real,
        strike: Real,
        r: Rate,
        q: Rate,
        vol: Volatility,
        tau: Time,
    ) -> Result<(usize, Real)> {
        self.solver.put_boundary_at_tau(s, strike, r, q, vol, tau)
    }

    /// Tabulate the put exercise boundary over `[0, maturity]` as a
    /// Chebyshev interpolation of `y(z) = ln²(B(tau(z))/xmax)` at the
    /// engine's interpolation points.
    pub fn put_exercise_boundary(
        &self,
        s: Real,
        strike: Real,
        r: Rate,
        q: Rate,
        vol: Volatility,
        maturity: Time,
    ) -> Result<ChebyshevInterpolation> {
        self.solver
            .put_exercise_boundary(s, strike, r, q, vol, maturity, self.interpolation_points)
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

        let q_z = self.put_exercise_boundary(s, strike, r, q, vol, t)?;
        let xmax = x_max(strike, r, q);
        let aov = QdPlusAddOnValue::new(t, s, strike, r, q, vol, xmax, &q_z);
        let integrand = |z: Real| aov.value(z);

        let eps = self.solver.eps;
        let add_on = match TanhSinhIntegral::new(eps, 15)
            .and_then(|ts| ts.integrate(&integrand, 0.0, t.sqrt()))
        {
            Ok(v) => v,
            Err(_) => GaussLobattoIntegral::new(0.1 * eps, 100_000)
                .integrate(&integrand, 0.0, t.sqrt())?,
        };

        ensure!(add_on > -10.0 * eps, "negative early exercise value {add_on}");

        let european = BlackCalculator::vanilla(
            OptionType::Put,
            strike,
            s * ((r - q) * t).exp(),
            vol * t.sqrt(),
            (-r * t).exp(),
        )?
        .value()
        .max(0.0);

        Ok(european + add_on.max(0.0))
    }
}

impl<P: BlackScholesProcess> PricingEngine<VanillaOptionArguments> for QdPlusAmericanEngine<P> {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<PricingResults> {
        let inputs = american::extract_inputs(&self.process, args)?;
        let npv = american::american_value(&inputs, |s, k, r, q, vol, t| {
            self.calculate_put(s, k, r, q, vol, t)
        })?;
        Ok(PricingResults::from_npv(npv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alo_instruments::{Exercise, Payoff, VanillaOption};
    use alo_processes::FlatBlackScholesProcess;
    use approx::assert_relative_eq;

    fn american_put_args(strike: Real, t: Time) -> VanillaOptionArguments {
        *VanillaOption::new(
            Payoff::plain_vanilla(OptionType::Put, strike),
            Exercise::american(t).unwrap(),
        )
        .unwrap()
        .arguments()
    }

    #[test]
    fn x_max_table() {
        assert_relative_eq!(x_max(100.0, 0.05, 0.02), 100.0);
        assert_relative_eq!(x_max(100.0, 0.02, 0.05), 100.0 * 0.02 / 0.05);
        assert_relative_eq!(x_max(100.0, 0.05, -0.01), 100.0);
        assert_relative_eq!(x_max(100.0, 0.05, 0.0), 100.0);
        assert_eq!(x_max(100.0, 0.0, 0.01), 0.0);
        assert_relative_eq!(x_max(100.0, 0.0, -0.01), 100.0);
        assert_eq!(x_max(100.0, -0.01, 0.02), 0.0);
        assert_relative_eq!(x_max(100.0, -0.01, -0.05), 100.0);
        assert_eq!(x_max(100.0, -0.05, -0.01), 0.0);
    }

    #[test]
    fn boundary_at_zero_tau_is_x_max() {
        let solver = QdPlusBoundarySolver::new(SolverType::Halley, 1e-6, None);
        let (evals, b) = solver
            .put_boundary_at_tau(100.0, 100.0, 0.05, 0.02, 0.25, 0.0)
            .unwrap();
        assert_eq!(evals, 0);
        assert_relative_eq!(b, x_max(100.0, 0.05, 0.02));
    }

    #[test]
    fn boundary_is_below_x_max_and_positive() {
        let solver = QdPlusBoundarySolver::new(SolverType::Halley, 1e-6, None);
        let (_, b) = solver
            .put_boundary_at_tau(100.0, 100.0, 0.05, 0.0, 0.25, 1.0)
            .unwrap();
        assert!(b > 0.0);
        assert!(b <= x_max(100.0, 0.05, 0.0) + 1e-12, "boundary {b}");
    }

    #[test]
    fn solver_families_agree_on_the_boundary() {
        let (s, k, r, q, vol, tau) = (90.0, 100.0, 0.05, 0.02, 0.25, 0.75);
        let halley = QdPlusBoundarySolver::new(SolverType::Halley, 1e-8, None)
            .put_boundary_at_tau(s, k, r, q, vol, tau)
            .unwrap()
            .1;
        let super_halley = QdPlusBoundarySolver::new(SolverType::SuperHalley, 1e-8, None)
            .put_boundary_at_tau(s, k, r, q, vol, tau)
            .unwrap()
            .1;
        let brent_b = QdPlusBoundarySolver::new(SolverType::Brent, 1e-8, None)
            .put_boundary_at_tau(s, k, r, q, vol, tau)
            .unwrap()
            .1;
        assert_relative_eq!(halley, super_halley, max_relative = 1e-5);
        assert_relative_eq!(halley, brent_b, max_relative = 1e-5);
    }

    #[test]
    fn zero_vol_put_is_exact() {
        let process = FlatBlackScholesProcess::new(90.0, 0.05, 0.0, 0.0).unwrap();
        let engine = QdPlusAmericanEngine::new(process);
        let results = engine.calculate(&american_put_args(100.0, 1.0)).unwrap();
        assert_eq!(results.npv, 10.0);
    }

    #[test]
    fn american_put_dominates_european() {
        let process = FlatBlackScholesProcess::new(100.0, 0.05, 0.02, 0.25).unwrap();
        let engine = QdPlusAmericanEngine::new(process);
        let american = engine.calculate(&american_put_args(100.0, 1.0)).unwrap().npv;

        let european = BlackCalculator::vanilla(
            OptionType::Put,
            100.0,
            100.0 * (0.03_f64).exp(),
            0.25,
            (-0.05_f64).exp(),
        )
        .unwrap()
        .value();

        assert!(american >= european, "american {american} < european {european}");
        assert!(american >= 0.0);
    }

    #[test]
    fn deep_itm_put_is_at_least_intrinsic() {
        let process = FlatBlackScholesProcess::new(60.0, 0.05, 0.0, 0.25).unwrap();
        let engine = QdPlusAmericanEngine::new(process);
        let value = engine.calculate(&american_put_args(100.0, 1.0)).unwrap().npv;
        assert!(value >= 40.0 - 0.05, "deep ITM put {value} below intrinsic");
    }

    #[test]
    fn longstaff_schwartz_benchmark_put() {
        // S=36, K=40, r=6%, q=0, sigma=20%, T=1; finite-difference
        // reference value 4.478.
        let process = FlatBlackScholesProcess::new(36.0, 0.06, 0.0, 0.2).unwrap();
        let engine = QdPlusAmericanEngine::new(process);
        let value = engine.calculate(&american_put_args(40.0, 1.0)).unwrap().npv;
        assert!((value - 4.478).abs() < 0.05, "got {value}");
    }

    #[test]
    fn call_with_zero_dividend_equals_european() {
        let process = FlatBlackScholesProcess::new(100.0, 0.05, 0.0, 0.25).unwrap();
        let engine = QdPlusAmericanEngine::new(process);
        let args = *VanillaOption::new(
            Payoff::plain_vanilla(OptionType::Call, 90.0),
            Exercise::american(1.0).unwrap(),
        )
        .unwrap()
        .arguments();
        let value = engine.calculate(&args).unwrap().npv;

        let european = BlackCalculator::vanilla(
            OptionType::Call,
            90.0,
            100.0 * (0.05_f64).exp(),
            0.25,
            (-0.05_f64).exp(),
        )
        .unwrap()
        .value();
        assert_relative_eq!(value, european, max_relative = 1e-10);
    }

    #[test]
    fn european_exercise_rejected() {
        let process = FlatBlackScholesProcess::new(100.0, 0.05, 0.0, 0.25).unwrap();
        let engine = QdPlusAmericanEngine::new(process);
        let args = *VanillaOption::new(
            Payoff::plain_vanilla(OptionType::Put, 100.0),
            Exercise::european(1.0).unwrap(),
        )
        .unwrap()
        .arguments();
        assert!(engine.calculate(&args).is_err());
    }

    #[test]
    fn digital_payoff_rejected() {
        let process = FlatBlackScholesProcess::new(100.0, 0.05, 0.0, 0.25).unwrap();
        let engine = QdPlusAmericanEngine::new(process);
        let args = *VanillaOption::new(
            Payoff::cash_or_nothing(OptionType::Put, 100.0, 5.0),
            Exercise::american(1.0).unwrap(),
        )
        .unwrap()
        .arguments();
        assert!(engine.calculate(&args).is_err());
    }
}
