//! Black 1976 calculator.
//!
//! Works in forward terms: given the forward price, the total standard
//! deviation `σ√T`, and a discount factor, it produces the option value
//! and the full Greek surface. The spot-dependent Greeks take the spot
//! as an argument so the calculator stays curve-agnostic.
//!
//! When the standard deviation is zero, delta, gamma, rho, vega, and the
//! strike sensitivities divide by zero; the degenerate branches below
//! pin d1/d2 at the appropriate limits so the value itself stays exact.

use alo_core::{ensure, errors::Result, Real};
use alo_instruments::{OptionType, Payoff};
use alo_math::{close_enough_default, normal_cdf, normal_pdf};

/// Black 1976 calculator for striked payoffs.
#[derive(Debug, Clone)]
pub struct BlackCalculator {
    strike: Real,
    forward: Real,
    std_dev: Real,
    discount: Real,
    variance: Real,
    d1: Real,
    d2: Real,
    alpha: Real,
    beta: Real,
    dalpha_dd1: Real,
    dbeta_dd2: Real,
    n_d1: Real,
    cum_d1: Real,
    n_d2: Real,
    cum_d2: Real,
    x: Real,
    dx_ds: Real,
    dx_dstrike: Real,
}

impl BlackCalculator {
    /// Create a calculator for the given payoff.
    ///
    /// `forward` is the forward price of the underlying, `std_dev` the
    /// total standard deviation `σ√T`, and `discount` the discount
    /// factor to expiry.
    pub fn new(payoff: Payoff, forward: Real, std_dev: Real, discount: Real) -> Result<Self> {
        let strike = payoff.strike();
        ensure!(strike >= 0.0, "strike ({strike}) must be non-negative");
        ensure!(forward > 0.0, "forward ({forward}) must be positive");
        ensure!(std_dev >= 0.0, "stdDev ({std_dev}) must be non-negative");
        ensure!(discount > 0.0, "discount ({discount}) must be positive");

        let (d1, d2, cum_d1, cum_d2, n_d1, n_d2) = if std_dev >= f64::EPSILON {
            if close_enough_default(strike, 0.0) {
                (f64::MAX, f64::MAX, 1.0, 1.0, 0.0, 0.0)
            } else {
                let d1 = (forward / strike).ln() / std_dev + 0.5 * std_dev;
                let d2 = d1 - std_dev;
                (d1, d2, normal_cdf(d1), normal_cdf(d2), normal_pdf(d1), normal_pdf(d2))
            }
        } else if close_enough_default(forward, strike) {
            let n = (2.0 / std::f64::consts::PI).sqrt();
            (0.0, 0.0, 0.5, 0.5, n, n)
        } else if forward > strike {
            (f64::MAX, f64::MAX, 1.0, 1.0, 0.0, 0.0)
        } else {
            (f64::MIN, f64::MIN, 0.0, 0.0, 0.0, 0.0)
        };

        let mut calc = Self {
            strike,
            forward,
            std_dev,
            discount,
            variance: std_dev * std_dev,
            d1,
            d2,
            alpha: 0.0,
            beta: 0.0,
            dalpha_dd1: 0.0,
            dbeta_dd2: 0.0,
            n_d1,
            cum_d1,
            n_d2,
            cum_d2,
            x: strike,
            dx_ds: 0.0,
            dx_dstrike: 1.0,
        };

        // Plain-vanilla coefficients first; the digital payoffs then
        // overwrite the pieces they change.
        match payoff.option_type() {
            OptionType::Call => {
                calc.alpha = calc.cum_d1; //  N(d1)
                calc.dalpha_dd1 = calc.n_d1; //  n(d1)
                calc.beta = -calc.cum_d2; // -N(d2)
                calc.dbeta_dd2 = -calc.n_d2; // -n(d2)
            }
            OptionType::Put => {
                calc.alpha = -1.0 + calc.cum_d1; // -N(-d1)
                calc.dalpha_dd1 = calc.n_d1; //  n( d1)
                calc.beta = 1.0 - calc.cum_d2; //  N(-d2)
                calc.dbeta_dd2 = -calc.n_d2; // -n( d2)
            }
        }

        match payoff {
            Payoff::PlainVanilla { .. } => {}
            Payoff::CashOrNothing {
                option_type,
                cash_payoff,
                ..
            } => {
                calc.alpha = 0.0;
                calc.dalpha_dd1 = 0.0;
                calc.x = cash_payoff;
                calc.dx_dstrike = 0.0;
                match option_type {
                    OptionType::Call => {
                        calc.beta = calc.cum_d2;
                        calc.dbeta_dd2 = calc.n_d2;
                    }
                    OptionType::Put => {
                        calc.beta = 1.0 - calc.cum_d2;
                        calc.dbeta_dd2 = -calc.n_d2;
                    }
                }
            }
            Payoff::AssetOrNothing { option_type, .. } => {
                calc.beta = 0.0;
                calc.dbeta_dd2 = 0.0;
                match option_type {
                    OptionType::Call => {
                        calc.alpha = calc.cum_d1;
                        calc.dalpha_dd1 = calc.n_d1;
                    }
                    OptionType::Put => {
                        calc.alpha = 1.0 - calc.cum_d1;
                        calc.dalpha_dd1 = -calc.n_d1;
                    }
                }
            }
            Payoff::Gap { second_strike, .. } => {
                calc.x = second_strike;
                calc.dx_dstrike = 0.0;
            }
        }

        Ok(calc)
    }

    /// Shorthand for a plain-vanilla payoff.
    pub fn vanilla(
        option_type: OptionType,
        strike: Real,
        forward: Real,
        std_dev: Real,
        discount: Real,
    ) -> Result<Self> {
        Self::new(
            Payoff::plain_vanilla(option_type, strike),
            forward,
            std_dev,
            discount,
        )
    }

    /// The option value.
    pub fn value(&self) -> Real {
        self.discount * (self.forward * self.alpha + self.x * self.beta)
    }

    /// Sensitivity to change in the underlying forward price.
    pub fn delta_forward(&self) -> Real {
        let temp = self.std_dev * self.forward;
        let dalpha_dforward = self.dalpha_dd1 / temp;
        let dbeta_dforward = self.dbeta_dd2 / temp;
        // dx/dforward = 0
        self.discount * (dalpha_dforward * self.forward + self.alpha + dbeta_dforward * self.x)
    }

    /// Sensitivity to change in the underlying spot price.
    pub fn delta(&self, spot: Real) -> Result<Real> {
        ensure!(spot > 0.0, "positive spot value required: {spot} not allowed");

        let dforward_ds = self.forward / spot;
        let temp = self.std_dev * spot;
        let dalpha_ds = self.dalpha_dd1 / temp;
        let dbeta_ds = self.dbeta_dd2 / temp;
        Ok(self.discount
            * (dalpha_ds * self.forward
                + self.alpha * dforward_ds
                + dbeta_ds * self.x
                + self.beta * self.dx_ds))
    }

    /// Percent sensitivity to a percent change in the forward price.
    pub fn elasticity_forward(&self) -> Real {
        let val = self.value();
        let del = self.delta_forward();
        if val > f64::EPSILON {
            del / val * self.forward
        } else if del.abs() < f64::EPSILON {
            0.0
        } else if del > 0.0 {
            f64::MAX
        } else {
            f64::MIN
        }
    }

    /// Percent sensitivity to a percent change in the spot price.
    pub fn elasticity(&self, spot: Real) -> Result<Real> {
        let val = self.value();
        let del = self.delta(spot)?;
        Ok(if val > f64::EPSILON {
            del / val * spot
        } else if del.abs() < f64::EPSILON {
            0.0
        } else if del > 0.0 {
            f64::MAX
        } else {
            f64::MIN
        })
    }

    /// Second-order sensitivity to the forward price.
    pub fn gamma_forward(&self) -> Real {
        let temp = self.std_dev * self.forward;
        let dalpha_dforward = self.dalpha_dd1 / temp;
        let dbeta_dforward = self.dbeta_dd2 / temp;

        let d2alpha_dforward2 = -dalpha_dforward / self.forward * (1.0 + self.d1 / self.std_dev);
        let d2beta_dforward2 = -dbeta_dforward / self.forward * (1.0 + self.d2 / self.std_dev);

        self.discount
            * (d2alpha_dforward2 * self.forward + 2.0 * dalpha_dforward + d2beta_dforward2 * self.x)
    }

    /// Second-order sensitivity to the spot price.
    pub fn gamma(&self, spot: Real) -> Result<Real> {
        ensure!(spot > 0.0, "positive spot value required: {spot} not allowed");

        let dforward_ds = self.forward / spot;
        let temp = self.std_dev * spot;
        let dalpha_ds = self.dalpha_dd1 / temp;
        let dbeta_ds = self.dbeta_dd2 / temp;

        let d2alpha_ds2 = -dalpha_ds / spot * (1.0 + self.d1 / self.std_dev);
        let d2beta_ds2 = -dbeta_ds / spot * (1.0 + self.d2 / self.std_dev);

        Ok(self.discount
            * (d2alpha_ds2 * self.forward
                + 2.0 * dalpha_ds * dforward_ds
                + d2beta_ds2 * self.x
                + 2.0 * dbeta_ds * self.dx_ds))
    }

    /// Sensitivity to time to maturity.
    pub fn theta(&self, spot: Real, maturity: Real) -> Result<Real> {
        ensure!(maturity >= 0.0, "maturity ({maturity}) must be non-negative");
        if close_enough_default(maturity, 0.0) {
            return Ok(0.0);
        }
        Ok(-(self.discount.ln() * self.value()
            + (self.forward / spot).ln() * spot * self.delta(spot)?
            + 0.5 * self.variance * spot * spot * self.gamma(spot)?)
            / maturity)
    }

    /// Theta per calendar day, assuming 365 days per year.
    pub fn theta_per_day(&self, spot: Real, maturity: Real) -> Result<Real> {
        Ok(self.theta(spot, maturity)? / 365.0)
    }

    /// Sensitivity to volatility.
    pub fn vega(&self, maturity: Real) -> Result<Real> {
        ensure!(maturity >= 0.0, "negative maturity not allowed");

        let temp = (self.strike / self.forward).ln() / self.variance;
        // dalpha/dsigma, up to a factor sqrt(T)
        let dalpha_dsigma = self.dalpha_dd1 * (temp + 0.5);
        let dbeta_dsigma = self.dbeta_dd2 * (temp - 0.5);

        Ok(self.discount * maturity.sqrt() * (dalpha_dsigma * self.forward + dbeta_dsigma * self.x))
    }

    /// Sensitivity to the discounting rate.
    pub fn rho(&self, maturity: Real) -> Result<Real> {
        ensure!(maturity >= 0.0, "negative maturity not allowed");

        // dalpha/dr, up to a factor T
        let dalpha_dr = self.dalpha_dd1 / self.std_dev;
        let dbeta_dr = self.dbeta_dd2 / self.std_dev;
        let temp = dalpha_dr * self.forward + self.alpha * self.forward + dbeta_dr * self.x;

        Ok(maturity * (self.discount * temp - self.value()))
    }

    /// Sensitivity to the dividend/growth rate.
    pub fn dividend_rho(&self, maturity: Real) -> Result<Real> {
        ensure!(maturity >= 0.0, "negative maturity not allowed");

        // dalpha/dq, up to a factor T
        let dalpha_dq = -self.dalpha_dd1 / self.std_dev;
        let dbeta_dq = -self.dbeta_dd2 / self.std_dev;
        let temp = dalpha_dq * self.forward - self.alpha * self.forward + dbeta_dq * self.x;

        Ok(maturity * self.discount * temp)
    }

    /// Sensitivity to the strike.
    pub fn strike_sensitivity(&self) -> Real {
        let temp = self.std_dev * self.strike;
        let dalpha_dstrike = -self.dalpha_dd1 / temp;
        let dbeta_dstrike = -self.dbeta_dd2 / temp;

        self.discount
            * (dalpha_dstrike * self.forward
                + dbeta_dstrike * self.x
                + self.beta * self.dx_dstrike)
    }

    /// Second-order sensitivity to the strike.
    pub fn strike_gamma(&self) -> Real {
        let temp = self.std_dev * self.strike;
        let dalpha_dstrike = -self.dalpha_dd1 / temp;
        let dbeta_dstrike = -self.dbeta_dd2 / temp;

        let d2alpha_d2strike = -dalpha_dstrike / self.strike * (1.0 - self.d1 / self.std_dev);
        let d2beta_d2strike = -dbeta_dstrike / self.strike * (1.0 - self.d2 / self.std_dev);

        self.discount
            * (d2alpha_d2strike * self.forward
                + d2beta_d2strike * self.x
                + 2.0 * dbeta_dstrike * self.dx_dstrike)
    }

    /// Probability of ending in the money under the bond martingale
    /// measure, i.e. `N(d2)`. Risk-neutral, not real-world.
    pub fn itm_cash_probability(&self) -> Real {
        self.cum_d2
    }

    /// Probability of ending in the money under the asset martingale
    /// measure, i.e. `N(d1)`. Risk-neutral, not real-world.
    pub fn itm_asset_probability(&self) -> Real {
        self.cum_d1
    }

    /// The `alpha` coefficient multiplying the forward in the value.
    pub fn alpha(&self) -> Real {
        self.alpha
    }

    /// The `beta` coefficient multiplying the cash component.
    pub fn beta(&self) -> Real {
        self.beta
    }
}
