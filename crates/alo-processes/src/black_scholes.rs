//! Black-Scholes processes.
//!
//! `dS/S = (r − q) dt + σ dW`
//!
//! where `r` is the continuously-compounded risk-free rate, `q` the
//! continuous dividend yield, and `σ` the Black volatility. The engines
//! only ever query discount factors and volatilities through the trait,
//! so a richer term-structure-backed process can be slotted in without
//! touching them.

use alo_core::{ensure, errors::Result, Rate, Real, Time, Volatility};

/// A Black-Scholes diffusion seen through the quantities the engines
/// actually need.
pub trait BlackScholesProcess {
    /// The spot price of the underlying.
    fn spot(&self) -> Real;

    /// Discount factor `e^{-r(t)·t}` of the risk-free curve at time `t`.
    fn discount(&self, t: Time) -> Real;

    /// Discount factor `e^{-q(t)·t}` of the dividend curve at time `t`.
    fn dividend_discount(&self, t: Time) -> Real;

    /// Black volatility for expiry `t` and strike `strike`.
    fn black_vol(&self, t: Time, strike: Real) -> Volatility;

    /// Continuously-compounded zero rate of the risk-free curve at `t`.
    fn risk_free_rate(&self, t: Time) -> Rate {
        if t > 0.0 {
            -self.discount(t).ln() / t
        } else {
            -self.discount(1.0e-8).ln() / 1.0e-8
        }
    }

    /// Continuously-compounded zero rate of the dividend curve at `t`.
    fn dividend_yield(&self, t: Time) -> Rate {
        if t > 0.0 {
            -self.dividend_discount(t).ln() / t
        } else {
            -self.dividend_discount(1.0e-8).ln() / 1.0e-8
        }
    }

    /// Forward price of the underlying at time `t`.
    fn forward(&self, t: Time) -> Real {
        self.spot() * self.dividend_discount(t) / self.discount(t)
    }
}

/// A Black-Scholes process with flat rates and volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatBlackScholesProcess {
    spot: Real,
    risk_free_rate: Rate,
    dividend_yield: Rate,
    volatility: Volatility,
}

impl FlatBlackScholesProcess {
    /// Create a flat process from spot, rates, and volatility.
    pub fn new(
        spot: Real,
        risk_free_rate: Rate,
        dividend_yield: Rate,
        volatility: Volatility,
    ) -> Result<Self> {
        ensure!(spot >= 0.0, "negative spot: {spot}");
        ensure!(volatility >= 0.0, "negative volatility: {volatility}");
        Ok(Self {
            spot,
            risk_free_rate,
            dividend_yield,
            volatility,
        })
    }
}

impl BlackScholesProcess for FlatBlackScholesProcess {
    fn spot(&self) -> Real {
        self.spot
    }

    fn discount(&self, t: Time) -> Real {
        (-self.risk_free_rate * t).exp()
    }

    fn dividend_discount(&self, t: Time) -> Real {
        (-self.dividend_yield * t).exp()
    }

    fn black_vol(&self, _t: Time, _strike: Real) -> Volatility {
        self.volatility
    }
}
