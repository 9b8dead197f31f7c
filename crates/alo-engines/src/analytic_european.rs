//! Analytic European option engine.
//!
//! Prices European options with the Black formula and reports the full
//! Greek surface as additional results.

use alo_core::{ensure, errors::Result};
use alo_instruments::{ExerciseType, PricingEngine, PricingResults, VanillaOptionArguments};
use alo_processes::BlackScholesProcess;

use crate::black_calculator::BlackCalculator;

/// Analytic pricing engine for European options on a Black-Scholes
/// underlying.
#[derive(Debug)]
pub struct AnalyticEuropeanEngine<P> {
    process: P,
}

impl<P: BlackScholesProcess> AnalyticEuropeanEngine<P> {
    /// Create an engine for the given process.
    pub fn new(process: P) -> Self {
        Self { process }
    }
}

impl<P: BlackScholesProcess> PricingEngine<VanillaOptionArguments> for AnalyticEuropeanEngine<P> {
    fn calculate(&self, args: &VanillaOptionArguments) -> Result<PricingResults> {
        ensure!(
            args.exercise.exercise_type() == ExerciseType::European,
            "not an European option"
        );

        let t = args.exercise.expiry();
        let spot = self.process.spot();
        ensure!(spot > 0.0, "negative or null underlying given");

        let strike = args.payoff.strike();
        let df_r = self.process.discount(t);
        let df_q = self.process.dividend_discount(t);
        let vol = self.process.black_vol(t, strike);
        let std_dev = vol * t.sqrt();
        let forward = spot * df_q / df_r;

        let black = BlackCalculator::new(args.payoff, forward, std_dev, df_r)?;

        let mut results = PricingResults::from_npv(black.value())
            .with_result("delta", black.delta(spot)?)
            .with_result("deltaForward", black.delta_forward())
            .with_result("gamma", black.gamma(spot)?)
            .with_result("elasticity", black.elasticity(spot)?)
            .with_result("strikeSensitivity", black.strike_sensitivity())
            .with_result("itmCashProbability", black.itm_cash_probability())
            .with_result("itmAssetProbability", black.itm_asset_probability());

        // Vega, rho, and the thetas need a positive time to expiry.
        if t > 0.0 {
            results = results
                .with_result("vega", black.vega(t)?)
                .with_result("rho", black.rho(t)?)
                .with_result("divRho", black.dividend_rho(t)?)
                .with_result("theta", black.theta(spot, t)?)
                .with_result("thetaPerDay", black.theta_per_day(spot, t)?);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alo_instruments::{Exercise, OptionType, Payoff, VanillaOption};
    use alo_processes::FlatBlackScholesProcess;
    use approx::assert_relative_eq;

    fn european(payoff: Payoff, t: f64) -> VanillaOptionArguments {
        *VanillaOption::new(payoff, Exercise::european(t).unwrap())
            .unwrap()
            .arguments()
    }

    #[test]
    fn atm_call() {
        // S=100, K=100, r=5%, q=0, sigma=20%, T=1
        let process = FlatBlackScholesProcess::new(100.0, 0.05, 0.0, 0.20).unwrap();
        let engine = AnalyticEuropeanEngine::new(process);
        let results = engine
            .calculate(&european(Payoff::plain_vanilla(OptionType::Call, 100.0), 1.0))
            .unwrap();

        assert_relative_eq!(results.npv, 10.450584, max_relative = 1e-6);
        let delta = results.result("delta").unwrap();
        assert!(delta > 0.5 && delta < 0.8, "delta = {delta}");
        assert!(results.result("gamma").unwrap() > 0.0);
        assert!(results.result("vega").unwrap() > 0.0);
        assert!(results.result("rho").unwrap() > 0.0);
        assert!(results.result("theta").unwrap() < 0.0);
    }

    #[test]
    fn put_call_parity_through_the_engine() {
        let process = FlatBlackScholesProcess::new(100.0, 0.08, 0.03, 0.25).unwrap();
        let engine = AnalyticEuropeanEngine::new(process);

        let call = engine
            .calculate(&european(Payoff::plain_vanilla(OptionType::Call, 105.0), 0.5))
            .unwrap()
            .npv;
        let put = engine
            .calculate(&european(Payoff::plain_vanilla(OptionType::Put, 105.0), 0.5))
            .unwrap()
            .npv;
        let parity = call - 100.0 * (-0.03_f64 * 0.5).exp() + 105.0 * (-0.08_f64 * 0.5).exp();
        assert_relative_eq!(put, parity, epsilon = 1e-12);
    }

    #[test]
    fn digital_payoffs_are_supported() {
        let process = FlatBlackScholesProcess::new(100.0, 0.05, 0.0, 0.20).unwrap();
        let engine = AnalyticEuropeanEngine::new(process);

        let cash = engine
            .calculate(&european(
                Payoff::cash_or_nothing(OptionType::Call, 100.0, 10.0),
                1.0,
            ))
            .unwrap()
            .npv;
        assert!(cash > 0.0 && cash < 10.0, "cash-or-nothing value {cash}");

        let asset = engine
            .calculate(&european(Payoff::asset_or_nothing(OptionType::Call, 100.0), 1.0))
            .unwrap()
            .npv;
        assert!(asset > 0.0 && asset < 100.0, "asset-or-nothing value {asset}");
    }

    #[test]
    fn american_exercise_rejected() {
        let process = FlatBlackScholesProcess::new(100.0, 0.05, 0.0, 0.20).unwrap();
        let engine = AnalyticEuropeanEngine::new(process);
        let args = *VanillaOption::new(
            Payoff::plain_vanilla(OptionType::Call, 100.0),
            Exercise::american(1.0).unwrap(),
        )
        .unwrap()
        .arguments();
        assert!(engine.calculate(&args).is_err());
    }
}
