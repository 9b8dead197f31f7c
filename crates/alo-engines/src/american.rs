//! Shared scaffolding for the American engines: argument extraction and
//! the put-call parity reduction with its analytic edge cases.
//!
//! Both QD engines only ever solve for a put boundary. A call is priced
//! through the symmetry `Call(S, K, r, q) = Put(K, S, q, r)`, and the
//! degenerate corners (zero strike, zero spot, never-optimal exercise,
//! zero volatility) are settled analytically before any boundary solve.

use alo_core::{ensure, errors::Result, fail, Rate, Real, Time, Volatility};
use alo_instruments::{ExerciseType, OptionType, Payoff, VanillaOptionArguments};
use alo_math::close_enough_default;
use alo_processes::BlackScholesProcess;

use crate::black_calculator::BlackCalculator;

/// Market inputs for an American vanilla pricing problem.
pub(crate) struct AmericanInputs {
    pub spot: Real,
    pub strike: Real,
    pub rate: Rate,
    pub dividend: Rate,
    pub vol: Volatility,
    pub maturity: Time,
    pub option_type: OptionType,
}

pub(crate) fn extract_inputs<P: BlackScholesProcess>(
    process: &P,
    args: &VanillaOptionArguments,
) -> Result<AmericanInputs> {
    ensure!(
        args.exercise.exercise_type() == ExerciseType::American,
        "not an American option"
    );
    ensure!(
        matches!(args.payoff, Payoff::PlainVanilla { .. }),
        "non-vanilla payoff given: {}",
        args.payoff.name()
    );

    let t = args.exercise.expiry();
    ensure!(t > 0.0, "option is expired");

    let spot = process.spot();
    let strike = args.payoff.strike();
    let rate = -process.discount(t).ln() / t;
    let dividend = -process.dividend_discount(t).ln() / t;
    let vol = process.black_vol(t, strike);

    ensure!(spot >= 0.0, "negative underlying given");
    ensure!(strike >= 0.0, "zero or positive strike is required");
    ensure!(vol >= 0.0, "zero or positive volatility is required");

    Ok(AmericanInputs {
        spot,
        strike,
        rate,
        dividend,
        vol,
        maturity: t,
        option_type: args.payoff.option_type(),
    })
}

/// Price an American vanilla option given a put-boundary solver.
///
/// `calc_put(s, k, r, q, vol, t)` prices the American put away from the
/// degenerate corners; calls are routed through put-call symmetry.
pub(crate) fn american_value<F>(inputs: &AmericanInputs, calc_put: F) -> Result<Real>
where
    F: Fn(Real, Real, Rate, Rate, Volatility, Time) -> Result<Real>,
{
    let AmericanInputs {
        spot: s,
        strike: k,
        rate: r,
        dividend: q,
        vol,
        maturity: t,
        option_type,
    } = *inputs;

    match option_type {
        OptionType::Put => put_with_edge_cases(s, k, r, q, vol, t, calc_put),
        OptionType::Call => put_with_edge_cases(k, s, q, r, vol, t, calc_put),
    }
}

fn put_with_edge_cases<F>(
    s: Real,
    k: Real,
    r: Rate,
    q: Rate,
    vol: Volatility,
    t: Time,
    calc_put: F,
) -> Result<Real>
where
    F: Fn(Real, Real, Rate, Rate, Volatility, Time) -> Result<Real>,
{
    if close_enough_default(k, 0.0) {
        return Ok(0.0);
    }

    if close_enough_default(s, 0.0) {
        return Ok(k.max(k * (-r * t).exp()));
    }

    // Early exercise is never optimal here: the put collapses to its
    // European counterpart.
    if r <= 0.0 && r <= q {
        let black = BlackCalculator::vanilla(
            OptionType::Put,
            k,
            s * ((r - q) * t).exp(),
            vol * t.sqrt(),
            (-r * t).exp(),
        )?;
        return Ok(black.value().max(0.0));
    }

    if close_enough_default(vol, 0.0) {
        // Deterministic underlying: the price is the best discounted
        // intrinsic value over the exercise window. The candidate interior
        // optimum solves r K e^{-rt} = q S e^{-qt}.
        let intrinsic = |u: Time| (k * (-r * u).exp() - s * (-q * u).exp()).max(0.0);
        let npv0 = intrinsic(0.0);
        let npv_t = intrinsic(t);
        let extremum = if close_enough_default(r, q) {
            f64::MAX
        } else {
            (r * k / (q * s)).ln() / (r - q)
        };

        if extremum > 0.0 && extremum < t {
            return Ok(npv0.max(npv_t).max(intrinsic(extremum)));
        }
        return Ok(npv0.max(npv_t));
    }

    calc_put(s, k, r, q, vol, t)
}

pub(crate) fn reject_double_boundary(r: Rate, q: Rate) -> Result<()> {
    if r < 0.0 && q < r {
        fail!("double-boundary case q<r<0 for a put option is given");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_solver(_: Real, _: Real, _: Rate, _: Rate, _: Volatility, _: Time) -> Result<Real> {
        fail!("boundary solver should not be reached");
    }

    #[test]
    fn zero_strike_is_worthless() {
        let inputs = AmericanInputs {
            spot: 100.0,
            strike: 0.0,
            rate: 0.05,
            dividend: 0.0,
            vol: 0.2,
            maturity: 1.0,
            option_type: OptionType::Put,
        };
        assert_eq!(american_value(&inputs, no_solver).unwrap(), 0.0);
    }

    #[test]
    fn zero_spot_put_is_best_discounted_strike() {
        let inputs = AmericanInputs {
            spot: 0.0,
            strike: 100.0,
            rate: 0.05,
            dividend: 0.0,
            vol: 0.2,
            maturity: 1.0,
            option_type: OptionType::Put,
        };
        // Immediate exercise beats waiting when r > 0.
        assert_eq!(american_value(&inputs, no_solver).unwrap(), 100.0);
    }

    #[test]
    fn zero_vol_put_is_max_discounted_intrinsic() {
        // K=100, S=90, r=5%, q=0, T=1: exercising now pays exactly 10.
        let inputs = AmericanInputs {
            spot: 90.0,
            strike: 100.0,
            rate: 0.05,
            dividend: 0.0,
            vol: 0.0,
            maturity: 1.0,
            option_type: OptionType::Put,
        };
        assert_eq!(american_value(&inputs, no_solver).unwrap(), 10.0);
    }

    #[test]
    fn zero_vol_interior_extremum() {
        // r and q both positive with q large: the best exercise time is
        // strictly inside (0, T).
        let (s, k, r, q, t) = (100.0, 100.0, 0.05, 0.15, 5.0);
        let inputs = AmericanInputs {
            spot: s,
            strike: k,
            rate: r,
            dividend: q,
            vol: 0.0,
            maturity: t,
            option_type: OptionType::Put,
        };
        let value = american_value(&inputs, no_solver).unwrap();
        let u = (r * k / (q * s)).ln() / (r - q);
        assert!(u > 0.0 && u < t);
        let expected = (k * (-r * u).exp() - s * (-q * u).exp()).max(0.0);
        assert!((value - expected).abs() < 1e-12, "got {value}, want {expected}");
    }

    #[test]
    fn negative_rate_put_collapses_to_european() {
        // r <= 0 and r <= q: no early exercise premium.
        let inputs = AmericanInputs {
            spot: 100.0,
            strike: 100.0,
            rate: -0.01,
            dividend: 0.0,
            vol: 0.2,
            maturity: 1.0,
            option_type: OptionType::Put,
        };
        let value = american_value(&inputs, no_solver).unwrap();
        let european = BlackCalculator::vanilla(
            OptionType::Put,
            100.0,
            100.0 * (-0.01_f64).exp(),
            0.2,
            (0.01_f64).exp(),
        )
        .unwrap()
        .value();
        assert!((value - european).abs() < 1e-12);
    }

    #[test]
    fn call_with_zero_dividend_collapses_to_european() {
        // Swapping to Put(K, S, q, r) lands in the r<=0, r<=q branch.
        let inputs = AmericanInputs {
            spot: 100.0,
            strike: 90.0,
            rate: 0.05,
            dividend: 0.0,
            vol: 0.25,
            maturity: 1.0,
            option_type: OptionType::Call,
        };
        let value = american_value(&inputs, no_solver).unwrap();
        let european = BlackCalculator::vanilla(
            OptionType::Call,
            90.0,
            100.0 * (0.05_f64).exp(),
            0.25,
            (-0.05_f64).exp(),
        )
        .unwrap()
        .value();
        assert!((value - european).abs() < 1e-10, "got {value}, want {european}");
    }

    #[test]
    fn double_boundary_rejected() {
        assert!(reject_double_boundary(-0.02, -0.05).is_err());
        assert!(reject_double_boundary(0.05, 0.02).is_ok());
        assert!(reject_double_boundary(-0.05, -0.02).is_ok());
    }
}
