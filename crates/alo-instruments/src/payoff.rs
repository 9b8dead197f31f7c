//! Option payoffs.
//!
//! Payoffs describe the terminal (or exercise) payoff of an option as a
//! function of the underlying asset price. The set of payoffs the Black
//! calculator knows how to price is closed and small, so it is a tagged
//! enum: the calculator's initialization is a single `match` instead of
//! a visitor graph.

use alo_core::Real;
use std::fmt;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    /// A call option (right to buy).
    Call,
    /// A put option (right to sell).
    Put,
}

impl OptionType {
    /// +1 for Call, -1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// A striked option payoff.
///
/// Every variant carries its type and strike; the digital variants add
/// the payout-defining extra field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payoff {
    /// `max(φ(S - K), 0)` where `φ = +1` for Call, `-1` for Put.
    PlainVanilla {
        /// Option type.
        option_type: OptionType,
        /// Strike price.
        strike: Real,
    },
    /// Pays a fixed cash amount if in the money.
    CashOrNothing {
        /// Option type.
        option_type: OptionType,
        /// Strike price.
        strike: Real,
        /// Fixed cash payoff.
        cash_payoff: Real,
    },
    /// Pays the underlying price if in the money.
    AssetOrNothing {
        /// Option type.
        option_type: OptionType,
        /// Strike price.
        strike: Real,
    },
    /// `φ(S - K₂)` when triggered by `φ(S - K₁) ≥ 0`.
    Gap {
        /// Option type.
        option_type: OptionType,
        /// Trigger strike `K₁`.
        strike: Real,
        /// Payout strike `K₂`.
        second_strike: Real,
    },
}

impl Payoff {
    /// Create a plain vanilla payoff.
    pub fn plain_vanilla(option_type: OptionType, strike: Real) -> Self {
        Payoff::PlainVanilla {
            option_type,
            strike,
        }
    }

    /// Create a cash-or-nothing payoff.
    pub fn cash_or_nothing(option_type: OptionType, strike: Real, cash_payoff: Real) -> Self {
        Payoff::CashOrNothing {
            option_type,
            strike,
            cash_payoff,
        }
    }

    /// Create an asset-or-nothing payoff.
    pub fn asset_or_nothing(option_type: OptionType, strike: Real) -> Self {
        Payoff::AssetOrNothing {
            option_type,
            strike,
        }
    }

    /// Create a gap payoff.
    pub fn gap(option_type: OptionType, strike: Real, second_strike: Real) -> Self {
        Payoff::Gap {
            option_type,
            strike,
            second_strike,
        }
    }

    /// The option type (call / put).
    pub fn option_type(&self) -> OptionType {
        match *self {
            Payoff::PlainVanilla { option_type, .. }
            | Payoff::CashOrNothing { option_type, .. }
            | Payoff::AssetOrNothing { option_type, .. }
            | Payoff::Gap { option_type, .. } => option_type,
        }
    }

    /// The strike price.
    pub fn strike(&self) -> Real {
        match *self {
            Payoff::PlainVanilla { strike, .. }
            | Payoff::CashOrNothing { strike, .. }
            | Payoff::AssetOrNothing { strike, .. }
            | Payoff::Gap { strike, .. } => strike,
        }
    }

    /// Compute the payoff given the underlying price at exercise/expiry.
    pub fn value(&self, price: Real) -> Real {
        match *self {
            Payoff::PlainVanilla {
                option_type,
                strike,
            } => (option_type.sign() * (price - strike)).max(0.0),
            Payoff::CashOrNothing {
                option_type,
                strike,
                cash_payoff,
            } => {
                if option_type.sign() * (price - strike) > 0.0 {
                    cash_payoff
                } else {
                    0.0
                }
            }
            Payoff::AssetOrNothing {
                option_type,
                strike,
            } => {
                if option_type.sign() * (price - strike) > 0.0 {
                    price
                } else {
                    0.0
                }
            }
            Payoff::Gap {
                option_type,
                strike,
                second_strike,
            } => {
                if option_type.sign() * (price - strike) >= 0.0 {
                    option_type.sign() * (price - second_strike)
                } else {
                    0.0
                }
            }
        }
    }

    /// Human-readable name of the payoff kind.
    pub fn name(&self) -> &'static str {
        match self {
            Payoff::PlainVanilla { .. } => "Vanilla",
            Payoff::CashOrNothing { .. } => "CashOrNothing",
            Payoff::AssetOrNothing { .. } => "AssetOrNothing",
            Payoff::Gap { .. } => "Gap",
        }
    }
}

impl fmt::Display for Payoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {}", self.name(), self.option_type(), self.strike())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_vanilla_call() {
        let p = Payoff::plain_vanilla(OptionType::Call, 100.0);
        assert!((p.value(110.0) - 10.0).abs() < 1e-15);
        assert!((p.value(90.0) - 0.0).abs() < 1e-15);
        assert!((p.value(100.0) - 0.0).abs() < 1e-15);
    }

    #[test]
    fn plain_vanilla_put() {
        let p = Payoff::plain_vanilla(OptionType::Put, 100.0);
        assert!((p.value(90.0) - 10.0).abs() < 1e-15);
        assert!((p.value(110.0) - 0.0).abs() < 1e-15);
    }

    #[test]
    fn cash_or_nothing_call() {
        let p = Payoff::cash_or_nothing(OptionType::Call, 100.0, 1.0);
        assert!((p.value(110.0) - 1.0).abs() < 1e-15);
        assert!((p.value(90.0) - 0.0).abs() < 1e-15);
    }

    #[test]
    fn asset_or_nothing_put() {
        let p = Payoff::asset_or_nothing(OptionType::Put, 100.0);
        assert!((p.value(90.0) - 90.0).abs() < 1e-15);
        assert!((p.value(110.0) - 0.0).abs() < 1e-15);
    }

    #[test]
    fn gap_payoff() {
        let p = Payoff::gap(OptionType::Call, 100.0, 95.0);
        // S = 110: triggered, payoff = 110 - 95 = 15
        assert!((p.value(110.0) - 15.0).abs() < 1e-15);
        assert!((p.value(90.0) - 0.0).abs() < 1e-15);
    }

    #[test]
    fn accessors() {
        let p = Payoff::gap(OptionType::Put, 100.0, 95.0);
        assert_eq!(p.option_type(), OptionType::Put);
        assert!((p.strike() - 100.0).abs() < 1e-15);
        assert_eq!(p.name(), "Gap");
    }
}
