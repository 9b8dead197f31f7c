//! Vanilla options.

use alo_core::{ensure, errors::Result, Real};

use crate::exercise::Exercise;
use crate::instrument::{PricingEngine, PricingResults};
use crate::payoff::Payoff;

/// Arguments handed to a vanilla-option pricing engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanillaOptionArguments {
    /// The option payoff.
    pub payoff: Payoff,
    /// The exercise schedule.
    pub exercise: Exercise,
}

/// An option with a striked payoff and a single expiry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanillaOption {
    arguments: VanillaOptionArguments,
}

impl VanillaOption {
    /// Create a vanilla option from its payoff and exercise.
    pub fn new(payoff: Payoff, exercise: Exercise) -> Result<Self> {
        ensure!(payoff.strike() >= 0.0, "negative strike: {}", payoff.strike());
        Ok(Self {
            arguments: VanillaOptionArguments { payoff, exercise },
        })
    }

    /// The engine arguments for this option.
    pub fn arguments(&self) -> &VanillaOptionArguments {
        &self.arguments
    }

    /// The option payoff.
    pub fn payoff(&self) -> &Payoff {
        &self.arguments.payoff
    }

    /// The exercise schedule.
    pub fn exercise(&self) -> &Exercise {
        &self.arguments.exercise
    }

    /// Price this option with the given engine.
    pub fn npv<E>(&self, engine: &E) -> Result<Real>
    where
        E: PricingEngine<VanillaOptionArguments>,
    {
        Ok(self.price(engine)?.npv)
    }

    /// Price this option with the given engine, returning the full
    /// result set.
    pub fn price<E>(&self, engine: &E) -> Result<PricingResults>
    where
        E: PricingEngine<VanillaOptionArguments>,
    {
        engine.calculate(&self.arguments)
    }
}
