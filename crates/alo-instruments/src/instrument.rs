//! Pricing-engine scaffolding.

use std::collections::HashMap;

use alo_core::{errors::Result, Real};

/// Results produced by a pricing engine.
///
/// Every engine reports an NPV; engines that can also estimate their own
/// numerical error or produce by-products (Greeks, exercise boundaries)
/// attach them here.
#[derive(Debug, Clone, Default)]
pub struct PricingResults {
    /// Net present value.
    pub npv: Real,
    /// Estimate of the numerical error in `npv`, when available.
    pub error_estimate: Option<Real>,
    /// Engine-specific by-products keyed by name.
    pub additional_results: HashMap<String, Real>,
}

impl PricingResults {
    /// Results carrying only an NPV.
    pub fn from_npv(npv: Real) -> Self {
        Self {
            npv,
            ..Self::default()
        }
    }

    /// Attach a named by-product, builder style.
    pub fn with_result(mut self, key: &str, value: Real) -> Self {
        self.additional_results.insert(key.to_string(), value);
        self
    }

    /// Look up a named by-product.
    pub fn result(&self, key: &str) -> Option<Real> {
        self.additional_results.get(key).copied()
    }
}

/// A pricing engine for instruments described by `Args`.
pub trait PricingEngine<Args> {
    /// Price the instrument.
    fn calculate(&self, arguments: &Args) -> Result<PricingResults>;
}
