//! # alo
//!
//! American vanilla option pricing via the QD+ approximation (Li, 2009)
//! and the Andersen-Lake-Offengenden fixed-point refinement, plus the
//! Black-76 machinery both build on.
//!
//! This crate is a **façade** that re-exports the public items of the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `alo-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use alo::engines::QdFpAmericanEngine;
//! use alo::instruments::{Exercise, OptionType, Payoff, VanillaOption};
//! use alo::processes::FlatBlackScholesProcess;
//!
//! # fn main() -> alo::core::errors::Result<()> {
//! let process = FlatBlackScholesProcess::new(36.0, 0.06, 0.0, 0.2)?;
//! let option = VanillaOption::new(
//!     Payoff::plain_vanilla(OptionType::Put, 40.0),
//!     Exercise::american(1.0)?,
//! )?;
//!
//! let engine = QdFpAmericanEngine::new(process)?;
//! let npv = option.npv(&engine)?;
//! assert!((npv - 4.478).abs() < 0.01);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use alo_core as core;

/// Mathematical machinery: quadratures, integrators, interpolation,
/// distributions, and root solvers.
pub use alo_math as math;

/// Payoffs, exercise types, and pricing-engine scaffolding.
pub use alo_instruments as instruments;

/// Black-Scholes process abstractions.
pub use alo_processes as processes;

/// Pricing engines.
pub use alo_engines as engines;
