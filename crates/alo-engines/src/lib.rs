//! # alo-engines
//!
//! Pricing engines for vanilla equity options:
//!
//! * [`BlackCalculator`] — the Black 1976 formula and its Greek surface,
//!   shared by every engine.
//! * [`AnalyticEuropeanEngine`] — closed-form European pricing.
//! * [`QdPlusAmericanEngine`] — the QD+ approximation to the American
//!   exercise boundary (Li, 2009). Fast, and the warm start for the
//!   fixed-point engine.
//! * [`QdFpAmericanEngine`] — fixed-point refinement of the exercise
//!   boundary (Andersen, Lake and Offengenden, 2015).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod american;

pub mod analytic_european;
pub mod black_calculator;
pub mod qdfp;
pub mod qdplus;

pub use analytic_european::AnalyticEuropeanEngine;
pub use black_calculator::BlackCalculator;
pub use qdfp::{FixedPointEquation, QdFpAmericanEngine, QdFpIterationScheme};
pub use qdplus::{QdPlusAmericanEngine, SolverType};
