//! # alo-math
//!
//! Mathematical machinery for the pricing engines: Gaussian quadratures
//! built from orthogonal-polynomial recurrences, adaptive integrators
//! (trapezoid, tanh-sinh, Gauss-Lobatto), Chebyshev interpolation, the
//! normal distribution, and 1-D root solvers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Floating-point comparison utilities.
pub mod comparison;

/// Probability distributions.
pub mod distributions;

/// Numerical integration.
pub mod integrals;

/// 1D interpolation schemes.
pub mod interpolations;

/// Matrix utilities (tridiagonal eigendecomposition).
pub mod matrixutilities;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::{close, close_enough, close_enough_default};
pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use integrals::Integrator;
