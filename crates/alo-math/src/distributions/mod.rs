//! Probability distributions used by the pricing engines.

/// Standard normal distribution functions.
pub mod normal;

pub use normal::{normal_cdf, normal_cdf_inverse, normal_pdf};
