//! # alo-processes
//!
//! Black-Scholes process abstractions consumed by the pricing engines.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod black_scholes;

pub use black_scholes::{BlackScholesProcess, FlatBlackScholesProcess};
