//! # alo-instruments
//!
//! Option payoffs, exercise specifications, and the pricing-engine
//! scaffolding (argument and result containers) shared by the engines.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod exercise;
pub mod instrument;
pub mod option;
pub mod payoff;

pub use exercise::{Exercise, ExerciseType};
pub use instrument::{PricingEngine, PricingResults};
pub use option::{VanillaOption, VanillaOptionArguments};
pub use payoff::{OptionType, Payoff};
