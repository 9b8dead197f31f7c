//! Exercise schedules.

use alo_core::{ensure, errors::Result, Time};

/// Exercise style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseType {
    /// Exercisable only at expiry.
    European,
    /// Exercisable at any time up to and including expiry.
    American,
}

/// An exercise schedule, expressed in year fractions from the valuation
/// date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exercise {
    exercise_type: ExerciseType,
    expiry: Time,
}

impl Exercise {
    /// A European exercise at time `expiry`.
    pub fn european(expiry: Time) -> Result<Self> {
        ensure!(expiry >= 0.0, "negative time to expiry: {expiry}");
        Ok(Self {
            exercise_type: ExerciseType::European,
            expiry,
        })
    }

    /// An American exercise up to time `expiry`.
    pub fn american(expiry: Time) -> Result<Self> {
        ensure!(expiry >= 0.0, "negative time to expiry: {expiry}");
        Ok(Self {
            exercise_type: ExerciseType::American,
            expiry,
        })
    }

    /// The exercise style.
    pub fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }

    /// Time to expiry in year fractions.
    pub fn expiry(&self) -> Time {
        self.expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction() {
        let e = Exercise::american(1.5).unwrap();
        assert_eq!(e.exercise_type(), ExerciseType::American);
        assert!((e.expiry() - 1.5).abs() < 1e-15);
    }

    #[test]
    fn negative_expiry_rejected() {
        assert!(Exercise::european(-0.1).is_err());
        assert!(Exercise::american(-1.0).is_err());
    }
}
