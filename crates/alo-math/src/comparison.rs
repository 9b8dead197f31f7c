//! Tolerance-based floating-point comparison.

use alo_core::Real;

/// Default number of machine epsilons used by [`close_enough_default`].
pub const DEFAULT_ULPS: u32 = 42;

/// Return `true` if `|a - b| <= epsilon`.
#[inline]
pub fn close(a: Real, b: Real, epsilon: Real) -> bool {
    (a - b).abs() <= epsilon
}

/// Return `true` if `|a - b| <= n * epsilon` where `epsilon` is the
/// machine epsilon relative to `max(|a|, |b|)`.
///
/// Unlike [`close`], two values straddling zero can still compare equal
/// when both are denormal-small.
#[inline]
pub fn close_enough(a: Real, b: Real, n: u32) -> bool {
    if a == b {
        return true;
    }
    let eps = (a.abs().max(b.abs())) * f64::EPSILON * n as f64;
    (a - b).abs() <= eps
}

/// [`close_enough`] with the conventional 42-epsilon tolerance.
#[inline]
pub fn close_enough_default(a: Real, b: Real) -> bool {
    close_enough(a, b, DEFAULT_ULPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_basic() {
        assert!(close(1.0, 1.0 + 1e-11, 1e-10));
        assert!(!close(1.0, 1.0 + 1e-9, 1e-10));
    }

    #[test]
    fn close_enough_basic() {
        assert!(close_enough(1.0, 1.0, 10));
        assert!(close_enough(1.0, 1.0 + f64::EPSILON * 5.0, 10));
        assert!(!close_enough(1.0, 1.0 + 1e-10, 10));
    }

    #[test]
    fn close_enough_default_is_42_ulps() {
        assert!(close_enough_default(1.0, 1.0 + 40.0 * f64::EPSILON));
        assert!(!close_enough_default(1.0, 1.0 + 50.0 * f64::EPSILON));
    }
}
