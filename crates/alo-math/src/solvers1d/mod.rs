//! 1D root-finding solvers.
//!
//! Free functions over a user-supplied bracket. The boundary engines pick
//! among these at runtime, with iteration budgets that depend on the
//! solver family, so the budget is an explicit argument rather than a
//! module constant.

use alo_core::{
    errors::{Error, Result},
    Real,
};

/// Accuracy used when the caller passes a non-positive one.
pub const DEFAULT_ACCURACY: Real = 1.0e-11;

// ── Brent ─────────────────────────────────────────────────────────────────────

/// Brent's method for finding a root of `f(x)` in `[x_min, x_max]`.
///
/// Combines bisection, secant, and inverse quadratic interpolation.
pub fn brent<F>(f: F, x_min: Real, x_max: Real, accuracy: Real, max_iterations: usize) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let acc = if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    };
    let mut a = x_min;
    let mut b = x_max;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa * fb > 0.0 {
        return Err(Error::Precondition(format!(
            "Brent: f({a}) and f({b}) must have opposite signs"
        )));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iterations {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * acc;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (p, q) = if a == c {
                let p = 2.0 * xm * s;
                let q = 1.0 - s;
                (p, q)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                let p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
                let q = (q - 1.0) * (r - 1.0) * (s - 1.0);
                (p, q)
            };
            let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
            if 2.0 * p < (3.0 * xm * q - (tol * q).abs()) && 2.0 * p < (e * q).abs() {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else if xm > 0.0 {
            tol
        } else {
            -tol
        };
        fb = f(b);
    }
    Err(Error::Runtime(
        "Brent solver: maximum iterations reached".into(),
    ))
}

// ── Newton-Raphson ────────────────────────────────────────────────────────────

/// Newton-Raphson method using a `(f, f')` closure and an initial guess.
///
/// Falls back to a bisection step when the Newton step would leave the
/// bracket `[x_min, x_max]`.
pub fn newton<F>(
    f_df: F,
    x0: Real,
    x_min: Real,
    x_max: Real,
    accuracy: Real,
    max_iterations: usize,
) -> Result<Real>
where
    F: Fn(Real) -> (Real, Real),
{
    let acc = if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    };
    let mut x = x0.clamp(x_min, x_max);

    for _ in 0..max_iterations {
        let (fx, dfx) = f_df(x);
        if fx.abs() < acc {
            return Ok(x);
        }
        if dfx.abs() > f64::EPSILON {
            let x_new = x - fx / dfx;
            if x_new >= x_min && x_new <= x_max {
                x = x_new;
                continue;
            }
        }
        let dx = 0.5 * (x_max - x_min);
        x = x_min + dx;
        if dx < acc {
            return Ok(x);
        }
    }
    Err(Error::Runtime(
        "Newton solver: maximum iterations reached".into(),
    ))
}

// ── Ridder ────────────────────────────────────────────────────────────────────

/// Ridder's method for root finding.
///
/// Requires that `f(x_min)` and `f(x_max)` have opposite signs.
pub fn ridder<F>(f: F, x_min: Real, x_max: Real, accuracy: Real, max_iterations: usize) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let acc = if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    };
    let mut a = x_min;
    let mut b = x_max;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa * fb > 0.0 {
        return Err(Error::Precondition(
            "Ridder: f(x_min) and f(x_max) must have opposite signs".into(),
        ));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    for _ in 0..max_iterations {
        let mid = 0.5 * (a + b);
        let fm = f(mid);

        let s = (fm * fm - fa * fb).sqrt();
        if s == 0.0 {
            return Ok(mid);
        }

        // The false-position step moves from the midpoint toward the root:
        // x = mid + (mid - a) * sign(f(a) - f(b)) * f(mid) / s.
        let sign = if fa > fb { 1.0 } else { -1.0 };
        let x_new = mid + (mid - a) * sign * fm / s;
        let f_new = f(x_new);

        if f_new.abs() < acc || (b - a).abs() < acc {
            return Ok(x_new);
        }

        if fm * f_new < 0.0 {
            a = mid;
            fa = fm;
            b = x_new;
            fb = f_new;
        } else if fa * f_new < 0.0 {
            b = x_new;
            fb = f_new;
        } else {
            a = x_new;
            fa = f_new;
        }

        if (b - a).abs() < acc {
            return Ok(0.5 * (a + b));
        }
    }

    Err(Error::Runtime(
        "Ridder solver: maximum iterations reached".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brent_sqrt2() {
        let root = brent(|x| x * x - 2.0, 0.0, 2.0, 1e-12, 100).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn newton_sqrt2() {
        let root = newton(|x| (x * x - 2.0, 2.0 * x), 1.5, 0.0, 2.0, 1e-12, 100).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn ridder_sqrt2() {
        let root = ridder(|x| x * x - 2.0, 0.0, 2.0, 1e-12, 100).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-10, "got {root}");
    }

    #[test]
    fn ridder_decreasing_function() {
        // f(a) > f(b): the step direction must still point at the root.
        let root = ridder(|x| 2.0 - x * x, 0.0, 2.0, 1e-12, 100).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-10, "got {root}");
    }

    #[test]
    fn brent_opposite_signs_required() {
        assert!(brent(|x| x, 1.0, 2.0, 1e-10, 100).is_err());
    }

    #[test]
    fn ridder_opposite_signs_required() {
        assert!(ridder(|x| x * x + 1.0, -1.0, 1.0, 1e-10, 100).is_err());
    }

    #[test]
    fn brent_budget_exhaustion() {
        // cos(x) - x has a root near 0.739; two iterations cannot reach 1e-12.
        assert!(brent(|x: Real| x.cos() - x, 0.0, 1.0, 1e-12, 2).is_err());
    }
}
