//! Division, powers, roots and factorial with their edge-case rules.

use num_integer::Integer;
use num_traits::ToPrimitive;

use crate::error::DomainError;

/// True for finite values with no fractional part.
#[inline]
pub fn is_integer(value: f64) -> bool {
    value.is_finite() && value.trunc() == value
}

/// True for finite odd integers, e.g. the index of a cube root.
fn is_odd_integer(value: f64) -> bool {
    is_integer(value) && value.to_i64().map(|n| n.is_odd()).unwrap_or(false)
}

/// Division with explicit infinity handling.
///
/// `0/0` and `∞/∞` are indeterminate and yield NaN. A finite value divided
/// by an infinity collapses to `0`. An infinity divided by zero is returned
/// unchanged; this is a deliberate quirk of the evaluator, kept as-is.
pub fn divide(dividend: f64, divisor: f64) -> f64 {
    if dividend == 0.0 && divisor == 0.0 {
        return f64::NAN;
    }
    if dividend.is_infinite() && divisor.is_infinite() {
        return f64::NAN;
    }
    if dividend.is_infinite() && divisor == 0.0 {
        return dividend;
    }
    if divisor.is_infinite() {
        return 0.0;
    }
    dividend / divisor
}

/// Signed power.
///
/// `x^0` is `1` for any non-zero `x`, while `0^0` is rejected. A zero base
/// accepts only positive exponents. Integer and infinite exponents go
/// straight to `powf`, whose IEEE semantics already give a negative base
/// raised to an odd integer a negative result and to an even integer a
/// positive one. A fractional exponent on a negative base has no real
/// result and is rejected.
pub fn pow(base: f64, exponent: f64) -> Result<f64, DomainError> {
    if base == 0.0 && exponent == 0.0 {
        return Err(DomainError::ZeroToZero);
    }
    if exponent == 0.0 {
        return Ok(1.0);
    }
    if base == 0.0 {
        return if exponent > 0.0 {
            Ok(0.0)
        } else {
            Err(DomainError::ZeroBasePower)
        };
    }
    if is_integer(exponent) || exponent.is_infinite() {
        return Ok(base.powf(exponent));
    }
    if base > 0.0 {
        Ok(base.powf(exponent))
    } else {
        Err(DomainError::NegativeBaseFractionalExponent)
    }
}

/// `index`-th root of `radicand`, computed as `radicand^(1/index)`.
///
/// A zero index is rejected. A zero radicand needs a positive index. A
/// negative radicand is allowed when the index is an odd integer (the root
/// keeps the radicand's sign, so `root(3, -8) == -2`); otherwise the
/// reciprocal index must itself be an integer, the same restriction `pow`
/// places on fractional exponents.
pub fn root(index: f64, radicand: f64) -> Result<f64, DomainError> {
    if index == 0.0 {
        return Err(DomainError::ZeroRootIndex);
    }
    if radicand == 0.0 {
        return if index > 0.0 {
            Ok(0.0)
        } else {
            Err(DomainError::ZeroRadicandRoot)
        };
    }
    let exponent = index.recip();
    if radicand < 0.0 {
        if is_odd_integer(index) {
            return Ok(-(-radicand).powf(exponent));
        }
        if is_integer(exponent) || exponent.is_infinite() {
            return Ok(radicand.powf(exponent));
        }
        return Err(DomainError::NegativeRadicand);
    }
    Ok(radicand.powf(exponent))
}

/// Factorial over `f64`.
///
/// `171!` no longer fits in an `f64`, so anything from 171 upward (and a
/// literal infinity) collapses to infinity. Negative or fractional
/// arguments are rejected.
pub fn factorial(value: f64) -> Result<f64, DomainError> {
    if value == f64::INFINITY {
        return Ok(f64::INFINITY);
    }
    if !is_integer(value) || value < 0.0 {
        return Err(DomainError::FactorialArgument);
    }
    if value >= 171.0 {
        return Ok(f64::INFINITY);
    }
    let n = value.to_i64().unwrap_or(0);
    let mut product = 1.0;
    for i in 2..=n {
        product *= i as f64;
    }
    Ok(product)
}
