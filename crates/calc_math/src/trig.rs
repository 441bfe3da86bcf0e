//! Trigonometric and logarithmic functions with a degrees/radians mode.
//!
//! Every forward function takes the angle in the caller's configured unit:
//! `radians == false` means degrees, and the angle is converted with
//! `angle * (π/180)` before the standard library function runs. Inverse
//! functions compute in radians and convert back with `angle / (π/180)`.

use std::f64::consts::PI;

use crate::error::DomainError;

fn to_radians(angle: f64, radians: bool) -> f64 {
    if radians {
        angle
    } else {
        angle * (PI / 180.0)
    }
}

fn from_radians(angle: f64, radians: bool) -> f64 {
    if radians {
        angle
    } else {
        angle / (PI / 180.0)
    }
}

/// Round to 15 decimal places.
///
/// sin/cos outputs live in [-1, 1], where float noise like `sin(π) ≈ 1.2e-16`
/// would otherwise leak into `tan` and the reciprocals.
fn round15(value: f64) -> f64 {
    (value * 1e15).round() / 1e15
}

pub fn sin(angle: f64, radians: bool) -> f64 {
    round15(to_radians(angle, radians).sin())
}

pub fn cos(angle: f64, radians: bool) -> f64 {
    round15(to_radians(angle, radians).cos())
}

/// Quotient of the rounded sine and cosine, so `tan(90°)` divides by an
/// exact zero and yields infinity instead of a huge finite value.
pub fn tan(angle: f64, radians: bool) -> f64 {
    sin(angle, radians) / cos(angle, radians)
}

pub fn csc(angle: f64, radians: bool) -> f64 {
    1.0 / sin(angle, radians)
}

pub fn sec(angle: f64, radians: bool) -> f64 {
    1.0 / cos(angle, radians)
}

pub fn cot(angle: f64, radians: bool) -> f64 {
    1.0 / tan(angle, radians)
}

/// Inverse sine. Ratios outside [-1, 1] are rejected; a NaN ratio falls
/// through to the standard library and surfaces as a NaN result.
pub fn asin(ratio: f64, radians: bool) -> Result<f64, DomainError> {
    if ratio < -1.0 || ratio > 1.0 {
        return Err(DomainError::InverseTrigRange);
    }
    Ok(from_radians(ratio.asin(), radians))
}

/// Inverse cosine, same domain rule as [`asin`].
pub fn acos(ratio: f64, radians: bool) -> Result<f64, DomainError> {
    if ratio < -1.0 || ratio > 1.0 {
        return Err(DomainError::InverseTrigRange);
    }
    Ok(from_radians(ratio.acos(), radians))
}

pub fn atan(ratio: f64, radians: bool) -> f64 {
    from_radians(ratio.atan(), radians)
}

/// Base-10 logarithm of a strictly positive value.
pub fn log(value: f64) -> Result<f64, DomainError> {
    if value <= 0.0 {
        return Err(DomainError::LogNonPositive);
    }
    Ok(value.log10())
}

/// Natural logarithm of a strictly positive value.
pub fn ln(value: f64) -> Result<f64, DomainError> {
    if value <= 0.0 {
        return Err(DomainError::LogNonPositive);
    }
    Ok(value.ln())
}

pub fn exp(value: f64) -> f64 {
    value.exp()
}
