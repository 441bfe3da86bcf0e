//! Error type for domain-restricted numeric operations.

use thiserror::Error;

/// A numeric operation received an argument outside its domain.
///
/// One variant per distinct violation, so callers can match on the exact
/// failure instead of parsing a message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    #[error("zero cannot be raised to the power of zero")]
    ZeroToZero,
    #[error("a power with base zero requires a positive exponent")]
    ZeroBasePower,
    #[error("a negative base cannot be raised to a fractional exponent")]
    NegativeBaseFractionalExponent,
    #[error("the index of a root cannot be zero")]
    ZeroRootIndex,
    #[error("a root with radicand zero requires a positive index")]
    ZeroRadicandRoot,
    #[error("a negative radicand requires an odd integer index")]
    NegativeRadicand,
    #[error("factorial is only defined for non-negative integers")]
    FactorialArgument,
    #[error("inverse sine and cosine require an argument in [-1, 1]")]
    InverseTrigRange,
    #[error("logarithms require a strictly positive argument")]
    LogNonPositive,
}
