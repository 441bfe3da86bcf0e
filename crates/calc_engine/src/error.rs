//! Error types for the evaluation pipeline.
//!
//! Two families: syntax errors raised by the validator, and evaluation
//! errors raised while reducing an expression that already passed
//! validation. Exactly one error is produced per failed call; the engine
//! facade stores it for inspection and the next call overwrites it.

use thiserror::Error;

pub use calc_math::DomainError;

/// Parenthesis structure violations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParenthesisError {
    #[error("a parenthesis was closed before being opened")]
    ClosedBeforeOpened,
    #[error("one or more parentheses were never closed")]
    NeverClosed,
    #[error("a parenthesis group has no content")]
    EmptyGroup,
}

/// Operator placement violations, carrying the operator and the offending
/// neighbor character.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorError {
    #[error("the expression cannot start with the operator '{0}'")]
    AtStart(char),
    #[error("the expression cannot end with the operator '{0}'")]
    AtEnd(char),
    #[error("invalid character '{found}' before the operator '{operator}'")]
    InvalidBefore { operator: char, found: char },
    #[error("invalid character '{found}' after the operator '{operator}'")]
    InvalidAfter { operator: char, found: char },
}

/// Decimal point placement violations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalError {
    #[error("decimal point at the start of the expression")]
    AtStart,
    #[error("decimal point at the end of the expression")]
    AtEnd,
    #[error("a decimal point must sit between two digits")]
    BarePoint,
    #[error("more than one decimal point in a single value")]
    RepeatedPoint,
}

/// A syntax check failed. Raised by the validator, surfaced by
/// `Engine::check_syntax` returning false.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error(transparent)]
    Parenthesis(#[from] ParenthesisError),
    #[error(transparent)]
    Operator(#[from] OperatorError),
    #[error(transparent)]
    Decimal(#[from] DecimalError),
    #[error("invalid character '{0}'")]
    InvalidChar(char),
}

/// Evaluation of a syntactically valid expression failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("no argument given for function '{0}'")]
    MissingArgument(String),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("indeterminate result")]
    Indeterminate,
}

/// Any failure a solving call can record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}

impl CalcError {
    /// True when the recorded failure came from the validator rather than
    /// the evaluator.
    pub fn is_syntax(&self) -> bool {
        matches!(self, CalcError::Syntax(_))
    }
}
