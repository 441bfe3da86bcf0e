//! The public engine facade.

use std::collections::HashMap;

use tracing::debug;

use crate::error::CalcError;
use crate::evaluate::{evaluate, EvalContext};
use crate::normalize::normalize;
use crate::registry::Constants;
use crate::validate::validate;

/// Expression engine: configuration plus the last call's outcome.
///
/// Configuration (`debug`, `radians`, `constants`) is read-only during a
/// call and may be tuned between calls. The transient fields record the
/// canonical form and error of the most recent call for inspection; they
/// make a shared `Engine` unsuitable for concurrent use, so concurrent
/// callers should either hold an engine each or go through [`Engine::eval`],
/// which touches no shared state.
///
/// # Example
///
/// ```
/// use calc_engine::Engine;
///
/// let mut engine = Engine::new();
/// assert_eq!(engine.solve("2+3*4"), Some(14.0));
/// assert_eq!(engine.solve("2(3+4)"), Some(14.0));
/// assert_eq!(engine.solve("1/(1-1)"), Some(f64::INFINITY));
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    /// Emit per-stage checkpoint events.
    pub debug: bool,
    /// Angle unit for the trigonometric functions; false means degrees.
    pub radians: bool,
    /// Constant registry consulted by the normalizer.
    pub constants: Constants,
    expression: Option<String>,
    last_error: Option<CalcError>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            debug: false,
            radians: false,
            constants: Constants::new(),
            expression: None,
            last_error: None,
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and validate an expression.
    ///
    /// On success the canonical form is stored and `true` is returned; on
    /// failure the syntax error is recorded for [`Engine::last_error`].
    pub fn check_syntax(&mut self, raw: &str) -> bool {
        self.last_error = None;
        let canonical = normalize(raw, &self.constants);
        match validate(&canonical) {
            Ok(()) => {
                if self.debug {
                    debug!(target: "calc_engine::engine", raw, canonical = %canonical, "syntax ok");
                }
                self.expression = Some(canonical);
                true
            }
            Err(err) => {
                if self.debug {
                    debug!(target: "calc_engine::engine", raw, error = %err, "syntax error");
                }
                self.last_error = Some(err.into());
                false
            }
        }
    }

    /// Solve an expression with no call variables.
    pub fn solve(&mut self, raw: &str) -> Option<f64> {
        self.solve_with(raw, &HashMap::new())
    }

    /// Solve an expression, resolving free names through `vars`.
    ///
    /// Returns the result rounded to 12 fractional digits, or `None` with
    /// the failure recorded for [`Engine::last_error`].
    pub fn solve_with(&mut self, raw: &str, vars: &HashMap<String, f64>) -> Option<f64> {
        self.last_error = None;
        let canonical = normalize(raw, &self.constants);
        if let Err(err) = validate(&canonical) {
            self.last_error = Some(err.into());
            return None;
        }
        self.expression = Some(canonical.clone());

        let ctx = EvalContext { radians: self.radians, vars };
        match evaluate(&canonical, &ctx) {
            Ok(value) => {
                let value = calc_math::truncate_result(value);
                if self.debug {
                    debug!(target: "calc_engine::engine", raw, value, "solved");
                }
                Some(value)
            }
            Err(err) => {
                if self.debug {
                    debug!(target: "calc_engine::engine", raw, error = %err, "evaluation failed");
                }
                self.last_error = Some(err.into());
                None
            }
        }
    }

    /// Pure evaluation: no engine state is read or written beyond the
    /// configuration, so one engine can serve concurrent callers through
    /// this entry.
    pub fn eval(&self, raw: &str, vars: &HashMap<String, f64>) -> Result<f64, CalcError> {
        let canonical = normalize(raw, &self.constants);
        validate(&canonical)?;
        let ctx = EvalContext { radians: self.radians, vars };
        let value = evaluate(&canonical, &ctx)?;
        Ok(calc_math::truncate_result(value))
    }

    /// Canonical form of the last successfully checked expression.
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    /// Error recorded by the last failed call, until the next call.
    pub fn last_error(&self) -> Option<&CalcError> {
        self.last_error.as_ref()
    }

    /// Register a constant for the normalizer.
    pub fn define_constant(&mut self, name: impl Into<String>, value: f64) {
        self.constants.define(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EvalError, ParenthesisError, SyntaxError};

    #[test]
    fn check_syntax_stores_canonical_form() {
        let mut engine = Engine::new();
        assert!(engine.check_syntax("2 (3+4)"));
        assert_eq!(engine.expression(), Some("2*(3+4)"));
        assert!(engine.last_error().is_none());
    }

    #[test]
    fn check_syntax_records_the_error() {
        let mut engine = Engine::new();
        assert!(!engine.check_syntax("(2+3))"));
        assert_eq!(
            engine.last_error(),
            Some(&CalcError::Syntax(SyntaxError::Parenthesis(
                ParenthesisError::ClosedBeforeOpened
            )))
        );
    }

    #[test]
    fn errors_are_cleared_per_call_and_overwritten() {
        let mut engine = Engine::new();
        assert!(!engine.check_syntax("(2"));
        assert!(engine.last_error().is_some());

        assert!(engine.check_syntax("2+2"));
        assert!(engine.last_error().is_none());

        assert!(engine.solve("2*y").is_none());
        assert_eq!(
            engine.last_error(),
            Some(&CalcError::Eval(EvalError::UnknownVariable("y".to_string())))
        );
    }

    #[test]
    fn solve_truncates_to_twelve_decimals() {
        let mut engine = Engine::new();
        assert_eq!(engine.solve("2*pi"), Some(6.28318530718));
    }

    #[test]
    fn degrees_is_the_default_mode() {
        let mut engine = Engine::new();
        assert_eq!(engine.solve("sin(90)"), Some(1.0));

        engine.radians = true;
        assert_eq!(engine.solve("sin(90)"), Some(0.893996663601));
    }

    #[test]
    fn caller_constants_participate() {
        let mut engine = Engine::new();
        engine.define_constant("tau", 2.0 * std::f64::consts::PI);
        assert_eq!(engine.solve("tau/2"), Some(3.14159265359));
    }

    #[test]
    fn pure_eval_leaves_no_state() {
        let engine = Engine::new();
        let vars = HashMap::new();
        assert_eq!(engine.eval("1+1", &vars), Ok(2.0));
        assert!(engine.last_error().is_none());
        assert!(engine.expression().is_none());
    }
}
