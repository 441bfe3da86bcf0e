//! # calc_engine
//!
//! Textual arithmetic-expression evaluator: normalization, validation and
//! evaluation of human-written infix expressions with root/power glyphs,
//! named constants, trigonometric/logarithmic/combinatorial functions,
//! call variables and a degrees/radians mode.
//!
//! The pipeline is raw string → [`normalize`] → [`validate`] →
//! [`evaluate`], wrapped by the [`Engine`] facade:
//!
//! ```
//! use calc_engine::Engine;
//! use std::collections::HashMap;
//!
//! let mut engine = Engine::new();
//! assert_eq!(engine.solve("2+3*4"), Some(14.0));
//! assert_eq!(engine.solve("√9"), Some(3.0));
//! assert_eq!(engine.solve("sin(90)"), Some(1.0));
//!
//! let vars = HashMap::from([("x".to_string(), 5.0)]);
//! assert_eq!(engine.solve_with("2*x", &vars), Some(10.0));
//! ```
//!
//! Evaluation works by repeated string rewriting rather than an AST:
//! innermost parenthesized groups are solved first, each through a
//! function-resolution step and three left-to-right precedence passes.
//! Note that this makes `^` left-associative: `2^3^2` is `(2^3)^2 = 64`.

pub mod engine;
pub mod error;
pub mod evaluate;
pub mod normalize;
pub mod registry;
pub mod validate;

pub use engine::Engine;
pub use error::{
    CalcError, DecimalError, DomainError, EvalError, OperatorError, ParenthesisError, SyntaxError,
};
pub use evaluate::{evaluate, EvalContext, FUNCTIONS};
pub use normalize::normalize;
pub use registry::Constants;
pub use validate::validate;
