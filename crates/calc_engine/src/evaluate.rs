//! Expression evaluation by repeated textual rewriting.
//!
//! The outer loop peels innermost parenthesized groups; each group's text
//! is handed to the segment solver, which first replaces function calls
//! with their value and then runs three precedence passes (power/root,
//! multiply/divide, add/subtract), always reducing the leftmost operation.
//! Intermediate results are spliced back wrapped in `{`…`}` markers so a
//! signed value re-enters the outer text as one atomic operand; the
//! markers are stripped before the final parse.

use std::collections::HashMap;

use tracing::debug;

use crate::error::EvalError;
use crate::normalize::{reduce_signs, ROOT_OPERATOR};

/// Immutable per-call state, built fresh for every solve and threaded
/// through the whole reduction as a value.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    /// Angle unit: false means degrees.
    pub radians: bool,
    /// Call variables, looked up when an operand is not numeric.
    pub vars: &'a HashMap<String, f64>,
}

/// The recognized function names.
pub const FUNCTIONS: [&str; 17] = [
    "sin", "cos", "tan", "asin", "acos", "atan", "csc", "sec", "cot", "exp", "log", "ln", "abs",
    "round", "floor", "ceil", "fact",
];

const INFINITY_LITERAL: &str = "Infinity";

fn is_body_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_alphabetic() || c == '.'
}

/// Evaluate a canonical expression down to a number.
pub fn evaluate(canonical: &str, ctx: &EvalContext) -> Result<f64, EvalError> {
    let mut exp = format!("({canonical})");

    loop {
        let chars: Vec<char> = exp.chars().collect();
        if chars.first() != Some(&'(') || chars.last() != Some(&')') {
            break;
        }
        // innermost group: first close, then the nearest open to its left
        let close = chars.iter().position(|&c| c == ')').unwrap_or(chars.len() - 1);
        let open = chars[..close].iter().rposition(|&c| c == '(').unwrap_or(0);
        let segment: String = chars[open + 1..close].iter().collect();
        debug!(target: "calc_engine::evaluate", exp = %exp, segment = %segment, "solving innermost group");

        let solved = solve_segment(&segment, ctx)?;

        let mut next: String = chars[..open].iter().collect();
        next.push_str(&solved);
        next.extend(&chars[close + 1..]);
        exp = next;
    }

    let stripped: String = exp.chars().filter(|&c| c != '{' && c != '}').collect();
    let reduced = reduce_signs(&stripped);
    debug!(target: "calc_engine::evaluate", result = %reduced, "expression fully reduced");
    reduced.parse::<f64>().map_err(|_| EvalError::Indeterminate)
}

/// Solve one parenthesis-free segment and return it brace-wrapped.
fn solve_segment(segment: &str, ctx: &EvalContext) -> Result<String, EvalError> {
    let mut exp = resolve_functions(segment, ctx)?;
    debug!(target: "calc_engine::evaluate", exp = %exp, "functions resolved");

    for pass in [Pass::PowerRoot, Pass::MulDiv, Pass::AddSub] {
        exp = reduce_pass(&exp, pass, ctx)?;
    }

    let stripped: String = exp.chars().filter(|&c| c != '{' && c != '}').collect();
    let reduced = reduce_signs(&stripped);
    Ok(format!("{{{reduced}}}"))
}

// ----------------------------------------------------------------------------
// Function resolution
// ----------------------------------------------------------------------------

struct Call {
    /// Char index of the first letter of the name.
    start: usize,
    /// Char index one past the argument.
    end: usize,
    name: String,
    /// Signed numeric text with the markers already stripped.
    argument: String,
}

/// Replace function calls with their value until none remain, always
/// taking the leftmost call first.
fn resolve_functions(segment: &str, ctx: &EvalContext) -> Result<String, EvalError> {
    let mut chars: Vec<char> = segment.chars().collect();

    while let Some(call) = find_call(&chars) {
        if !FUNCTIONS.contains(&call.name.as_str()) {
            return Err(EvalError::UnknownFunction(call.name));
        }
        let argument: f64 = match call.argument.parse() {
            Ok(value) => value,
            Err(_) => return Err(EvalError::MissingArgument(call.name)),
        };

        let result = apply_function(&call.name, argument, ctx)?;
        if result.is_nan() {
            return Err(EvalError::Indeterminate);
        }

        let rendered = calc_math::format_number(result);
        debug!(
            target: "calc_engine::evaluate",
            function = %call.name, argument, result, "resolved function"
        );
        chars.splice(call.start..call.end, rendered.chars());
    }

    Ok(chars.into_iter().collect())
}

/// Leftmost `<letters><argument>` occurrence.
///
/// A letter run opens a call when an argument starts right after it: a
/// digit, a point, or a `{`-wrapped prior result. A run with no such
/// follower can still end in the literal `Infinity`, which then serves as
/// the argument (`fact(∞)` reaches this as `factInfinity` once the inner
/// group collapses). Anything else is left alone; it may be a variable.
fn find_call(chars: &[char]) -> Option<Call> {
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_alphabetic() {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < chars.len() && chars[i].is_ascii_alphabetic() {
            i += 1;
        }
        let run: String = chars[run_start..i].iter().collect();

        let opens_argument = matches!(
            chars.get(i).copied(),
            Some(c) if c.is_ascii_digit() || c == '.' || c == '{'
        );
        if opens_argument {
            let (argument, end) = parse_argument(chars, i);
            return Some(Call { start: run_start, end, name: run, argument });
        }

        if run.len() > INFINITY_LITERAL.len() && run.ends_with(INFINITY_LITERAL) {
            let name_len = run.len() - INFINITY_LITERAL.len();
            return Some(Call {
                start: run_start,
                end: i,
                name: run[..name_len].to_string(),
                argument: INFINITY_LITERAL.to_string(),
            });
        }
    }
    None
}

/// Consume an argument at `start`: optional `{` with an optional interior
/// sign, then a digit/point run or the literal `Infinity`, then an
/// optional `}`. Returns the signed text without markers and the end
/// index; the text may be empty when the marker shell has no literal.
fn parse_argument(chars: &[char], start: usize) -> (String, usize) {
    let mut k = start;
    let mut argument = String::new();
    let mut braced = false;

    if chars.get(k) == Some(&'{') {
        braced = true;
        k += 1;
        if matches!(chars.get(k).copied(), Some('+') | Some('-')) {
            argument.push(chars[k]);
            k += 1;
        }
    }

    if starts_with_infinity(chars, k) {
        argument.push_str(INFINITY_LITERAL);
        k += INFINITY_LITERAL.len();
    } else {
        while matches!(chars.get(k).copied(), Some(c) if c.is_ascii_digit() || c == '.') {
            argument.push(chars[k]);
            k += 1;
        }
    }

    if braced && chars.get(k) == Some(&'}') {
        k += 1;
    }
    (argument, k)
}

fn starts_with_infinity(chars: &[char], at: usize) -> bool {
    chars.len() >= at + INFINITY_LITERAL.len()
        && chars[at..at + INFINITY_LITERAL.len()]
            .iter()
            .zip(INFINITY_LITERAL.chars())
            .all(|(&a, b)| a == b)
}

/// Dispatch to the numeric primitive, applying the pre-dispatch domain
/// checks each function requires.
fn apply_function(name: &str, argument: f64, ctx: &EvalContext) -> Result<f64, EvalError> {
    use calc_math::trig;

    let value = match name {
        "sin" => trig::sin(argument, ctx.radians),
        "cos" => trig::cos(argument, ctx.radians),
        "tan" => trig::tan(argument, ctx.radians),
        "asin" => trig::asin(argument, ctx.radians)?,
        "acos" => trig::acos(argument, ctx.radians)?,
        "atan" => trig::atan(argument, ctx.radians),
        "csc" => trig::csc(argument, ctx.radians),
        "sec" => trig::sec(argument, ctx.radians),
        "cot" => trig::cot(argument, ctx.radians),
        "exp" => trig::exp(argument),
        "log" => trig::log(argument)?,
        "ln" => trig::ln(argument)?,
        "abs" => argument.abs(),
        "round" => argument.round(),
        "floor" => argument.floor(),
        "ceil" => argument.ceil(),
        "fact" => calc_math::factorial(argument)?,
        _ => return Err(EvalError::UnknownFunction(name.to_string())),
    };
    Ok(value)
}

// ----------------------------------------------------------------------------
// Precedence passes
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    PowerRoot,
    MulDiv,
    AddSub,
}

impl Pass {
    fn matches(self, c: char) -> bool {
        match self {
            Pass::PowerRoot => c == ROOT_OPERATOR || c == '^',
            Pass::MulDiv => c == '*' || c == '/',
            Pass::AddSub => c == '+' || c == '-',
        }
    }
}

struct Operation {
    start: usize,
    end: usize,
    operator: char,
    left: String,
    right: String,
}

/// Reduce every operation of one precedence class, leftmost first, until
/// the segment holds none of its operators.
fn reduce_pass(text: &str, pass: Pass, ctx: &EvalContext) -> Result<String, EvalError> {
    let mut exp = text.to_string();

    loop {
        let chars: Vec<char> = exp.chars().collect();
        let Some(op) = find_operation(&chars, pass) else {
            break;
        };

        let left = resolve_operand(&op.left, ctx.vars)?;
        let right = resolve_operand(&op.right, ctx.vars)?;
        let result = apply_operator(op.operator, left, right)?;
        if result.is_nan() {
            return Err(EvalError::Indeterminate);
        }

        let rendered = calc_math::format_number(result);
        debug!(
            target: "calc_engine::evaluate",
            operator = %op.operator, left, right, result, "reduced operation"
        );

        let mut next: String = chars[..op.start].iter().collect();
        next.push_str(&rendered);
        next.extend(&chars[op.end..]);
        // a negative result must merge with an adjacent sign before the
        // next scan
        exp = reduce_signs(&next);
    }

    Ok(exp)
}

/// Leftmost operator of the pass with a valid operand on each side.
/// An operator without one (a leading sign, say) is skipped.
fn find_operation(chars: &[char], pass: Pass) -> Option<Operation> {
    for (i, &c) in chars.iter().enumerate() {
        if !pass.matches(c) {
            continue;
        }
        let Some((left_start, left)) =
            parse_operand_backward(chars, i, pass == Pass::AddSub)
        else {
            continue;
        };
        let Some((right_end, right)) = parse_operand_forward(chars, i + 1) else {
            continue;
        };
        return Some(Operation {
            start: left_start,
            end: right_end,
            operator: c,
            left,
            right,
        });
    }
    None
}

/// Operand ending just before `end`: either a digit/letter/point run or a
/// brace-wrapped prior result. In the add/subtract pass a sign at the very
/// start of the segment belongs to the operand.
fn parse_operand_backward(
    chars: &[char],
    end: usize,
    allow_sign: bool,
) -> Option<(usize, String)> {
    if end == 0 {
        return None;
    }
    let mut start = end;

    if chars[end - 1] == '}' {
        let mut j = end - 1;
        loop {
            if j == 0 {
                return None;
            }
            j -= 1;
            let c = chars[j];
            if c == '{' {
                break;
            }
            if !is_body_char(c) && c != '+' && c != '-' {
                return None;
            }
        }
        start = j;
    } else {
        while start > 0 && is_body_char(chars[start - 1]) {
            start -= 1;
        }
        if start == end {
            return None;
        }
    }

    if allow_sign && start == 1 && (chars[0] == '+' || chars[0] == '-') {
        start = 0;
    }
    Some((start, chars[start..end].iter().collect()))
}

/// Operand starting at `start`: optional sign, optional `{` with its own
/// optional sign, a digit/letter/point run, optional `}`.
fn parse_operand_forward(chars: &[char], start: usize) -> Option<(usize, String)> {
    let mut k = start;
    if matches!(chars.get(k).copied(), Some('+') | Some('-')) {
        k += 1;
    }
    let mut braced = false;
    if chars.get(k) == Some(&'{') {
        braced = true;
        k += 1;
        if matches!(chars.get(k).copied(), Some('+') | Some('-')) {
            k += 1;
        }
    }

    let body_start = k;
    while matches!(chars.get(k).copied(), Some(c) if is_body_char(c)) {
        k += 1;
    }
    if k == body_start {
        return None;
    }

    if braced && chars.get(k) == Some(&'}') {
        k += 1;
    }
    Some((k, chars[start..k].iter().collect()))
}

/// Strip markers, reduce the operand's own sign run, then read it as a
/// number or fall back to the variable table. The lookup uses the operand
/// text verbatim, so a signed name like `-x` is not a variable reference.
fn resolve_operand(text: &str, vars: &HashMap<String, f64>) -> Result<f64, EvalError> {
    let stripped: String = text.chars().filter(|&c| c != '{' && c != '}').collect();
    let reduced = reduce_signs(&stripped);
    if let Ok(value) = reduced.parse::<f64>() {
        return Ok(value);
    }
    vars.get(&reduced)
        .copied()
        .ok_or(EvalError::UnknownVariable(reduced))
}

fn apply_operator(operator: char, left: f64, right: f64) -> Result<f64, EvalError> {
    let value = match operator {
        ROOT_OPERATOR => calc_math::root(left, right)?,
        '^' => calc_math::pow(left, right)?,
        '*' => left * right,
        '/' => calc_math::divide(left, right),
        '+' => left + right,
        '-' => left - right,
        _ => return Err(EvalError::Indeterminate),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(exp: &str) -> Result<f64, EvalError> {
        let vars = HashMap::new();
        let ctx = EvalContext { radians: false, vars: &vars };
        evaluate(exp, &ctx)
    }

    fn eval_with(exp: &str, vars: &[(&str, f64)]) -> Result<f64, EvalError> {
        let vars: HashMap<String, f64> =
            vars.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let ctx = EvalContext { radians: false, vars: &vars };
        evaluate(exp, &ctx)
    }

    #[test]
    fn plain_addition() {
        assert_eq!(eval("1+2"), Ok(3.0));
    }

    #[test]
    fn precedence_multiplication_first() {
        assert_eq!(eval("2+3*4"), Ok(14.0));
    }

    #[test]
    fn parenthesized_group_first() {
        assert_eq!(eval("(2+3)*4"), Ok(20.0));
    }

    #[test]
    fn power_reduces_left_to_right() {
        // (2^3)^2, not 2^(3^2)
        assert_eq!(eval("2^3^2"), Ok(64.0));
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_eq!(eval("-2^2"), Ok(-4.0));
    }

    #[test]
    fn root_operator() {
        assert_eq!(eval("(2)˅9"), Ok(3.0));
    }

    #[test]
    fn negative_intermediate_merges_with_sign() {
        assert_eq!(eval("5-3*-4"), Ok(17.0));
        assert_eq!(eval("5--3"), Ok(8.0));
    }

    #[test]
    fn nested_groups() {
        assert_eq!(eval("((1+2)*(3+4))"), Ok(21.0));
    }

    #[test]
    fn function_on_inner_result() {
        assert_eq!(eval("abs(3-5)"), Ok(2.0));
    }

    #[test]
    fn nested_function_calls() {
        assert_eq!(eval("abs(sin(-90))"), Ok(1.0));
    }

    #[test]
    fn unknown_function() {
        assert_eq!(
            eval("foo(2)"),
            Err(EvalError::UnknownFunction("foo".to_string()))
        );
    }

    #[test]
    fn function_argument_must_be_numeric() {
        assert_eq!(
            eval_with("sin(x)", &[("x", 90.0)]),
            Err(EvalError::MissingArgument("sin".to_string()))
        );
    }

    #[test]
    fn variables_resolve_in_operations() {
        assert_eq!(eval_with("2*x", &[("x", 5.0)]), Ok(10.0));
        assert_eq!(eval_with("x+y", &[("x", 1.0), ("y", 2.0)]), Ok(3.0));
    }

    #[test]
    fn unknown_variable() {
        assert_eq!(
            eval_with("2*y", &[("x", 5.0)]),
            Err(EvalError::UnknownVariable("y".to_string()))
        );
    }

    #[test]
    fn division_by_zero_follows_ieee() {
        assert_eq!(eval("2/0"), Ok(f64::INFINITY));
    }

    #[test]
    fn zero_over_zero_is_indeterminate() {
        assert_eq!(eval("0/0"), Err(EvalError::Indeterminate));
    }

    #[test]
    fn zero_times_infinity_is_indeterminate() {
        assert_eq!(eval("0*(Infinity)"), Err(EvalError::Indeterminate));
    }

    #[test]
    fn factorial_of_infinity() {
        assert_eq!(eval("fact(171)"), Ok(f64::INFINITY));
    }

    #[test]
    fn domain_error_propagates() {
        assert_eq!(
            eval("log(-1)"),
            Err(EvalError::Domain(calc_math::DomainError::LogNonPositive))
        );
    }
}
