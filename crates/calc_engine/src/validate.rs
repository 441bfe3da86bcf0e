//! Syntax validation of canonical expressions.
//!
//! Four independent scans over the normalized string, run in a fixed order
//! and short-circuiting on the first violation: parenthesis structure,
//! operator adjacency, decimal-point placement, character whitelist.

use tracing::debug;

use crate::error::{DecimalError, OperatorError, ParenthesisError, SyntaxError};
use crate::normalize::ROOT_OPERATOR;

/// The six arithmetic operator characters of the canonical form.
pub const OPERATORS: [char; 6] = ['+', '-', '*', '/', ROOT_OPERATOR, '^'];

pub fn is_operator(c: char) -> bool {
    OPERATORS.contains(&c)
}

/// Operators of the power/root and multiply/divide classes; these may not
/// open an expression, unlike a leading sign.
fn is_tight_operator(c: char) -> bool {
    matches!(c, '*' | '/' | '^' | ROOT_OPERATOR)
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Run all four checks.
pub fn validate(exp: &str) -> Result<(), SyntaxError> {
    check_parenthesis(exp)?;
    debug!(target: "calc_engine::validate", "parenthesis check passed");
    check_operators(exp)?;
    debug!(target: "calc_engine::validate", "operator check passed");
    check_decimals(exp)?;
    debug!(target: "calc_engine::validate", "decimal check passed");
    check_chars(exp)?;
    debug!(target: "calc_engine::validate", "character check passed");
    Ok(())
}

/// Running balance over the string: never negative, zero at the end, and
/// no empty `()` group anywhere.
pub fn check_parenthesis(exp: &str) -> Result<(), ParenthesisError> {
    let mut depth: i32 = 0;
    for c in exp.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return Err(ParenthesisError::ClosedBeforeOpened);
        }
    }
    if depth != 0 {
        return Err(ParenthesisError::NeverClosed);
    }
    if exp.contains("()") {
        return Err(ParenthesisError::EmptyGroup);
    }
    Ok(())
}

/// Neighbor rules for every interior operator, plus the start/end rules.
///
/// A `+` or `-` may follow another operator (it is then a sign), a
/// parenthesis, a digit or a letter, and must be followed by something
/// that can open an operand. The tight operators require a completed
/// operand on their left.
pub fn check_operators(exp: &str) -> Result<(), OperatorError> {
    let chars: Vec<char> = exp.chars().collect();

    if let Some(&first) = chars.first() {
        if is_tight_operator(first) {
            return Err(OperatorError::AtStart(first));
        }
    }
    if let Some(&last) = chars.last() {
        if is_operator(last) {
            return Err(OperatorError::AtEnd(last));
        }
    }

    for i in 1..chars.len().saturating_sub(1) {
        let (prev, c, next) = (chars[i - 1], chars[i], chars[i + 1]);

        if c == '+' || c == '-' {
            let prev_ok = is_tight_operator(prev)
                || prev == '('
                || prev == ')'
                || prev.is_ascii_digit()
                || is_letter(prev);
            if !prev_ok {
                return Err(OperatorError::InvalidBefore { operator: c, found: prev });
            }
            let next_ok = next == '(' || next.is_ascii_digit() || is_letter(next);
            if !next_ok {
                return Err(OperatorError::InvalidAfter { operator: c, found: next });
            }
        }

        if is_tight_operator(c) {
            let prev_ok = prev == ')' || prev.is_ascii_digit() || is_letter(prev);
            if !prev_ok {
                return Err(OperatorError::InvalidBefore { operator: c, found: prev });
            }
            let next_ok = next == '+'
                || next == '-'
                || next == '('
                || next.is_ascii_digit()
                || is_letter(next);
            if !next_ok {
                return Err(OperatorError::InvalidAfter { operator: c, found: next });
            }
        }
    }
    Ok(())
}

/// Decimal points may not open or close the expression, must sit between
/// two digits, and at most one may appear per unbroken digit run.
pub fn check_decimals(exp: &str) -> Result<(), DecimalError> {
    let chars: Vec<char> = exp.chars().collect();

    if chars.first() == Some(&'.') {
        return Err(DecimalError::AtStart);
    }
    if chars.last() == Some(&'.') {
        return Err(DecimalError::AtEnd);
    }

    for i in 1..chars.len().saturating_sub(1) {
        if chars[i] == '.'
            && (!chars[i - 1].is_ascii_digit() || !chars[i + 1].is_ascii_digit())
        {
            return Err(DecimalError::BarePoint);
        }
    }

    // one point per value: a second point before any operator is an error
    let mut seen_point = false;
    for &c in &chars {
        if seen_point {
            if is_operator(c) {
                seen_point = false;
            } else if c == '.' {
                return Err(DecimalError::RepeatedPoint);
            }
        } else if c == '.' {
            seen_point = true;
        }
    }
    Ok(())
}

/// Everything left must be a digit, an ASCII letter, a point, a
/// parenthesis or an operator.
pub fn check_chars(exp: &str) -> Result<(), SyntaxError> {
    for c in exp.chars() {
        let ok = c == '.'
            || c == '('
            || c == ')'
            || c.is_ascii_digit()
            || is_letter(c)
            || is_operator(c);
        if !ok {
            return Err(SyntaxError::InvalidChar(c));
        }
    }
    Ok(())
}
