//! Expression normalization.
//!
//! Rewrites raw input into the canonical form the validator and evaluator
//! operate on. The six steps run in a fixed order and each one sees the
//! output of the previous step: constant substitution, whitespace removal,
//! scientific-notation folding, sign-run reduction, special-operator
//! rewriting, implicit-multiplication insertion.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::registry::Constants;

/// Internal root operator: `index ˅ radicand`, index on the left in
/// parentheses after glyph rewriting.
pub const ROOT_OPERATOR: char = '˅';

/// Full normalization pass.
pub fn normalize(raw: &str, constants: &Constants) -> String {
    debug!(target: "calc_engine::normalize", exp = raw, "initial expression");

    let exp = substitute_constants(raw, constants);
    debug!(target: "calc_engine::normalize", exp = %exp, "substituted constants");

    let exp = exp.replace(' ', "");
    debug!(target: "calc_engine::normalize", exp = %exp, "removed whitespace");

    let exp = fold_scientific_notation(&exp);
    debug!(target: "calc_engine::normalize", exp = %exp, "folded scientific notation");

    let exp = reduce_signs(&exp);
    debug!(target: "calc_engine::normalize", exp = %exp, "reduced sign runs");

    let exp = rewrite_special_operators(&exp);
    debug!(target: "calc_engine::normalize", exp = %exp, "rewrote special operators");

    let exp = insert_implicit_multiplication(&exp);
    debug!(target: "calc_engine::normalize", exp = %exp, "inserted implicit multiplication");

    exp
}

static NAME_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-zπ∞]+").expect("valid regex literal"));

/// Replace every maximal letter run that exactly names a registered
/// constant with its parenthesized numeric value. Runs that match nothing
/// are left for later stages: they may be function names or call variables.
pub fn substitute_constants(exp: &str, constants: &Constants) -> String {
    let mut out = String::with_capacity(exp.len());
    let mut last = 0;
    for m in NAME_RUN.find_iter(exp) {
        out.push_str(&exp[last..m.start()]);
        match constants.get(m.as_str()) {
            Some(value) => {
                out.push('(');
                out.push_str(&calc_math::format_number(value));
                out.push(')');
            }
            None => out.push_str(m.as_str()),
        }
        last = m.end();
    }
    out.push_str(&exp[last..]);
    out
}

static SCIENTIFIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9.]+E[+-]?[0-9]+").expect("valid regex literal"));

/// Fold `<digits>E<exponent>` substrings into plain decimal text. Only the
/// capital `E` form is scientific notation; a lowercase `e` is the Euler
/// constant and was consumed by the previous step.
pub fn fold_scientific_notation(exp: &str) -> String {
    let mut text = exp.to_string();
    while let Some(m) = SCIENTIFIC.find(&text) {
        let range = m.range();
        let value: f64 = m.as_str().parse().unwrap_or(f64::NAN);
        let folded = calc_math::format_number(value);
        text.replace_range(range, &folded);
    }
    text
}

/// Collapse adjacent sign pairs (`--`/`++` to `+`, `-+`/`+-` to `-`) to a
/// fixed point, re-examining the collapsed position so chains like `---`
/// reduce fully in one sweep.
pub fn reduce_signs(exp: &str) -> String {
    let mut chars: Vec<char> = exp.chars().collect();
    let mut i = 0;
    while i + 1 < chars.len() {
        let replacement = match (chars[i], chars[i + 1]) {
            ('-', '-') | ('+', '+') => Some('+'),
            ('-', '+') | ('+', '-') => Some('-'),
            _ => None,
        };
        match replacement {
            Some(sign) => {
                chars[i] = sign;
                chars.remove(i + 1);
            }
            None => i += 1,
        }
    }
    chars.into_iter().collect()
}

fn is_root_glyph(c: char) -> bool {
    matches!(c, '√' | '∛' | '∜')
}

/// Rewrite root glyphs, superscript powers and inverse-trig brace notation
/// into canonical operators.
///
/// Each glyph pass skips occurrences directly followed by another glyph of
/// the same family; the leftover glyph then fails the character whitelist,
/// so nested glyph stacks like `√√9` are rejected rather than guessed at.
pub fn rewrite_special_operators(exp: &str) -> String {
    // `˟√` carries an explicit index to its left: 5˟√32 → 5˅32
    let exp = rewrite_glyph(exp, "˟√", "˅", |next| {
        next != '˟' && !is_root_glyph(next)
    });
    let exp = rewrite_glyph(&exp, "√", "(2)˅", |next| !is_root_glyph(next));
    let exp = rewrite_glyph(&exp, "∛", "(3)˅", |next| !is_root_glyph(next));
    let exp = rewrite_glyph(&exp, "∜", "(4)˅", |next| !is_root_glyph(next));

    let exp = rewrite_glyph(&exp, "²", "^(2)", |next| next != '²' && next != '³');
    let exp = rewrite_glyph(&exp, "³", "^(3)", |next| next != '²' && next != '³');

    exp.replace("sin{-1}", "asin")
        .replace("cos{-1}", "acos")
        .replace("tan{-1}", "atan")
}

/// Replace `pattern` with `replacement` wherever the following character
/// passes `follow_ok` (end of string always passes).
fn rewrite_glyph(exp: &str, pattern: &str, replacement: &str, follow_ok: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(exp.len());
    let mut rest = exp;
    while let Some(pos) = rest.find(pattern) {
        let after = &rest[pos + pattern.len()..];
        out.push_str(&rest[..pos]);
        match after.chars().next() {
            Some(next) if !follow_ok(next) => out.push_str(pattern),
            _ => out.push_str(replacement),
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Insert the explicit `*` at juxtaposition boundaries: `)(`, a digit
/// before `(` or a letter, and `)` before a digit.
pub fn insert_implicit_multiplication(exp: &str) -> String {
    let exp = exp.replace(")(", ")*(");

    let chars: Vec<char> = exp.chars().collect();
    let mut out = String::with_capacity(exp.len());
    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        if let Some(&next) = chars.get(i + 1) {
            if c.is_ascii_digit() && (next == '(' || next.is_ascii_alphabetic()) {
                out.push('*');
            }
        }
    }

    let chars: Vec<char> = out.chars().collect();
    let mut out = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        if c == ')' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()) {
            out.push('*');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(raw: &str) -> String {
        normalize(raw, &Constants::new())
    }

    #[test]
    fn constant_substitution_wraps_in_parens() {
        assert_eq!(
            canon("2*pi"),
            format!("2*({})", std::f64::consts::PI)
        );
    }

    #[test]
    fn unknown_names_survive_substitution() {
        assert_eq!(canon("sin(90)"), "sin(90)");
        assert_eq!(canon("exp(2)"), "exp(2)");
    }

    #[test]
    fn lowercase_e_between_digits_is_the_constant() {
        // `2e3` is 2·e·3, not scientific notation
        let expected = format!("2*({})*3", std::f64::consts::E);
        assert_eq!(canon("2e3"), expected);
    }

    #[test]
    fn whitespace_is_removed() {
        assert_eq!(canon("1 + 2 *  3"), "1+2*3");
    }

    #[test]
    fn scientific_notation_folds_to_plain_decimal() {
        assert_eq!(canon("1.5E2+1"), "150+1");
        assert_eq!(canon("2E-3"), "0.002");
        assert_eq!(canon("1E+2"), "100");
    }

    #[test]
    fn sign_runs_reduce() {
        assert_eq!(reduce_signs("5--3"), "5+3");
        assert_eq!(reduce_signs("5+-3"), "5-3");
        assert_eq!(reduce_signs("5---3"), "5-3");
        assert_eq!(reduce_signs("5-+-3"), "5+3");
    }

    #[test]
    fn square_root_glyph() {
        assert_eq!(canon("√9"), "(2)˅9");
        assert_eq!(canon("2√9"), "2*(2)˅9");
    }

    #[test]
    fn cube_and_fourth_root_glyphs() {
        assert_eq!(canon("∛-8"), "(3)˅-8");
        assert_eq!(canon("∜16"), "(4)˅16");
    }

    #[test]
    fn explicit_index_root() {
        assert_eq!(canon("5˟√32"), "5˅32");
    }

    #[test]
    fn stacked_root_glyphs_leave_the_first_unrewritten() {
        // the leftover glyph is rejected later by the character whitelist
        assert_eq!(canon("√√9"), "√(2)˅9");
    }

    #[test]
    fn superscript_powers() {
        assert_eq!(canon("5²"), "5^(2)");
        assert_eq!(canon("2³"), "2^(3)");
    }

    #[test]
    fn inverse_trig_brace_notation() {
        assert_eq!(canon("sin{-1}(0.5)"), "asin(0.5)");
        assert_eq!(canon("tan{-1}(1)"), "atan(1)");
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(canon("2(3+4)"), "2*(3+4)");
        assert_eq!(canon("(2)(3)"), "(2)*(3)");
        assert_eq!(canon("(2)3"), "(2)*3");
        assert_eq!(canon("2x"), "2*x");
    }

    #[test]
    fn letter_before_paren_is_left_alone() {
        // function application, not multiplication
        assert_eq!(canon("sin(1)"), "sin(1)");
    }

    #[test]
    fn normalization_is_idempotent_on_canonical_text() {
        for raw in ["1+2*3", "2*(3+4)", "150+1", "(2)˅9", "2*x"] {
            assert_eq!(canon(raw), raw);
        }
    }
}
