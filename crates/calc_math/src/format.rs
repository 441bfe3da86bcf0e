//! Canonical number rendering.
//!
//! Text produced here is spliced back into the expression string during
//! evaluation, so it must never contain an exponent marker: a stray `E`
//! would be re-read as a name. Infinities use the `Infinity` spelling the
//! evaluator's operand parser recognizes.

/// Render a value as plain decimal text.
///
/// Rust's `Display` for `f64` already prints the shortest round-tripping
/// decimal form without scientific notation, so apart from the non-finite
/// spellings and collapsing `-0` this is a direct formatting call.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Round a final result to 12 fractional digits.
///
/// All public solving entry points pass their result through here, which
/// absorbs accumulated float noise such as `6.283185307179586` for `2π`.
pub fn truncate_result(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.12}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn integers_print_without_a_fraction() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-42.0), "-42");
    }

    #[test]
    fn negative_zero_collapses() {
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn non_finite_spellings() {
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn large_magnitudes_stay_plain_decimal() {
        let text = format_number(1.5e21);
        assert!(!text.contains('e') && !text.contains('E'), "got {text}");
        assert_eq!(text, "1500000000000000000000");
    }

    #[test]
    fn tiny_magnitudes_stay_plain_decimal() {
        let text = format_number(1.5e-7);
        assert!(!text.contains('e') && !text.contains('E'), "got {text}");
        assert_eq!(text, "0.00000015");
    }

    #[test]
    fn truncate_rounds_to_twelve_fractional_digits() {
        assert_eq!(truncate_result(6.283185307179586), 6.28318530718);
        assert_eq!(truncate_result(1.0000000000004), 1.0);
    }

    #[test]
    fn truncate_passes_non_finite_through() {
        assert_eq!(truncate_result(f64::INFINITY), f64::INFINITY);
        assert!(truncate_result(f64::NAN).is_nan());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Formatting never emits an exponent marker and always round-trips.
        #[test]
        fn format_round_trips(value in -1e12f64..1e12) {
            let text = format_number(value);
            prop_assert!(!text.contains('e') && !text.contains('E'));
            let parsed: f64 = text.parse().unwrap();
            if value == 0.0 {
                prop_assert_eq!(parsed, 0.0);
            } else {
                prop_assert_eq!(parsed, value);
            }
        }
    }
}
