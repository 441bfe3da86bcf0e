//! Decimal to fraction approximation.

use num_rational::Ratio;
use num_traits::ToPrimitive;

/// Upper bound on the search; pathological inputs stop here with the best
/// pair found so far.
const MAX_ITERATIONS: u32 = 1_000_000;

/// Approximate a decimal as a `num/den` pair by greedy search.
///
/// The input is first rounded to 8 decimal places. Starting from
/// `ceil(decimal)/1`, the numerator is incremented while the fraction is
/// below the target; once it overshoots, the denominator is incremented and
/// the numerator recomputed as `trunc(decimal * den)`. The result is built
/// with [`Ratio::new_raw`] so the searched pair is returned as found, not
/// reduced.
///
/// This is a utility for callers who want a readable fraction; the
/// evaluator itself never goes through it.
pub fn fractionate(decimal: f64) -> Ratio<i64> {
    let decimal = (decimal * 1e8).round() / 1e8;

    let mut num = decimal.ceil().to_i64().unwrap_or(0);
    let mut den: i64 = 1;
    let mut fraction = num as f64 / den as f64;
    let mut iteration = MAX_ITERATIONS;

    while fraction != decimal && iteration > 0 {
        if fraction < decimal {
            num += 1;
        } else {
            den += 1;
            num = (decimal * den as f64).trunc().to_i64().unwrap_or(0);
        }
        fraction = num as f64 / den as f64;
        iteration -= 1;
    }

    Ratio::new_raw(num, den)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_half() {
        let f = fractionate(0.5);
        assert_eq!((*f.numer(), *f.denom()), (1, 2));
    }

    #[test]
    fn integers_keep_denominator_one() {
        let f = fractionate(4.0);
        assert_eq!((*f.numer(), *f.denom()), (4, 1));
    }

    #[test]
    fn quarter() {
        let f = fractionate(0.25);
        assert_eq!((*f.numer(), *f.denom()), (1, 4));
    }

    #[test]
    fn repeating_third_is_approximated() {
        // 0.33333333 after the 8-decimal rounding step; the search may stop
        // at the iteration bound with a near miss rather than an exact hit
        let f = fractionate(1.0 / 3.0);
        let value = *f.numer() as f64 / *f.denom() as f64;
        assert!((value - 0.33333333).abs() < 1e-5, "got {value}");
    }

    #[test]
    fn negative_values() {
        let f = fractionate(-0.5);
        assert_eq!(*f.numer() as f64 / *f.denom() as f64, -0.5);
    }

    #[test]
    fn improper_fraction() {
        let f = fractionate(2.75);
        assert_eq!(*f.numer() as f64 / *f.denom() as f64, 2.75);
    }
}
