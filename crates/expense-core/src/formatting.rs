/// Format `value` with exactly `decimals` fractional digits.
///
/// Rounds the exact binary value half away from zero, the same way a
/// browser's `Number.prototype.toFixed` does: `0.125` is exactly
/// representable and becomes `"0.13"`, while `0.015` is stored just below
/// the tie and becomes `"0.01"`.
///
/// # Examples
///
/// ```
/// use expense_core::formatting::format_fixed;
///
/// assert_eq!(format_fixed(12.5, 2), "12.50");
/// assert_eq!(format_fixed(0.125, 2), "0.13");
/// assert_eq!(format_fixed(0.015, 2), "0.01");
/// assert_eq!(format_fixed(10.0 / 3.0, 2), "3.33");
/// ```
pub fn format_fixed(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let prec = decimals as usize;
    let magnitude = value.abs();
    let digits = if is_exact_tie(magnitude, prec) {
        round_tie_away(magnitude, prec)
    } else {
        format!("{magnitude:.prec$}")
    };
    // Only a negative input may print a leading minus.
    if value < 0.0 {
        format!("-{digits}")
    } else {
        digits
    }
}

/// Format an amount with at most two decimals, dropping trailing zeros.
///
/// # Examples
///
/// ```
/// use expense_core::formatting::format_amount;
///
/// assert_eq!(format_amount(12.5), "12.5");
/// assert_eq!(format_amount(100.0), "100");
/// assert_eq!(format_amount(0.1 + 0.2), "0.3");
/// ```
pub fn format_amount(value: f64) -> String {
    let fixed = format_fixed(value, 2);
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Format a growth percentage with two decimals and a `%` suffix.
///
/// `None` (growth from a zero month) renders as `"n/a"`.
///
/// # Examples
///
/// ```
/// use expense_core::formatting::format_percentage;
///
/// assert_eq!(format_percentage(Some(50.0)), "50.00%");
/// assert_eq!(format_percentage(Some(-12.5)), "-12.50%");
/// assert_eq!(format_percentage(None), "n/a");
/// ```
pub fn format_percentage(growth: Option<f64>) -> String {
    match growth {
        Some(pct) => format!("{}%", format_fixed(pct, 2)),
        None => "n/a".to_string(),
    }
}

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use expense_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let fixed = format_fixed(value.abs(), decimals);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (fixed.as_str(), None),
    };

    let mut result = group_thousands(int_part);
    if let Some(frac) = frac_part {
        result.push('.');
        result.push_str(frac);
    }

    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        format!("-{}", result)
    } else {
        result
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Whether `magnitude` sits exactly halfway between two values with `prec`
/// fractional digits.
///
/// The extra digits printed here outnumber those any neighbouring double can
/// share with the tie, so a `5` followed only by zeros means an exact tie.
fn is_exact_tie(magnitude: f64, prec: usize) -> bool {
    let extended = 2 * (prec + 1) + 20;
    let text = format!("{magnitude:.extended$}");
    let Some((_, frac)) = text.split_once('.') else {
        return false;
    };
    let tail = &frac[prec..];
    tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0')
}

/// Round an exact tie up in magnitude.
///
/// A tie has exactly `prec + 1` fractional digits, so printing that many is
/// lossless and the trailing `5` can be dropped before carrying.
fn round_tie_away(magnitude: f64, prec: usize) -> String {
    let extended = prec + 1;
    let mut text = format!("{magnitude:.extended$}");
    text.pop();
    if text.ends_with('.') {
        text.pop();
    }

    let mut chars: Vec<char> = text.chars().collect();
    let mut overflow = true;
    for ch in chars.iter_mut().rev() {
        match *ch {
            '.' => {}
            '9' => *ch = '0',
            digit => {
                *ch = char::from(digit as u8 + 1);
                overflow = false;
                break;
            }
        }
    }
    if overflow {
        chars.insert(0, '1');
    }
    chars.into_iter().collect()
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_fixed ─────────────────────────────────────────────────────────

    #[test]
    fn test_format_fixed_pads_decimals() {
        assert_eq!(format_fixed(12.5, 2), "12.50");
        assert_eq!(format_fixed(0.0, 2), "0.00");
        assert_eq!(format_fixed(7.0, 0), "7");
    }

    #[test]
    fn test_format_fixed_ties_round_away_from_zero() {
        assert_eq!(format_fixed(0.125, 2), "0.13");
        assert_eq!(format_fixed(2.5, 0), "3");
        assert_eq!(format_fixed(-0.125, 2), "-0.13");
    }

    #[test]
    fn test_format_fixed_binary_representation_below_tie() {
        // 1.005 is stored as 1.00499999999999989...
        assert_eq!(format_fixed(1.005, 2), "1.00");
    }

    #[test]
    fn test_format_fixed_repeating_fraction() {
        assert_eq!(format_fixed(10.0 / 3.0, 2), "3.33");
        assert_eq!(format_fixed(20.0 / 3.0, 2), "6.67");
    }

    #[test]
    fn test_format_fixed_rounds_stored_value_not_literal() {
        // Each is stored just below the tie.
        assert_eq!(format_fixed(0.015, 2), "0.01");
        assert_eq!(format_fixed(0.045, 2), "0.04");
        assert_eq!(format_fixed(0.105, 2), "0.10");
    }

    #[test]
    fn test_format_fixed_tie_carries_into_integer_part() {
        assert_eq!(format_fixed(9.995, 2), "9.99");
        assert_eq!(format_fixed(99.5, 0), "100");
        assert_eq!(format_fixed(0.5, 0), "1");
        assert_eq!(format_fixed(0.375, 2), "0.38");
    }

    #[test]
    fn test_format_fixed_huge_values_stay_finite() {
        let text = format_fixed(1e307, 2);
        assert!(!text.contains("inf"), "got {text}");
        assert!(text.starts_with("9999999999999999860"));
        assert_eq!(text.len(), 307 + 3);
        assert!(text.ends_with(".00"));
        assert_eq!(format_fixed(f64::MAX, 0).len(), 309);
    }

    #[test]
    fn test_format_fixed_non_finite() {
        assert_eq!(format_fixed(f64::NAN, 2), "NaN");
        assert_eq!(format_fixed(f64::INFINITY, 2), "inf");
    }

    #[test]
    fn test_format_fixed_negative_input_keeps_sign_when_rounded_to_zero() {
        assert_eq!(format_fixed(-0.001, 2), "-0.00");
    }

    #[test]
    fn test_format_fixed_no_negative_zero_for_positive_input() {
        assert_eq!(format_fixed(0.001, 2), "0.00");
        assert_eq!(format_fixed(-0.0, 2), "0.00");
    }

    // ── format_amount ────────────────────────────────────────────────────────

    #[test]
    fn test_format_amount_trims_zeros() {
        assert_eq!(format_amount(12.5), "12.5");
        assert_eq!(format_amount(12.25), "12.25");
        assert_eq!(format_amount(40.0), "40");
        assert_eq!(format_amount(0.0), "0");
    }

    #[test]
    fn test_format_amount_hides_float_noise() {
        assert_eq!(format_amount(0.1 + 0.2), "0.3");
    }

    // ── format_percentage ────────────────────────────────────────────────────

    #[test]
    fn test_format_percentage_values() {
        assert_eq!(format_percentage(Some(50.0)), "50.00%");
        assert_eq!(format_percentage(Some(-100.0)), "-100.00%");
        assert_eq!(format_percentage(Some(33.333)), "33.33%");
    }

    #[test]
    fn test_format_percentage_undefined() {
        assert_eq!(format_percentage(None), "n/a");
    }

    // ── format_number ────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 1), "1,234.5");
        assert_eq!(format_number(1_234_567.0, 0), "1,234,567");
        assert_eq!(format_number(1_000.0, 0), "1,000");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-9_876.5, 1), "-9,876.5");
    }

    #[test]
    fn test_format_number_rounds_to_zero_without_sign() {
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn test_group_thousands_short_strings() {
        assert_eq!(group_thousands("5"), "5");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1234"), "1,234");
    }
}
