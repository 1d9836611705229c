//! Conversions between user-entered display units and on-chain micro-units.

use crate::constants::MICRO_PER_UNIT;

/// Parses a user-entered amount from its leading decimal number, so
/// `"12 USDC"` reads as 12. Leading whitespace is skipped and anything after
/// the number is ignored. No leading number, or a non-finite one, yields
/// `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let int_digits = leading_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = leading_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    // exponent only counts when digits follow it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = leading_digits(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn leading_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Display units to micro-units, rounded to the nearest micro-unit.
pub fn to_micro(units: f64) -> Option<u64> {
    if !units.is_finite() || units < 0.0 {
        return None;
    }
    let micro = (units * MICRO_PER_UNIT as f64).round();
    if micro > u64::MAX as f64 {
        return None;
    }
    Some(micro as u64)
}

/// Micro-units rendered as display units with two decimals.
pub fn format_micro(micro: u64) -> String {
    let per_cent = (MICRO_PER_UNIT / 100) as u128;
    let cents = (micro as u128 + per_cent / 2) / per_cent;
    format!("{}.{:02}", cents / 100, cents % 100)
}

pub fn format_units(units: f64) -> String {
    format!("{:.2}", units)
}

/// Share of `total` already settled, as a whole percentage capped at 100.
pub fn progress_percent(settled: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (settled as f64 / total as f64 * 100.0).round();
    pct.min(100.0) as u8
}
