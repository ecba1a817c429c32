//! BRL money formatting
//!
//! All monetary fields are displayed in pt-BR / BRL form: `R$ 1.234,56`
//! (non-breaking space after the symbol, `.` thousands, `,` decimals).

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Currency symbol
pub const BRL_SYMBOL: &str = "R$";

/// Separator between symbol and amount (U+00A0, as the pt-BR locale emits)
pub const SYMBOL_SEPARATOR: char = '\u{a0}';

/// Format a decimal amount as BRL
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use shared::money::format_brl;
///
/// assert_eq!(format_brl(Decimal::new(8990, 2)), "R$\u{a0}89,90");
/// assert_eq!(format_brl(Decimal::new(123456, 2)), "R$\u{a0}1.234,56");
/// ```
pub fn format_brl(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded = rounded.abs();
    rounded.rescale(2);

    let plain = rounded.to_string();
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut out = String::with_capacity(plain.len() + 8);
    if negative {
        out.push('-');
    }
    out.push_str(BRL_SYMBOL);
    out.push(SYMBOL_SEPARATOR);
    out.push_str(&group_thousands(int_part));
    out.push(',');
    out.push_str(frac_part);
    out
}

/// Insert `.` every three digits from the right
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Parse a user-typed BRL amount (`"R$ 1.234,56"`, `"89,90"`, `"12.5"`)
///
/// Anything unparseable yields zero, matching how the price inputs behave.
pub fn parse_brl(input: &str) -> Decimal {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let normalized = if cleaned.contains(',') {
        // pt-BR: '.' groups thousands, ',' is the decimal mark
        cleaned.replace('.', "").replacen(',', ".", 1)
    } else if cleaned.matches('.').count() > 1 {
        cleaned.replace('.', "")
    } else {
        cleaned
    };

    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

/// Most digits a currency input keeps (R$ 9.999.999.999.999,99)
pub const MAX_INPUT_DIGITS: usize = 15;

/// Format a currency input field as the user types
///
/// Non-digits are dropped and the digits are read as cents, so typing
/// `8990` shows `R$ 89,90`. Empty input stays empty. Leading zeros are
/// ignored and digits past [`MAX_INPUT_DIGITS`] are not accepted.
pub fn format_brl_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }
    let significant: String = digits
        .trim_start_matches('0')
        .chars()
        .take(MAX_INPUT_DIGITS)
        .collect();
    if significant.is_empty() {
        return format_brl(Decimal::ZERO);
    }
    Decimal::from_str(&significant)
        .map(|cents| format_brl(cents / Decimal::ONE_HUNDRED))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brl(s: &str) -> String {
        s.replace(' ', "\u{a0}")
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(Decimal::new(8990, 2)), brl("R$ 89,90"));
        assert_eq!(format_brl(Decimal::ZERO), brl("R$ 0,00"));
        assert_eq!(format_brl(Decimal::new(5, 1)), brl("R$ 0,50"));
        assert_eq!(format_brl(Decimal::new(100000, 0)), brl("R$ 100.000,00"));
        assert_eq!(format_brl(Decimal::new(123456789, 2)), brl("R$ 1.234.567,89"));
    }

    #[test]
    fn test_format_brl_rounding() {
        assert_eq!(format_brl(Decimal::new(12345, 3)), brl("R$ 12,35"));
        assert_eq!(format_brl(Decimal::new(12344, 3)), brl("R$ 12,34"));
    }

    #[test]
    fn test_format_brl_negative() {
        assert_eq!(format_brl(Decimal::new(-1000, 2)), brl("-R$ 10,00"));
        // rounds to zero: no sign
        assert_eq!(format_brl(Decimal::new(-1, 3)), brl("R$ 0,00"));
    }

    #[test]
    fn test_parse_brl() {
        assert_eq!(parse_brl("R$ 1.234,56"), Decimal::new(123456, 2));
        assert_eq!(parse_brl("89,90"), Decimal::new(8990, 2));
        assert_eq!(parse_brl("12.5"), Decimal::new(125, 1));
        assert_eq!(parse_brl("1.000.000"), Decimal::new(1000000, 0));
        assert_eq!(parse_brl("abc"), Decimal::ZERO);
        assert_eq!(parse_brl(""), Decimal::ZERO);
    }

    #[test]
    fn test_format_brl_input() {
        assert_eq!(format_brl_input("8990"), brl("R$ 89,90"));
        assert_eq!(format_brl_input("R$ 1"), brl("R$ 0,01"));
        assert_eq!(format_brl_input("12a34"), brl("R$ 12,34"));
        assert_eq!(format_brl_input(""), "");
        assert_eq!(format_brl_input("abc"), "");
        assert_eq!(format_brl_input("000"), brl("R$ 0,00"));
        assert_eq!(format_brl_input("0050"), brl("R$ 0,50"));
    }

    #[test]
    fn test_format_brl_input_caps_length() {
        let typed = "9".repeat(40);
        assert_eq!(format_brl_input(&typed), brl("R$ 9.999.999.999.999,99"));
        assert_eq!(format_brl_input(&"9".repeat(MAX_INPUT_DIGITS)), format_brl_input(&typed));
    }
}
