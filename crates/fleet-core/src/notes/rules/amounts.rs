//! Amount parsing for note prices (`12,500`).

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::AMOUNT_PARTS;

/// Parse an amount written with comma thousands separators.
///
/// A leading `$` and surrounding whitespace are tolerated. Returns `None`
/// for anything that is not a plain non-negative number.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let caps = AMOUNT_PARTS.captures(s)?;
    let cleaned = caps[1].replace(',', "");
    Decimal::from_str(&cleaned).ok()
}

/// Format an amount with comma thousands separators, e.g. `12,500`.
///
/// Whole amounts are written without cents.
pub fn format_amount(amount: Decimal) -> String {
    let normalized = amount.normalize();
    let s = normalized.to_string();
    let (sign, s) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (integer_part, fraction) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::from(sign);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    match fraction {
        Some(f) => format!("{}.{:0<2}", formatted, f),
        None => formatted,
    }
}
