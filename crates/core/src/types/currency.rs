//! Brazilian Real amounts.
//!
//! Monetary columns in the sheet hold either native numbers or text typed the
//! Brazilian way (`R$ 1.234,56`). [`normalize_currency`] turns either into an
//! `f64` for arithmetic and [`format_brl`] renders amounts back for display.
//!
//! Anything that cannot be parsed counts as zero. A genuine zero and a missing
//! value both come back as `0.0`.

use super::cell::CellValue;

/// Currency symbol stripped from amounts before parsing.
const CURRENCY_SYMBOL: &str = "R$";

/// Convert a cell into an amount.
///
/// - Falsy cells (empty, `""`, `0`, `false`) are `0.0`.
/// - Numbers pass through unchanged; `true` counts as `1.0`.
/// - Text goes through [`normalize_currency_str`].
#[must_use]
pub fn normalize_currency(value: &CellValue) -> f64 {
    if value.is_falsy() {
        return 0.0;
    }
    match value {
        CellValue::Number(n) => *n,
        CellValue::Bool(_) => 1.0,
        CellValue::Text(s) => normalize_currency_str(s),
        CellValue::Empty => 0.0,
    }
}

/// Parse Brazilian-formatted amount text.
///
/// Removes `R$` and whitespace, drops `.` thousands separators, turns the `,`
/// decimal separator into `.` and parses. Returns `0.0` on failure.
///
/// # Example
///
/// ```
/// use zeidan_core::normalize_currency_str;
///
/// assert!((normalize_currency_str("R$ 1.234,56") - 1234.56).abs() < 1e-9);
/// assert!(normalize_currency_str("abc").abs() < f64::EPSILON);
/// ```
#[must_use]
pub fn normalize_currency_str(text: &str) -> f64 {
    let cleaned: String = text
        .replace(CURRENCY_SYMBOL, "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Sum a sequence of cells as amounts.
pub fn sum_currency<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a CellValue>,
{
    values.into_iter().map(normalize_currency).sum()
}

/// Format an amount as Brazilian Real, e.g. `R$ 1.234,56`.
#[must_use]
pub fn format_brl(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}R$ {},{frac_part}", group_thousands(int_part))
}

/// Format a plain number Brazilian-style with two decimals, e.g. `1.234,56`.
#[must_use]
pub fn format_decimal_br(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let (sign, digits) = int_part
        .strip_prefix('-')
        .map_or(("", int_part), |d| ("-", d));
    format!("{sign}{},{frac_part}", group_thousands(digits))
}

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

/// Round to two decimal places.
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
