//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use zeidan_core::currency::format_decimal_br;
use zeidan_core::format_brl;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a number as Brazilian Real.
///
/// Usage in templates: `{{ sale.amounts.received|brl }}` renders `R$ 1.234,50`.
/// Non-numeric input renders `R$ 0,00`.
#[askama::filter_fn]
pub fn brl(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_brl(parse_amount(&value)))
}

/// Formats a number as a percentage with a decimal comma.
///
/// Usage in templates: `{{ report.average_margin_percent|percent }}` renders `38,46%`.
#[askama::filter_fn]
pub fn percent(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("{}%", format_decimal_br(parse_amount(&value))))
}

fn parse_amount(value: &impl Display) -> f64 {
    value
        .to_string()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
