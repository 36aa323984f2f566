//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Store reachability
//!
//! # Auth (shared password)
//! GET  /auth/login             - Login page
//! POST /auth/login             - Verify password (rate limited)
//! POST /auth/logout            - End session
//!
//! # Back office (requires login)
//! GET  /                       - Dashboard
//! GET  /products               - Product list + registration form
//! POST /products               - Register product
//! GET  /purchases              - Purchase list + form
//! POST /purchases              - Record purchase
//! GET  /sales                  - Sale list + form
//! POST /sales                  - Record sale
//! GET  /reports                - Profit and stock reports
//! ```

use axum::Router;

use zeidan_core::models::{Product, SHEET_DATE_FORMAT, brazil_today, parse_sheet_date};
use zeidan_core::{NextOrderCode, normalize_currency_str};

use crate::state::AppState;

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod products;
pub mod purchases;
pub mod reports;
pub mod sales;

/// Build the full route table.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(products::router())
        .merge(purchases::router())
        .merge(sales::router())
        .merge(reports::router())
}

/// One `<option>` of a `<select>`.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    /// Options for labelled values, selecting the one equal to `current`.
    pub(crate) fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>, current: &str) -> Vec<Self> {
        labels
            .into_iter()
            .map(|label| Self {
                value: label.to_string(),
                label: label.to_string(),
                selected: label == current,
            })
            .collect()
    }

    /// Product picker, selecting the product with ID `current`.
    pub(crate) fn products(products: &[Product], current: &str) -> Vec<Self> {
        products
            .iter()
            .filter(|p| !p.id.trim().is_empty())
            .map(|p| Self {
                value: p.id.clone(),
                label: format!("{} - {}", p.id, p.name),
                selected: p.id == current,
            })
            .collect()
    }
}

/// Trimmed form text, `None` when blank.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A typed amount, or `default` when the field is blank.
pub(crate) fn amount_or(value: &str, default: f64) -> f64 {
    if value.trim().is_empty() {
        default
    } else {
        normalize_currency_str(value)
    }
}

/// A sheet date (`dd/mm/YYYY`) from form input; blank means today in Brazil.
pub(crate) fn sheet_date(value: &str) -> Result<String, String> {
    let Some(text) = non_blank(value) else {
        return Ok(brazil_today());
    };
    parse_sheet_date(&text)
        .map(|date| date.format(SHEET_DATE_FORMAT).to_string())
        .ok_or_else(|| format!("Data inválida: {text} (use dd/mm/aaaa)."))
}

/// The order code to record: the operator's entry, or the next code when the
/// field was left blank or still holds the `??` placeholder.
pub(crate) fn resolve_order_code(value: &str, next: NextOrderCode) -> Result<String, String> {
    match non_blank(value) {
        Some(code) if !code.ends_with("??") => Ok(code),
        _ if !next.is_unresolved() => Ok(next.to_string()),
        _ => Err("Não foi possível calcular o próximo código. Informe o código do pedido.".to_string()),
    }
}

/// Find a product by its ID.
pub(crate) fn find_product<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    let id = id.trim();
    products.iter().find(|p| p.id.trim() == id)
}
