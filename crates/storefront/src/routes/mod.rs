//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET /health          - Liveness
//! GET /health/ready    - Store reachability
//! GET /?q=<search>     - Catalog grid (rate limited)
//! *                    - 404 page
//! ```

use axum::Router;

use crate::state::AppState;

pub mod catalog;
pub mod health;

/// Build the full route table.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(catalog::router())
        .fallback(catalog::not_found)
}

