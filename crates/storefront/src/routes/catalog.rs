//! Public catalog page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    http::Uri,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use zeidan_core::format_brl;
use zeidan_core::models::Product;
use zeidan_core::whatsapp::order_link_for_price;
use zeidan_sheets::store;

use crate::error::AppError;
use crate::filters;
use crate::middleware::catalog_rate_limiter;
use crate::state::AppState;

/// Shown for products without an http(s) image.
pub const PLACEHOLDER_IMAGE: &str = "https://cdn-icons-png.flaticon.com/512/3050/3050253.png";

pub fn router() -> Router<AppState> {
    let catalog = get(catalog_page);
    let catalog = match catalog_rate_limiter() {
        Some(limiter) => catalog.layer(limiter),
        None => catalog,
    };
    Router::new().route("/", catalog)
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: String,
}

/// One product card.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub name: String,
    /// `R$ 1.234,50`
    pub price: String,
    pub image_url: String,
    pub has_photo: bool,
    pub order_link: String,
}

impl ProductCard {
    fn new(product: &Product, whatsapp_number: &str) -> Self {
        Self {
            name: product.name.clone(),
            price: format_brl(product.sale_price),
            image_url: product
                .image_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            has_photo: product.image_url.is_some(),
            order_link: order_link_for_price(whatsapp_number, &product.name, product.sale_price),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate {
    pub store_name: String,
    pub query: String,
    pub products: Vec<ProductCard>,
    /// Nothing to show at all (empty worksheet or store unavailable).
    pub catalog_empty: bool,
}

/// Products whose name contains `query`, ignoring case. A blank query keeps
/// everything.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(|p| !p.name.trim().is_empty())
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Catalog grid.
///
/// A store failure is logged and rendered as an empty catalog; the page
/// itself always answers 200.
#[instrument(skip(state))]
async fn catalog_page(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> CatalogTemplate {
    let products = match store::products(state.store()).await {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!(error = %e, kind = e.kind(), "Catalog unavailable");
            Vec::new()
        }
    };

    let config = state.config();
    let cards: Vec<ProductCard> = filter_products(&products, &query.q)
        .into_iter()
        .map(|p| ProductCard::new(p, &config.whatsapp_number))
        .collect();
    let catalog_empty = products.iter().all(|p| p.name.trim().is_empty());

    tracing::debug!(shown = cards.len(), total = products.len(), "Rendered catalog");

    CatalogTemplate {
        store_name: config.store_name.clone(),
        query: query.q.trim().to_string(),
        products: cards,
        catalog_empty,
    }
}

/// Fallback for unknown paths.
pub(crate) async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: f64, image: Option<&str>) -> Product {
        Product {
            id: "1".to_string(),
            name: name.to_string(),
            standard_cost: 0.0,
            sale_price: price,
            image_url: image.map(str::to_string),
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let products = vec![
            product("Dior Sauvage", 650.0, None),
            product("Lattafa Asad", 220.0, None),
            product("Club de Nuit", 350.0, None),
        ];
        let names: Vec<&str> = filter_products(&products, "  sAuVaGe ")
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Dior Sauvage"]);
        assert_eq!(filter_products(&products, "").len(), 3);
        assert!(filter_products(&products, "chanel").is_empty());
    }

    #[test]
    fn test_filter_skips_blank_rows() {
        let products = vec![product("", 0.0, None), product("Asad", 220.0, None)];
        assert_eq!(filter_products(&products, "").len(), 1);
    }

    #[test]
    fn test_card_uses_placeholder_without_photo() {
        let card = ProductCard::new(&product("Asad", 220.0, None), "5531999999999");
        assert_eq!(card.image_url, PLACEHOLDER_IMAGE);
        assert!(!card.has_photo);
        assert_eq!(card.price, "R$ 220,00");
        assert!(card.order_link.starts_with("https://wa.me/5531999999999?text="));
    }

    #[test]
    fn test_card_keeps_photo() {
        let card = ProductCard::new(
            &product("Asad", 220.0, Some("https://img.example.com/asad.jpg")),
            "5531999999999",
        );
        assert_eq!(card.image_url, "https://img.example.com/asad.jpg");
        assert!(card.has_photo);
    }
}
