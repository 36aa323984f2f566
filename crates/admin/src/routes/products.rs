//! Product catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use zeidan_core::models::Product;
use zeidan_core::normalize_currency_str;
use zeidan_sheets::store;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::{find_product, non_blank};

/// Query parameters for the product page.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// ID of a product just registered.
    pub added: Option<String>,
}

/// Form input for registering a product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub standard_cost: String,
    #[serde(default)]
    pub sale_price: String,
}

/// Product row for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub standard_cost: f64,
    pub sale_price: f64,
    pub margin_percent: f64,
    pub has_image: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            standard_cost: product.standard_cost,
            sale_price: product.sale_price,
            margin_percent: product.list_margin_percent(),
            has_image: product.image_url.is_some(),
        }
    }
}

/// Product page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub current_path: String,
    pub products: Vec<ProductView>,
    pub form: ProductForm,
    pub notice: Option<String>,
    pub error: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/products", get(index).post(create))
}

async fn page(
    state: &AppState,
    form: ProductForm,
    notice: Option<String>,
    error: Option<String>,
) -> Result<ProductsTemplate, AppError> {
    let products = store::products(state.store()).await?;
    Ok(ProductsTemplate {
        current_path: "/products".to_string(),
        products: products.iter().map(ProductView::from).collect(),
        form,
        notice,
        error,
    })
}

/// Product list and registration form.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Response, AppError> {
    let notice = query
        .added
        .map(|id| format!("Produto {id} cadastrado."));
    let template = page(&state, ProductForm::default(), notice, None).await?;
    Ok(template.into_response())
}

/// Validate the form against the current catalog.
fn validate(form: &ProductForm, existing: &[Product]) -> Result<Product, String> {
    let id = non_blank(&form.id).ok_or("Informe o ID do produto.")?;
    let name = non_blank(&form.name).ok_or("Informe o nome do produto.")?;
    if find_product(existing, &id).is_some() {
        return Err(format!("Já existe um produto com o ID {id}."));
    }

    Ok(Product {
        id,
        name,
        standard_cost: normalize_currency_str(&form.standard_cost),
        sale_price: normalize_currency_str(&form.sale_price),
        image_url: None,
    })
}

/// Register a product.
#[instrument(skip(_admin, state))]
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let existing = store::products(state.store()).await?;

    let product = match validate(&form, &existing) {
        Ok(product) => product,
        Err(message) => {
            let template = page(&state, form, None, Some(message)).await?;
            return Ok((StatusCode::BAD_REQUEST, template).into_response());
        }
    };

    store::add_product(state.store(), &product).await?;
    tracing::info!(product_id = %product.id, name = %product.name, "Product registered");

    Ok(Redirect::to(&format!("/products?added={}", urlencoding::encode(&product.id))).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(id: &str, name: &str) -> ProductForm {
        ProductForm {
            id: id.to_string(),
            name: name.to_string(),
            standard_cost: "R$ 1.200,00".to_string(),
            sale_price: "1.850,5".to_string(),
        }
    }

    #[test]
    fn test_validate_normalizes_amounts() {
        let product = validate(&form(" 12 ", " Aventus "), &[]).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(product.id, "12");
        assert_eq!(product.name, "Aventus");
        assert!((product.standard_cost - 1200.0).abs() < 1e-9);
        assert!((product.sale_price - 1850.5).abs() < 1e-9);
    }

    #[test]
    fn test_validate_requires_id_and_name() {
        assert!(validate(&form("", "Aventus"), &[]).is_err());
        assert!(validate(&form("12", "  "), &[]).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_id() {
        let existing = vec![Product {
            id: "12".to_string(),
            name: "Aventus".to_string(),
            standard_cost: 0.0,
            sale_price: 0.0,
            image_url: None,
        }];
        let err = validate(&form("12", "Outro"), &existing).unwrap_err();
        assert!(err.contains("12"));
    }
}
