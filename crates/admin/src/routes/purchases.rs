//! Purchase route handlers.

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

use zeidan_core::models::{Product, Purchase, brazil_today};
use zeidan_core::{NextOrderCode, OrderPrefix, PurchaseStatus, Table, next_order_code};
use zeidan_sheets::store;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::{SelectOption, amount_or, find_product, non_blank, resolve_order_code, sheet_date};

/// Query parameters for the purchase page.
#[derive(Debug, Deserialize)]
pub struct PurchasesQuery {
    /// Order code of a purchase just recorded.
    pub recorded: Option<String>,
}

/// Form input for recording a purchase.
///
/// A blank unit cost falls back to the product's standard cost.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseForm {
    #[serde(default)]
    pub order_code: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub arrival_date: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit_cost: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

impl PurchaseForm {
    fn prefilled(next: NextOrderCode) -> Self {
        Self {
            order_code: next.to_string(),
            date: brazil_today(),
            quantity: "1".to_string(),
            status: PurchaseStatus::Ordered.label().to_string(),
            ..Self::default()
        }
    }
}

/// Purchase row for templates.
#[derive(Debug, Clone)]
pub struct PurchaseView {
    pub purchase: Purchase,
    pub total_cost: f64,
}

/// Purchase page template.
#[derive(Template, WebTemplate)]
#[template(path = "purchases/index.html")]
pub struct PurchasesTemplate {
    pub current_path: String,
    /// Newest first.
    pub purchases: Vec<PurchaseView>,
    pub form: PurchaseForm,
    pub products: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub next_code: String,
    pub code_unresolved: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/purchases", get(index).post(create))
}

struct PurchasesData {
    products: Vec<Product>,
    purchases_table: Table,
    purchases: Vec<Purchase>,
}

impl PurchasesData {
    async fn load(state: &AppState) -> Result<Self, AppError> {
        let (products, purchases) = tokio::join!(
            store::products(state.store()),
            store::purchases(state.store()),
        );
        let (purchases_table, purchases) = purchases?;
        Ok(Self {
            products: products?,
            purchases_table,
            purchases,
        })
    }

    fn next_code(&self) -> NextOrderCode {
        next_order_code(OrderPrefix::Purchase, &self.purchases_table.records)
    }

    fn into_template(
        self,
        form: Option<PurchaseForm>,
        notice: Option<String>,
        error: Option<String>,
    ) -> PurchasesTemplate {
        let next = self.next_code();
        let form = form.unwrap_or_else(|| PurchaseForm::prefilled(next));
        let purchases = self
            .purchases
            .into_iter()
            .rev()
            .map(|purchase| PurchaseView {
                total_cost: purchase.total_cost(),
                purchase,
            })
            .collect();

        PurchasesTemplate {
            current_path: "/purchases".to_string(),
            products: SelectOption::products(&self.products, &form.product_id),
            statuses: SelectOption::from_labels(
                PurchaseStatus::KNOWN.iter().map(PurchaseStatus::label),
                &form.status,
            ),
            next_code: next.to_string(),
            code_unresolved: next.is_unresolved(),
            purchases,
            form,
            notice,
            error,
        }
    }
}

/// Purchase list and form.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<PurchasesQuery>,
) -> Result<Response, AppError> {
    let notice = query
        .recorded
        .map(|code| format!("Compra {code} registrada."));
    let template = PurchasesData::load(&state)
        .await?
        .into_template(None, notice, None);
    Ok(template.into_response())
}

fn parse_quantity(value: &str) -> Result<u32, String> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| format!("Quantidade inválida: {}", value.trim()))
}

/// Turn the form into a purchase row.
fn build_purchase(
    form: &PurchaseForm,
    products: &[Product],
    next: NextOrderCode,
) -> Result<Purchase, String> {
    let order_code = resolve_order_code(&form.order_code, next)?;
    let product = find_product(products, &form.product_id)
        .ok_or_else(|| "Selecione um produto cadastrado.".to_string())?;
    let date = sheet_date(&form.date)?;
    let arrival_date = match non_blank(&form.arrival_date) {
        Some(text) => Some(sheet_date(&text)?),
        None => None,
    };
    let quantity = parse_quantity(&form.quantity)?;

    Ok(Purchase {
        order_code,
        date,
        arrival_date,
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        quantity,
        unit_cost: amount_or(&form.unit_cost, product.standard_cost),
        supplier: non_blank(&form.supplier),
        status: non_blank(&form.status).map_or(PurchaseStatus::Ordered, PurchaseStatus::from),
        notes: non_blank(&form.notes),
    })
}

/// Record a purchase.
#[instrument(skip(_admin, state))]
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<PurchaseForm>,
) -> Result<Response, AppError> {
    let data = PurchasesData::load(&state).await?;

    let purchase = match build_purchase(&form, &data.products, data.next_code()) {
        Ok(purchase) => purchase,
        Err(message) => {
            let template = data.into_template(Some(form), None, Some(message));
            return Ok((StatusCode::BAD_REQUEST, template).into_response());
        }
    };

    store::add_purchase(state.store(), &purchase).await?;
    tracing::info!(
        order_code = %purchase.order_code,
        product_id = %purchase.product_id,
        quantity = purchase.quantity,
        "Purchase recorded"
    );

    Ok(Redirect::to(&format!(
        "/purchases?recorded={}",
        urlencoding::encode(&purchase.order_code)
    ))
    .into_response())
}
