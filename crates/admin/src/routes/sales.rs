//! Sale route handlers.

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

use zeidan_core::models::{Product, Sale, brazil_today};
use zeidan_core::{NextOrderCode, OrderPrefix, Platform, SaleStatus, Table, next_order_code};
use zeidan_sheets::store;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::{SelectOption, amount_or, find_product, non_blank, resolve_order_code, sheet_date};

/// Query parameters for the sale page.
#[derive(Debug, Deserialize)]
pub struct SalesQuery {
    /// Order code of a sale just recorded.
    pub recorded: Option<String>,
}

/// Form input for recording a sale.
///
/// Blank amounts fall back to the product's standard cost and sale price;
/// a blank received value means the sale closed at list price.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleForm {
    #[serde(default)]
    pub order_code: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub list_price: String,
    #[serde(default)]
    pub received: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub notes: String,
}

impl SaleForm {
    /// A fresh form prefilled with the next order code and today's date.
    fn prefilled(next: NextOrderCode) -> Self {
        Self {
            order_code: next.to_string(),
            status: SaleStatus::Paid.label().to_string(),
            date: brazil_today(),
            platform: Platform::Instagram.label().to_string(),
            ..Self::default()
        }
    }
}

/// Sale page template.
#[derive(Template, WebTemplate)]
#[template(path = "sales/index.html")]
pub struct SalesTemplate {
    pub current_path: String,
    /// Newest first.
    pub sales: Vec<Sale>,
    pub form: SaleForm,
    pub products: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub platforms: Vec<SelectOption>,
    pub next_code: String,
    pub code_unresolved: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/sales", get(index).post(create))
}

/// Everything the sale page and sale validation need.
struct SalesData {
    products: Vec<Product>,
    sales_table: Table,
    sales: Vec<Sale>,
}

impl SalesData {
    async fn load(state: &AppState) -> Result<Self, AppError> {
        let (products, sales) = tokio::join!(
            store::products(state.store()),
            store::sales(state.store()),
        );
        let (sales_table, sales) = sales?;
        Ok(Self {
            products: products?,
            sales_table,
            sales,
        })
    }

    fn next_code(&self) -> NextOrderCode {
        next_order_code(OrderPrefix::Sale, &self.sales_table.records)
    }

    fn into_template(
        self,
        form: Option<SaleForm>,
        notice: Option<String>,
        error: Option<String>,
    ) -> SalesTemplate {
        let next = self.next_code();
        let form = form.unwrap_or_else(|| SaleForm::prefilled(next));
        let mut sales = self.sales;
        sales.reverse();

        SalesTemplate {
            current_path: "/sales".to_string(),
            products: SelectOption::products(&self.products, &form.product_id),
            statuses: SelectOption::from_labels(
                SaleStatus::KNOWN.iter().map(SaleStatus::label),
                &form.status,
            ),
            platforms: SelectOption::from_labels(
                Platform::KNOWN.iter().map(Platform::label),
                &form.platform,
            ),
            next_code: next.to_string(),
            code_unresolved: next.is_unresolved(),
            sales,
            form,
            notice,
            error,
        }
    }
}

/// Sale list and form.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> Result<Response, AppError> {
    let notice = query.recorded.map(|code| format!("Venda {code} registrada."));
    let template = SalesData::load(&state).await?.into_template(None, notice, None);
    Ok(template.into_response())
}

/// Turn the form into a sale row.
fn build_sale(form: &SaleForm, products: &[Product], next: NextOrderCode) -> Result<Sale, String> {
    let order_code = resolve_order_code(&form.order_code, next)?;
    let product = find_product(products, &form.product_id)
        .ok_or_else(|| "Selecione um produto cadastrado.".to_string())?;
    let date = sheet_date(&form.date)?;

    let cost = amount_or(&form.cost, product.standard_cost);
    let list_price = amount_or(&form.list_price, product.sale_price);
    let received = amount_or(&form.received, list_price);

    Ok(Sale {
        order_code,
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        status: non_blank(&form.status).map_or(SaleStatus::Paid, SaleStatus::from),
        amounts: Sale::compute(cost, list_price, received),
        date,
        platform: non_blank(&form.platform).map_or(Platform::Unspecified, Platform::from),
        contact: non_blank(&form.contact),
        notes: non_blank(&form.notes),
    })
}

/// Record a sale.
#[instrument(skip(_admin, state))]
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<SaleForm>,
) -> Result<Response, AppError> {
    let data = SalesData::load(&state).await?;

    let sale = match build_sale(&form, &data.products, data.next_code()) {
        Ok(sale) => sale,
        Err(message) => {
            let template = data.into_template(Some(form), None, Some(message));
            return Ok((StatusCode::BAD_REQUEST, template).into_response());
        }
    };

    store::add_sale(state.store(), &sale).await?;
    tracing::info!(
        order_code = %sale.order_code,
        product_id = %sale.product_id,
        received = sale.amounts.received,
        profit = sale.amounts.profit,
        "Sale recorded"
    );

    Ok(Redirect::to(&format!(
        "/sales?recorded={}",
        urlencoding::encode(&sale.order_code)
    ))
    .into_response())
}
