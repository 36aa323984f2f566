//! Profit and stock reports.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::instrument;

use zeidan_core::models::{Product, Purchase, Sale};
use zeidan_core::report::{ProfitReport, StockReport};
use zeidan_sheets::store;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;


/// Reports page template.
#[derive(Template, WebTemplate)]
#[template(path = "reports/index.html")]
pub struct ReportsTemplate {
    pub current_path: String,
    pub profit: ProfitReport,
    pub stock: StockReport,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/reports", get(index))
}

/// All three worksheets, read concurrently.
pub(crate) struct Worksheets {
    pub products: Vec<Product>,
    pub purchases: Vec<Purchase>,
    pub sales: Vec<Sale>,
}

impl Worksheets {
    pub(crate) async fn load(state: &AppState) -> Result<Self, AppError> {
        let (products, purchases, sales) = tokio::join!(
            store::products(state.store()),
            store::purchases(state.store()),
            store::sales(state.store()),
        );
        Ok(Self {
            products: products?,
            purchases: purchases?.1,
            sales: sales?.1,
        })
    }

    pub(crate) fn profit(&self) -> ProfitReport {
        ProfitReport::build(&self.sales, &self.purchases)
    }

    pub(crate) fn stock(&self) -> StockReport {
        StockReport::build(&self.products, &self.purchases, &self.sales)
    }
}

/// Full profit report with platform and month breakdowns, plus stock.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let sheets = Worksheets::load(&state).await?;
    let template = ReportsTemplate {
        current_path: "/reports".to_string(),
        profit: sheets.profit(),
        stock: sheets.stock(),
    };
    Ok(template.into_response())
}
