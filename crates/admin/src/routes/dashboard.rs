//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::instrument;

use zeidan_core::models::Sale;
use zeidan_core::report::{ProfitReport, StockLine};

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::reports::Worksheets;

/// Sales shown on the dashboard.
const RECENT_SALES: usize = 5;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: String,
    pub profit: ProfitReport,
    pub product_count: usize,
    pub units_on_hand: i64,
    pub out_of_stock: Vec<StockLine>,
    /// Newest first.
    pub recent_sales: Vec<Sale>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// Dashboard: profit summary, stock alerts and the latest sales.
#[instrument(skip(_admin, state))]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let sheets = Worksheets::load(&state).await?;
    let stock = sheets.stock();

    let template = DashboardTemplate {
        current_path: "/".to_string(),
        profit: sheets.profit(),
        product_count: sheets.products.len(),
        units_on_hand: stock.total_on_hand(),
        out_of_stock: stock.out_of_stock().cloned().collect(),
        recent_sales: sheets.sales.iter().rev().take(RECENT_SALES).cloned().collect(),
    };
    Ok(template.into_response())
}
