//! Typed worksheet rows.
//!
//! Each model reads leniently from a [`Record`] (monetary columns go through
//! [`normalize_currency`], unknown labels are preserved) and writes back as a
//! row of cells in its worksheet's column order.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::columns::{
    ARRIVAL_DATE, CONTACT, COST, DATE, IMAGE, LIST_PRICE, MARGIN, NOTES, ORDER_CODE, PLATFORM,
    PRODUCT_ID, PRODUCT_NAME, PROFIT, QUANTITY, RECEIVED, SALE_PRICE, STANDARD_COST, STATUS,
    SUPPLIER, UNIT_COST,
};
use crate::types::currency::round_cents;
use crate::types::{CellValue, Platform, PurchaseStatus, Record, SaleStatus, normalize_currency};

/// Date format used in the sheet.
pub const SHEET_DATE_FORMAT: &str = "%d/%m/%Y";

/// Brasília time. Brazil has had no daylight saving time since 2019.
const BRAZIL_UTC_OFFSET_SECS: i32 = -3 * 60 * 60;

/// Current time in Brasília.
#[must_use]
pub fn brazil_now() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(BRAZIL_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&offset)
}

/// Today's date in Brasília, formatted for the sheet.
#[must_use]
pub fn brazil_today() -> String {
    brazil_now().format(SHEET_DATE_FORMAT).to_string()
}

/// Parse a sheet date (`dd/mm/YYYY`, optionally followed by a time, or ISO).
#[must_use]
pub fn parse_sheet_date(text: &str) -> Option<NaiveDate> {
    let day = text.split_whitespace().next()?;
    NaiveDate::parse_from_str(day, SHEET_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(day, "%Y-%m-%d"))
        .ok()
}

fn optional_text(record: &Record, column: &str) -> Option<String> {
    let value = record.text(column);
    (!value.is_empty()).then_some(value)
}

fn amount(record: &Record, column: &str) -> f64 {
    record.get(column).map_or(0.0, normalize_currency)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to u32 range first
fn quantity(record: &Record, column: &str) -> u32 {
    let value = amount(record, column).round();
    if value.is_finite() && value > 0.0 {
        value.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

fn optional_cell(value: Option<&String>) -> CellValue {
    value.map_or(CellValue::Empty, |v| CellValue::text(v.clone()))
}

/// A catalog product (`Produtos`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub standard_cost: f64,
    pub sale_price: f64,
    /// Only set when the sheet's `Imagem` column holds an http(s) URL.
    pub image_url: Option<String>,
}

impl Product {
    /// Read a product row.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.text(PRODUCT_ID),
            name: record.text(PRODUCT_NAME),
            standard_cost: amount(record, STANDARD_COST),
            sale_price: amount(record, SALE_PRICE),
            image_url: optional_text(record, IMAGE).filter(|url| url.starts_with("http")),
        }
    }

    /// Row cells in `Produtos` column order.
    #[must_use]
    pub fn to_row(&self) -> Vec<CellValue> {
        vec![
            CellValue::text(self.id.clone()),
            CellValue::text(self.name.clone()),
            CellValue::Number(round_cents(self.standard_cost)),
            CellValue::Number(round_cents(self.sale_price)),
        ]
    }

    /// Expected margin at list price, in percent.
    #[must_use]
    pub fn list_margin_percent(&self) -> f64 {
        margin_percent(self.sale_price - self.standard_cost, self.sale_price)
    }
}

/// A purchase from a supplier (`Compras`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub order_code: String,
    pub date: String,
    pub arrival_date: Option<String>,
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_cost: f64,
    pub supplier: Option<String>,
    pub status: PurchaseStatus,
    pub notes: Option<String>,
}

impl Purchase {
    /// Read a purchase row.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self {
            order_code: record.text(ORDER_CODE),
            date: record.text(DATE),
            arrival_date: optional_text(record, ARRIVAL_DATE),
            product_id: record.text(PRODUCT_ID),
            product_name: record.text(PRODUCT_NAME),
            quantity: quantity(record, QUANTITY),
            unit_cost: amount(record, UNIT_COST),
            supplier: optional_text(record, SUPPLIER),
            status: record.text(STATUS).into(),
            notes: optional_text(record, NOTES),
        }
    }

    /// Row cells in `Compras` column order.
    #[must_use]
    pub fn to_row(&self) -> Vec<CellValue> {
        vec![
            CellValue::text(self.order_code.clone()),
            CellValue::text(self.date.clone()),
            optional_cell(self.arrival_date.as_ref()),
            CellValue::text(self.product_id.clone()),
            CellValue::text(self.product_name.clone()),
            CellValue::from(self.quantity),
            CellValue::Number(round_cents(self.unit_cost)),
            optional_cell(self.supplier.as_ref()),
            CellValue::text(self.status.label()),
            optional_cell(self.notes.as_ref()),
        ]
    }

    /// Quantity times unit cost.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        f64::from(self.quantity) * self.unit_cost
    }
}

/// Profit figures derived for a sale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaleAmounts {
    pub cost: f64,
    pub list_price: f64,
    pub received: f64,
    /// `received - cost`.
    pub profit: f64,
    /// `profit / received * 100`, or 0 when nothing was received.
    pub margin_percent: f64,
}

impl SaleAmounts {
    /// Derive profit and margin, rounded to cents.
    #[must_use]
    pub fn compute(cost: f64, list_price: f64, received: f64) -> Self {
        let profit = received - cost;
        Self {
            cost: round_cents(cost),
            list_price: round_cents(list_price),
            received: round_cents(received),
            profit: round_cents(profit),
            margin_percent: round_cents(margin_percent(profit, received)),
        }
    }
}

/// Profit as a percentage of revenue; 0 when there is no revenue.
#[must_use]
pub fn margin_percent(profit: f64, revenue: f64) -> f64 {
    if revenue == 0.0 {
        0.0
    } else {
        profit / revenue * 100.0
    }
}

/// A sale to a customer (`Vendas`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub order_code: String,
    pub product_id: String,
    pub product_name: String,
    pub status: SaleStatus,
    pub amounts: SaleAmounts,
    pub date: String,
    pub platform: Platform,
    pub contact: Option<String>,
    pub notes: Option<String>,
}

impl Sale {
    /// Derive profit and margin for a new sale. See [`SaleAmounts::compute`].
    #[must_use]
    pub fn compute(cost: f64, list_price: f64, received: f64) -> SaleAmounts {
        SaleAmounts::compute(cost, list_price, received)
    }

    /// Read a sale row.
    ///
    /// Profit and margin are taken as stored; reports recompute them from
    /// cost and received value.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self {
            order_code: record.text(ORDER_CODE),
            product_id: record.text(PRODUCT_ID),
            product_name: record.text(PRODUCT_NAME),
            status: record.text(STATUS).into(),
            amounts: SaleAmounts {
                cost: amount(record, COST),
                list_price: amount(record, LIST_PRICE),
                received: amount(record, RECEIVED),
                profit: amount(record, PROFIT),
                margin_percent: amount(record, MARGIN),
            },
            date: record.text(DATE),
            platform: record.text(PLATFORM).into(),
            contact: optional_text(record, CONTACT),
            notes: optional_text(record, NOTES),
        }
    }

    /// Row cells in `Vendas` column order.
    #[must_use]
    pub fn to_row(&self) -> Vec<CellValue> {
        vec![
            CellValue::text(self.order_code.clone()),
            CellValue::text(self.product_id.clone()),
            CellValue::text(self.product_name.clone()),
            CellValue::text(self.status.label()),
            CellValue::Number(self.amounts.cost),
            CellValue::Number(self.amounts.list_price),
            CellValue::Number(self.amounts.profit),
            CellValue::Number(self.amounts.received),
            CellValue::Number(self.amounts.margin_percent),
            CellValue::text(self.date.clone()),
            CellValue::text(self.platform.label()),
            optional_cell(self.contact.as_ref()),
            optional_cell(self.notes.as_ref()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PURCHASE_COLUMNS, SALE_COLUMNS};

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_product_from_record_normalizes_prices() {
        let record = Record::from_pairs([
            ("ID", CellValue::Number(3.0)),
            ("Produto", CellValue::text("Club de Nuit")),
            ("Custo_Padrao", CellValue::text("R$ 180,00")),
            ("Preco_Venda", CellValue::text("1.250,90")),
            ("Imagem", CellValue::text("sem foto")),
        ]);
        let product = Product::from_record(&record);
        assert_eq!(product.id, "3");
        assert_close(product.standard_cost, 180.0);
        assert_close(product.sale_price, 1250.9);
        assert_eq!(product.image_url, None);
    }

    #[test]
    fn test_product_keeps_http_image() {
        let record = Record::from_pairs([("Imagem", "https://cdn.example.com/a.png")]);
        let product = Product::from_record(&record);
        assert_eq!(
            product.image_url.as_deref(),
            Some("https://cdn.example.com/a.png")
        );
    }

    #[test]
    fn test_sale_amounts_compute() {
        let amounts = SaleAmounts::compute(200.0, 350.0, 320.0);
        assert_close(amounts.profit, 120.0);
        assert_close(amounts.margin_percent, 37.5);
    }

    #[test]
    fn test_sale_amounts_without_revenue() {
        let amounts = SaleAmounts::compute(90.0, 150.0, 0.0);
        assert_close(amounts.profit, -90.0);
        assert_close(amounts.margin_percent, 0.0);
    }

    #[test]
    fn test_purchase_row_matches_schema() {
        let purchase = Purchase {
            order_code: "CP03".to_string(),
            date: "01/02/2026".to_string(),
            arrival_date: None,
            product_id: "7".to_string(),
            product_name: "Khamrah".to_string(),
            quantity: 4,
            unit_cost: 99.9,
            supplier: Some("Lattafa BR".to_string()),
            status: PurchaseStatus::Ordered,
            notes: None,
        };
        let row = purchase.to_row();
        assert_eq!(row.len(), PURCHASE_COLUMNS.len());
        assert_eq!(row[0], CellValue::text("CP03"));
        assert_eq!(row[2], CellValue::Empty);
        assert_eq!(row[5], CellValue::Number(4.0));
        assert_eq!(row[8], CellValue::text("Pedido Feito"));
        assert_close(purchase.total_cost(), 399.6);
    }

    #[test]
    fn test_purchase_quantity_is_lenient() {
        let record = Record::from_pairs([("Qtd", "abc")]);
        assert_eq!(Purchase::from_record(&record).quantity, 0);
        let record = Record::from_pairs([("Qtd", CellValue::Number(2.0))]);
        assert_eq!(Purchase::from_record(&record).quantity, 2);
    }

    #[test]
    fn test_sale_round_trips_through_record() {
        let sale = Sale {
            order_code: "ZP10".to_string(),
            product_id: "1".to_string(),
            product_name: "Sauvage".to_string(),
            status: SaleStatus::Paid,
            amounts: SaleAmounts::compute(400.0, 650.0, 600.0),
            date: "18/10/2026".to_string(),
            platform: Platform::Instagram,
            contact: Some("@cliente".to_string()),
            notes: None,
        };
        let row = sale.to_row();
        assert_eq!(row.len(), SALE_COLUMNS.len());

        let record = Record::from_pairs(SALE_COLUMNS.iter().copied().zip(row));
        assert_eq!(Sale::from_record(&record), sale);
    }

    #[test]
    fn test_parse_sheet_date() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 18);
        assert_eq!(parse_sheet_date("18/10/2026"), expected);
        assert_eq!(parse_sheet_date("18/10/2026 14:30"), expected);
        assert_eq!(parse_sheet_date("2026-10-18"), expected);
        assert_eq!(parse_sheet_date("ontem"), None);
        assert_eq!(parse_sheet_date(""), None);
    }

    #[test]
    fn test_brazil_today_format() {
        let today = brazil_today();
        assert!(parse_sheet_date(&today).is_some());
    }
}
