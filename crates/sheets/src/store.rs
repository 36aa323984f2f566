//! The table store interface and typed accessors built on it.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument};

use zeidan_core::models::{Product, Purchase, Sale};
use zeidan_core::schema::{
    PRODUCT_COLUMNS, PRODUCTS, PURCHASE_COLUMNS, PURCHASES, SALE_COLUMNS, SALES,
};
use zeidan_core::{CellValue, Table};

use crate::StoreError;

/// What a store reports about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreInfo {
    /// Spreadsheet title.
    pub title: String,
    /// Worksheet titles in sheet order.
    pub tables: Vec<String>,
    /// Spreadsheet ID, when the store has one.
    pub spreadsheet_id: Option<String>,
    /// Account the store authenticates as. The spreadsheet must be shared
    /// with it.
    pub account: Option<String>,
}

impl StoreInfo {
    /// Expected worksheets the store does not have yet.
    #[must_use]
    pub fn missing_tables<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .copied()
            .filter(|name| !self.tables.iter().any(|t| t == name))
            .collect()
    }
}

/// Row-oriented access to named worksheets.
///
/// Implementations are shared across request handlers behind an `Arc`, so
/// they must be `Send + Sync` and use interior mutability for any state.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Read a whole worksheet. Columns in `expected_columns` that the sheet
    /// lacks are added with empty values.
    async fn read_table(&self, name: &str, expected_columns: &[&str])
    -> Result<Table, StoreError>;

    /// Append one row at the end of a worksheet.
    async fn append_row(&self, name: &str, row: Vec<CellValue>) -> Result<(), StoreError>;

    /// Create a worksheet with the given header row if it does not exist.
    /// Returns whether it was created.
    async fn ensure_table(&self, name: &str, columns: &[&str]) -> Result<bool, StoreError>;

    /// Spreadsheet title and worksheet names.
    async fn describe(&self) -> Result<StoreInfo, StoreError>;
}

// =============================================================================
// Typed accessors
// =============================================================================

/// Read a worksheet, creating it with its header row when it does not exist.
///
/// A freshly created worksheet reads as an empty table.
///
/// # Errors
///
/// Propagates any store error other than a missing worksheet, and errors
/// from creating it.
#[instrument(skip(store, columns))]
pub async fn read_or_create(
    store: &dyn TableStore,
    name: &str,
    columns: &[&str],
) -> Result<Table, StoreError> {
    match store.read_table(name, columns).await {
        Err(e) if e.is_not_found() => {
            if store.ensure_table(name, columns).await? {
                info!(table = name, "Created missing worksheet");
            }
            Ok(Table::empty(name, columns))
        }
        result => result,
    }
}

/// All catalog products, in sheet order.
///
/// # Errors
///
/// Propagates the store's error. A missing worksheet is created.
#[instrument(skip(store))]
pub async fn products(store: &dyn TableStore) -> Result<Vec<Product>, StoreError> {
    let table = read_or_create(store, PRODUCTS, PRODUCT_COLUMNS).await?;
    Ok(table.records.iter().map(Product::from_record).collect())
}

/// All purchases, in sheet order, along with the raw table.
///
/// # Errors
///
/// Propagates the store's error.
#[instrument(skip(store))]
pub async fn purchases(store: &dyn TableStore) -> Result<(Table, Vec<Purchase>), StoreError> {
    let table = read_or_create(store, PURCHASES, PURCHASE_COLUMNS).await?;
    let purchases = table.records.iter().map(Purchase::from_record).collect();
    Ok((table, purchases))
}

/// All sales, in sheet order, along with the raw table.
///
/// # Errors
///
/// Propagates the store's error.
#[instrument(skip(store))]
pub async fn sales(store: &dyn TableStore) -> Result<(Table, Vec<Sale>), StoreError> {
    let table = read_or_create(store, SALES, SALE_COLUMNS).await?;
    let sales = table.records.iter().map(Sale::from_record).collect();
    Ok((table, sales))
}

/// Append a product row.
///
/// # Errors
///
/// Propagates the store's error.
#[instrument(skip(store, product), fields(product_id = %product.id))]
pub async fn add_product(store: &dyn TableStore, product: &Product) -> Result<(), StoreError> {
    store.append_row(PRODUCTS, product.to_row()).await
}

/// Append a purchase row.
///
/// # Errors
///
/// Propagates the store's error.
#[instrument(skip(store, purchase), fields(order_code = %purchase.order_code))]
pub async fn add_purchase(store: &dyn TableStore, purchase: &Purchase) -> Result<(), StoreError> {
    store.append_row(PURCHASES, purchase.to_row()).await
}

/// Append a sale row.
///
/// # Errors
///
/// Propagates the store's error.
#[instrument(skip(store, sale), fields(order_code = %sale.order_code))]
pub async fn add_sale(store: &dyn TableStore, sale: &Sale) -> Result<(), StoreError> {
    store.append_row(SALES, sale.to_row()).await
}
