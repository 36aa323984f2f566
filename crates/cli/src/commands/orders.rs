//! Order code lookup.

use zeidan_core::schema::{PURCHASE_COLUMNS, PURCHASES, SALE_COLUMNS, SALES};
use zeidan_core::{NextOrderCode, OrderPrefix, next_order_code};
use zeidan_sheets::{StoreError, TableStore};

/// The code the next sale or purchase would get.
///
/// # Errors
///
/// Returns the store error if the worksheet cannot be read.
pub async fn next_code(
    store: &dyn TableStore,
    prefix: OrderPrefix,
) -> Result<NextOrderCode, StoreError> {
    let (name, columns) = match prefix {
        OrderPrefix::Sale => (SALES, SALE_COLUMNS),
        OrderPrefix::Purchase => (PURCHASES, PURCHASE_COLUMNS),
    };
    let table = store.read_table(name, columns).await?;
    Ok(next_order_code(prefix, &table.records))
}
