//! In-process table store.
//!
//! Holds raw rows per worksheet exactly as a spreadsheet would (header row
//! first), so reads go through the same [`Table::from_rows`] path as the
//! Google client. A failure switch makes every call return a chosen error.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use zeidan_core::{CellValue, Table};

use crate::{StoreError, StoreInfo, TableStore};

/// A [`TableStore`] kept in memory.
#[derive(Debug)]
pub struct MemoryStore {
    title: String,
    sheets: RwLock<Vec<(String, Vec<Vec<CellValue>>)>>,
    failure: RwLock<Option<StoreError>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("Zeidan Parfum")
    }
}

impl MemoryStore {
    /// Create an empty store with the given spreadsheet title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sheets: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
        }
    }

    /// Create a store with every worksheet present and only a header row.
    #[must_use]
    pub fn with_schema(tables: &[(&str, &[&str])]) -> Self {
        let sheets = tables
            .iter()
            .map(|(name, columns)| ((*name).to_string(), vec![header_row(columns)]))
            .collect();
        Self {
            sheets: RwLock::new(sheets),
            ..Self::default()
        }
    }

    /// Replace a worksheet's raw rows (header row included).
    pub async fn put_rows(&self, name: &str, rows: Vec<Vec<CellValue>>) {
        let mut sheets = self.sheets.write().await;
        match sheets.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = rows,
            None => sheets.push((name.to_string(), rows)),
        }
    }

    /// Raw rows of a worksheet (header row included).
    pub async fn rows(&self, name: &str) -> Option<Vec<Vec<CellValue>>> {
        self.sheets
            .read()
            .await
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rows)| rows.clone())
    }

    /// Make every subsequent call fail with `error`, or clear with `None`.
    pub async fn set_failure(&self, error: Option<StoreError>) {
        *self.failure.write().await = error;
    }

    async fn check_failure(&self) -> Result<(), StoreError> {
        self.failure.read().await.clone().map_or(Ok(()), Err)
    }
}

fn header_row(columns: &[&str]) -> Vec<CellValue> {
    columns.iter().map(|c| CellValue::text(*c)).collect()
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn read_table(
        &self,
        name: &str,
        expected_columns: &[&str],
    ) -> Result<Table, StoreError> {
        self.check_failure().await?;
        let rows = self
            .rows(name)
            .await
            .ok_or_else(|| StoreError::NotFound(format!("worksheet {name}")))?;
        Ok(Table::from_rows(name, rows, expected_columns))
    }

    async fn append_row(&self, name: &str, row: Vec<CellValue>) -> Result<(), StoreError> {
        self.check_failure().await?;
        let mut sheets = self.sheets.write().await;
        let (_, rows) = sheets
            .iter_mut()
            .find(|(n, _)| n == name)
            .ok_or_else(|| StoreError::NotFound(format!("worksheet {name}")))?;
        rows.push(row);
        Ok(())
    }

    async fn ensure_table(&self, name: &str, columns: &[&str]) -> Result<bool, StoreError> {
        self.check_failure().await?;
        let mut sheets = self.sheets.write().await;
        if sheets.iter().any(|(n, _)| n == name) {
            return Ok(false);
        }
        sheets.push((name.to_string(), vec![header_row(columns)]));
        Ok(true)
    }

    async fn describe(&self) -> Result<StoreInfo, StoreError> {
        self.check_failure().await?;
        Ok(StoreInfo {
            title: self.title.clone(),
            tables: self
                .sheets
                .read()
                .await
                .iter()
                .map(|(n, _)| n.clone())
                .collect(),
            ..StoreInfo::default()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zeidan_core::schema::{ALL_TABLES, SALE_COLUMNS, SALES};

    use super::*;

    #[tokio::test]
    async fn test_append_then_read() {
        let store = MemoryStore::with_schema(ALL_TABLES);
        let mut row = vec![CellValue::text("ZP01")];
        row.resize(SALE_COLUMNS.len(), CellValue::Empty);
        store.append_row(SALES, row).await.unwrap();

        let table = store.read_table(SALES, SALE_COLUMNS).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].text("Pedido"), "ZP01");
    }

    #[tokio::test]
    async fn test_missing_worksheet_is_not_found() {
        let store = MemoryStore::default();
        let err = store.read_table("Vendas", &[]).await.unwrap_err();
        assert!(err.is_not_found());
        let err = store.append_row("Vendas", Vec::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_ensure_table_creates_once() {
        let store = MemoryStore::default();
        assert!(store.ensure_table("Compras", &["Pedido"]).await.unwrap());
        assert!(!store.ensure_table("Compras", &["Pedido"]).await.unwrap());
        let info = store.describe().await.unwrap();
        assert_eq!(info.tables, vec!["Compras"]);
        assert_eq!(
            store.rows("Compras").await.unwrap(),
            vec![vec![CellValue::text("Pedido")]]
        );
    }

    #[tokio::test]
    async fn test_failure_switch() {
        let store = MemoryStore::with_schema(ALL_TABLES);
        store
            .set_failure(Some(StoreError::Unreachable("offline".to_string())))
            .await;
        assert!(matches!(
            store.describe().await,
            Err(StoreError::Unreachable(_))
        ));
        store.set_failure(None).await;
        assert!(store.describe().await.is_ok());
    }
}
