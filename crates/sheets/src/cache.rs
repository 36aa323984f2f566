//! Read-through cache in front of a table store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use zeidan_core::{CellValue, Table};

use crate::{StoreError, StoreInfo, TableStore};

/// Worksheets cached at once. The spreadsheet only has three.
const MAX_CACHED_TABLES: u64 = 16;

/// Caches whole-worksheet reads for a fixed time-to-live.
///
/// Appends and worksheet creation go straight to the inner store and drop the
/// worksheet's cached entry, so a handler sees its own write on the next read.
/// Errors are never cached.
pub struct CachedStore {
    inner: Arc<dyn TableStore>,
    tables: Cache<String, Table>,
}

impl CachedStore {
    /// Wrap `inner` with a cache of the given time-to-live.
    #[must_use]
    pub fn new(inner: Arc<dyn TableStore>, ttl: Duration) -> Self {
        let tables = Cache::builder()
            .max_capacity(MAX_CACHED_TABLES)
            .time_to_live(ttl)
            .build();
        Self { inner, tables }
    }
}

#[async_trait]
impl TableStore for CachedStore {
    async fn read_table(
        &self,
        name: &str,
        expected_columns: &[&str],
    ) -> Result<Table, StoreError> {
        if let Some(table) = self.tables.get(name).await {
            debug!(table = name, "Table cache hit");
            return Ok(table);
        }

        let table = self.inner.read_table(name, expected_columns).await?;
        self.tables.insert(name.to_string(), table.clone()).await;
        Ok(table)
    }

    async fn append_row(&self, name: &str, row: Vec<CellValue>) -> Result<(), StoreError> {
        let result = self.inner.append_row(name, row).await;
        self.tables.invalidate(name).await;
        result
    }

    async fn ensure_table(&self, name: &str, columns: &[&str]) -> Result<bool, StoreError> {
        let created = self.inner.ensure_table(name, columns).await?;
        if created {
            self.tables.invalidate(name).await;
        }
        Ok(created)
    }

    async fn describe(&self) -> Result<StoreInfo, StoreError> {
        self.inner.describe().await
    }
}
