//! Spreadsheet diagnostics and worksheet bootstrap.

use std::fmt;

use tracing::info;

use zeidan_core::schema::ALL_TABLES;
use zeidan_sheets::{StoreError, TableStore};

/// What `check` found.
#[derive(Debug)]
pub struct CheckReport {
    pub title: String,
    pub spreadsheet_id: Option<String>,
    pub account: Option<String>,
    pub worksheets: Vec<String>,
    pub missing: Vec<&'static str>,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Spreadsheet: {}", self.title)?;
        if let Some(id) = &self.spreadsheet_id {
            writeln!(f, "ID:          {id}")?;
        }
        if let Some(account) = &self.account {
            writeln!(f, "Account:     {account}")?;
        }
        writeln!(f, "Worksheets:  {}", self.worksheets.join(", "))?;
        if self.missing.is_empty() {
            write!(f, "All expected worksheets are present.")
        } else {
            write!(f, "Missing:     {}", self.missing.join(", "))
        }
    }
}

/// Describe the spreadsheet and list expected worksheets it lacks.
///
/// # Errors
///
/// Returns the store error if the spreadsheet cannot be described.
pub async fn check(store: &dyn TableStore) -> Result<CheckReport, StoreError> {
    let info = store.describe().await?;
    let expected: Vec<&'static str> = ALL_TABLES.iter().map(|(name, _)| *name).collect();
    let missing = info.missing_tables(&expected);
    Ok(CheckReport {
        title: info.title,
        spreadsheet_id: info.spreadsheet_id,
        account: info.account,
        worksheets: info.tables,
        missing,
    })
}

/// Create every missing worksheet with its header row.
///
/// Returns the names of the worksheets that were created.
///
/// # Errors
///
/// Stops at the first store error; worksheets created before it remain.
pub async fn init(store: &dyn TableStore) -> Result<Vec<&'static str>, StoreError> {
    let mut created = Vec::new();
    for (name, columns) in ALL_TABLES {
        if store.ensure_table(name, columns).await? {
            info!(worksheet = name, "Created worksheet");
            created.push(*name);
        }
    }
    Ok(created)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zeidan_core::schema::{PRODUCT_COLUMNS, PRODUCTS, SALES};
    use zeidan_sheets::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_check_reports_missing() {
        let store = MemoryStore::with_schema(&[(PRODUCTS, PRODUCT_COLUMNS)]);
        let report = check(&store).await.unwrap();
        assert_eq!(report.worksheets, vec!["Produtos"]);
        assert_eq!(report.missing, vec!["Compras", "Vendas"]);
        assert!(report.to_string().contains("Missing:     Compras, Vendas"));
        assert!(!report.to_string().contains("Account:"));
    }

    #[test]
    fn test_report_names_spreadsheet_and_account() {
        let report = CheckReport {
            title: "Zeidan Parfum".to_string(),
            spreadsheet_id: Some("1AbC".to_string()),
            account: Some("bot@zeidan.iam.gserviceaccount.com".to_string()),
            worksheets: vec!["Produtos".to_string()],
            missing: vec!["Compras"],
        };
        let text = report.to_string();
        assert!(text.contains("ID:          1AbC"));
        assert!(text.contains("Account:     bot@zeidan.iam.gserviceaccount.com"));
    }

    #[tokio::test]
    async fn test_init_creates_only_missing() {
        let store = MemoryStore::with_schema(&[(PRODUCTS, PRODUCT_COLUMNS)]);
        let created = init(&store).await.unwrap();
        assert_eq!(created, vec!["Compras", "Vendas"]);

        let header = store.rows(SALES).await.unwrap();
        assert_eq!(header.len(), 1);

        assert!(init(&store).await.unwrap().is_empty());
        assert!(check(&store).await.unwrap().missing.is_empty());
    }

    #[tokio::test]
    async fn test_check_propagates_store_error() {
        let store = MemoryStore::with_schema(ALL_TABLES);
        store
            .set_failure(Some(StoreError::Unauthenticated("no access".to_string())))
            .await;
        assert!(matches!(
            check(&store).await,
            Err(StoreError::Unauthenticated(_))
        ));
    }
}
