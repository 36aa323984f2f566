//! Tabular worksheet data.
//!
//! A [`Table`] is what a worksheet looks like after a "get all records" read:
//! the first row names the columns and every following row becomes a
//! [`Record`] keyed by those names.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::cell::CellValue;

/// One data row keyed by column header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: HashMap<String, CellValue>,
}

impl Record {
    /// Build a record from `(column, value)` pairs.
    #[must_use]
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get a cell by column name, or `None` if the column is absent.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    /// Get a cell rendered as trimmed text (empty if absent).
    #[must_use]
    pub fn text(&self, column: &str) -> String {
        self.get(column)
            .map(|cell| cell.as_text().trim().to_string())
            .unwrap_or_default()
    }

    /// Set a cell value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.values.insert(column.into(), value.into());
    }
}

/// A worksheet read into memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Worksheet name.
    pub name: String,
    /// Column headers in sheet order, followed by any expected columns the
    /// sheet was missing.
    pub headers: Vec<String>,
    /// Data rows in sheet order.
    pub records: Vec<Record>,
}

impl Table {
    /// Create an empty table with the given columns.
    #[must_use]
    pub fn empty(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            headers: columns.iter().map(|c| (*c).to_string()).collect(),
            records: Vec::new(),
        }
    }

    /// Build a table from raw worksheet rows.
    ///
    /// The first row is the header row. Short data rows are padded with empty
    /// cells, fully blank rows are skipped, and every column in
    /// `expected_columns` that the sheet lacks is added with empty values so
    /// callers can rely on a fixed schema.
    #[must_use]
    pub fn from_rows(
        name: impl Into<String>,
        rows: Vec<Vec<CellValue>>,
        expected_columns: &[&str],
    ) -> Self {
        let mut rows = rows.into_iter();
        let Some(header_row) = rows.next() else {
            return Self::empty(name, expected_columns);
        };

        let mut headers: Vec<String> = header_row.iter().map(CellValue::as_text).collect();
        while headers.last().is_some_and(String::is_empty) {
            headers.pop();
        }

        let missing: Vec<String> = expected_columns
            .iter()
            .filter(|c| !headers.iter().any(|h| h == *c))
            .map(|c| (*c).to_string())
            .collect();

        let records = rows
            .filter(|row| row.iter().any(|cell| !cell.as_text().trim().is_empty()))
            .map(|row| {
                let mut cells = row.into_iter();
                let mut record = Record::default();
                for header in &headers {
                    record.set(header.clone(), cells.next().unwrap_or_default());
                }
                for column in &missing {
                    record.set(column.clone(), CellValue::Empty);
                }
                record
            })
            .collect();

        headers.extend(missing);

        Self {
            name: name.into(),
            headers,
            records,
        }
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
