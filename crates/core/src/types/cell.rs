//! Spreadsheet cell values.

use core::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// A single spreadsheet cell.
///
/// The Sheets API returns unformatted cell values as JSON scalars, so a cell is
/// either empty, text, a number, or a boolean. Anything else (arrays, objects)
/// is kept as its JSON text.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Create a text cell.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whether the cell counts as "no value".
    ///
    /// Empty cells, empty text, numeric zero and `false` are all falsy.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(n) => *n == 0.0,
            Self::Bool(b) => !b,
        }
    }

    /// Render the cell as text.
    ///
    /// Integral numbers render without a fractional part (`7`, not `7.0`),
    /// which is how order codes and product IDs typed as numbers must read.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
        }
    }
}

/// Largest magnitude that still prints as an exact integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

#[allow(clippy::cast_possible_truncation)] // guarded by the fract/magnitude check
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Empty,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Empty, Self::Number),
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_str(""),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sheet_values() {
        let cells: Vec<CellValue> =
            serde_json::from_str(r#"["ZP01", 12.5, true, null, ""]"#).unwrap();
        assert_eq!(
            cells,
            vec![
                CellValue::text("ZP01"),
                CellValue::Number(12.5),
                CellValue::Bool(true),
                CellValue::Empty,
                CellValue::text(""),
            ]
        );
    }

    #[test]
    fn test_as_text_integral_number() {
        assert_eq!(CellValue::Number(7.0).as_text(), "7");
        assert_eq!(CellValue::Number(1234.5).as_text(), "1234.5");
        assert_eq!(CellValue::Empty.as_text(), "");
    }

    #[test]
    fn test_is_falsy() {
        assert!(CellValue::Empty.is_falsy());
        assert!(CellValue::text("").is_falsy());
        assert!(CellValue::Number(0.0).is_falsy());
        assert!(CellValue::Bool(false).is_falsy());
        assert!(!CellValue::text("0").is_falsy());
        assert!(!CellValue::Number(-1.0).is_falsy());
    }

    #[test]
    fn test_serialize_for_append() {
        let row = vec![
            CellValue::text("CP03"),
            CellValue::Number(2.0),
            CellValue::Empty,
        ];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"["CP03",2.0,""]"#);
    }
}
