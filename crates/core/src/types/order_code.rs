//! Sequential order codes (`ZP07`, `CP12`).
//!
//! Order codes have no stored counter. The next code is rebuilt on every call
//! from the existing rows: keep the rows whose `Pedido` starts with the prefix,
//! take the **last** one in row order, and increment its numeric suffix.
//!
//! The last positional match wins, not the numerically largest one. A sheet
//! whose rows were reordered by hand will therefore yield a code that may
//! collide with an existing one; that is the documented behavior.
//!
//! When the suffix cannot be parsed the result is the visible placeholder
//! `<prefix>??` so the operator notices and fills the code in manually.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::cell::CellValue;
use super::table::Record;
use crate::schema::columns::ORDER_CODE;

/// Two-letter prefix distinguishing sale codes from purchase codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderPrefix {
    /// Sales (`ZP`).
    Sale,
    /// Purchases (`CP`).
    Purchase,
}

impl OrderPrefix {
    /// The literal prefix text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "ZP",
            Self::Purchase => "CP",
        }
    }
}

impl fmt::Display for OrderPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for OrderPrefix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zp" | "sale" | "venda" => Ok(Self::Sale),
            "cp" | "purchase" | "compra" => Ok(Self::Purchase),
            _ => Err(format!("invalid order prefix: {s}")),
        }
    }
}

/// The outcome of computing the next order code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextOrderCode {
    /// A usable code: prefix followed by the counter, zero-padded to two digits.
    Assigned { prefix: OrderPrefix, counter: i64 },
    /// The last matching code had an unparseable suffix; renders as `<prefix>??`.
    Unresolved { prefix: OrderPrefix },
}

impl NextOrderCode {
    /// Whether the code needs manual attention.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved { .. })
    }
}

impl fmt::Display for NextOrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assigned { prefix, counter } => write!(f, "{prefix}{counter:02}"),
            Self::Unresolved { prefix } => write!(f, "{prefix}??"),
        }
    }
}

/// Compute the next order code from records, reading their `Pedido` column.
///
/// Records without the column are ignored.
///
/// # Example
///
/// ```
/// use zeidan_core::{OrderPrefix, Record, next_order_code};
///
/// let records = vec![
///     Record::from_pairs([("Pedido", "CP01")]),
///     Record::from_pairs([("Pedido", "ZP05")]),
///     Record::from_pairs([("Pedido", "CP03")]),
/// ];
/// assert_eq!(next_order_code(OrderPrefix::Purchase, &records).to_string(), "CP04");
/// ```
#[must_use]
pub fn next_order_code(prefix: OrderPrefix, records: &[Record]) -> NextOrderCode {
    next_order_code_from(prefix, records.iter().filter_map(|r| r.get(ORDER_CODE)))
}

/// Compute the next order code from a sequence of order-code cells.
#[must_use]
pub fn next_order_code_from<'a, I>(prefix: OrderPrefix, cells: I) -> NextOrderCode
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let tag = prefix.as_str();

    let Some(last) = cells
        .into_iter()
        .map(CellValue::as_text)
        .filter(|code| code.starts_with(tag))
        .last()
    else {
        return NextOrderCode::Assigned { prefix, counter: 1 };
    };

    last.get(tag.len()..)
        .and_then(|suffix| suffix.trim().parse::<i64>().ok())
        .and_then(|n| n.checked_add(1))
        .map_or(NextOrderCode::Unresolved { prefix }, |counter| {
            NextOrderCode::Assigned { prefix, counter }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::text(*v)).collect()
    }

    fn next(prefix: OrderPrefix, values: &[&str]) -> String {
        next_order_code_from(prefix, &codes(values)).to_string()
    }

    #[test]
    fn test_empty_input_starts_at_01() {
        assert_eq!(next(OrderPrefix::Sale, &[]), "ZP01");
        assert_eq!(next(OrderPrefix::Purchase, &[]), "CP01");
    }

    #[test]
    fn test_increments_last_match() {
        assert_eq!(next(OrderPrefix::Sale, &["ZP06", "ZP07"]), "ZP08");
        assert_eq!(next(OrderPrefix::Sale, &["ZP09"]), "ZP10");
    }

    #[test]
    fn test_non_numeric_suffix_is_unresolved() {
        let code = next_order_code_from(OrderPrefix::Sale, &codes(&["ZP01", "ZPAB"]));
        assert!(code.is_unresolved());
        assert_eq!(code.to_string(), "ZP??");
    }

    #[test]
    fn test_bare_prefix_is_unresolved() {
        assert_eq!(next(OrderPrefix::Purchase, &["CP"]), "CP??");
    }

    #[test]
    fn test_uses_last_positional_match_not_maximum() {
        assert_eq!(next(OrderPrefix::Purchase, &["CP01", "ZP05", "CP03"]), "CP04");
        assert_eq!(next(OrderPrefix::Purchase, &["CP09", "CP02"]), "CP03");
    }

    #[test]
    fn test_ignores_other_prefixes() {
        assert_eq!(next(OrderPrefix::Sale, &["ZP02", "CP99", "XX50"]), "ZP03");
    }

    #[test]
    fn test_no_matching_prefix_starts_at_01() {
        assert_eq!(next(OrderPrefix::Sale, &["CP01", "CP02"]), "ZP01");
    }

    #[test]
    fn test_zero_padding_is_a_minimum() {
        assert_eq!(next(OrderPrefix::Sale, &["ZP06"]), "ZP07");
        assert_eq!(next(OrderPrefix::Sale, &["ZP104"]), "ZP105");
        assert_eq!(next(OrderPrefix::Sale, &["ZP99"]), "ZP100");
    }

    #[test]
    fn test_suffix_whitespace_is_tolerated() {
        assert_eq!(next(OrderPrefix::Sale, &["ZP 04 "]), "ZP05");
    }

    #[test]
    fn test_overflow_is_unresolved() {
        let max = format!("ZP{}", i64::MAX);
        assert_eq!(next(OrderPrefix::Sale, &[max.as_str()]), "ZP??");
    }

    #[test]
    fn test_records_without_column_are_ignored() {
        let records = vec![
            Record::from_pairs([("Pedido", "ZP01")]),
            Record::from_pairs([("Produto", "Sauvage")]),
        ];
        assert_eq!(next_order_code(OrderPrefix::Sale, &records).to_string(), "ZP02");
        assert_eq!(next_order_code(OrderPrefix::Sale, &[]).to_string(), "ZP01");
    }

    #[test]
    fn test_interleaved_purchase_rows() {
        let records = vec![
            Record::from_pairs([("Pedido", CellValue::text("CP01"))]),
            Record::from_pairs([("Pedido", CellValue::Empty)]),
            Record::from_pairs([("Pedido", CellValue::Number(17.0))]),
            Record::from_pairs([("Pedido", CellValue::text("CP02"))]),
            Record::from_pairs([("Pedido", CellValue::text("ajuste"))]),
        ];
        assert_eq!(next_order_code(OrderPrefix::Purchase, &records).to_string(), "CP03");
    }

    #[test]
    fn test_prefix_from_str() {
        assert_eq!("venda".parse::<OrderPrefix>(), Ok(OrderPrefix::Sale));
        assert_eq!("CP".parse::<OrderPrefix>(), Ok(OrderPrefix::Purchase));
        assert!("XX".parse::<OrderPrefix>().is_err());
    }
}
