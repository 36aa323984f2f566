//! Core types for Zeidan Parfum.
//!
//! This module provides the spreadsheet-facing value types and the two rules
//! every screen depends on: order code sequencing and currency normalization.

pub mod cell;
pub mod currency;
pub mod order_code;
pub mod status;
pub mod table;

pub use cell::CellValue;
pub use currency::{format_brl, normalize_currency, normalize_currency_str, sum_currency};
pub use order_code::{NextOrderCode, OrderPrefix, next_order_code, next_order_code_from};
pub use status::*;
pub use table::{Record, Table};
