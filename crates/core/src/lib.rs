//! Zeidan Parfum Core - Shared types and pure business logic.
//!
//! This crate provides the types and rules used across all Zeidan Parfum components:
//! - `admin` - Password-gated back office (products, purchases, sales, reports)
//! - `storefront` - Public catalog with WhatsApp order links
//! - `cli` - Spreadsheet diagnostics and maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no spreadsheet access. Everything here is deterministic given its
//! input, which keeps it cheap to test and safe to call on every render.
//!
//! # Modules
//!
//! - [`types`] - Cell values, tables, order codes, currency handling, statuses
//! - [`schema`] - Worksheet names and their fixed column layouts
//! - [`models`] - Typed product, purchase, and sale rows
//! - [`report`] - Profit and stock aggregation
//! - [`whatsapp`] - Catalog order links

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod report;
pub mod schema;
pub mod types;
pub mod whatsapp;

pub use types::*;
