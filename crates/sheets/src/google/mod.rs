//! Google Sheets backend.
//!
//! # Architecture
//!
//! - Service-account key → RS256 JWT assertion → OAuth access token
//! - Access token cached in memory and refreshed a minute before expiry
//! - Plain REST calls against the Sheets API v4 `values` and `batchUpdate`
//!   endpoints; no client library

pub mod auth;
pub mod client;

pub use auth::{AccessToken, ServiceAccountKey, TokenProvider};
pub use client::{GoogleSheetsStore, classify_error, spreadsheet_id_from_link};
