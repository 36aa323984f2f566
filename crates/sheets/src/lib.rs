//! Spreadsheet-backed storage for Zeidan Parfum.
//!
//! Everything above this crate talks to a [`TableStore`]: a small async
//! interface over named worksheets. Implementations:
//!
//! - [`GoogleSheetsStore`](google::GoogleSheetsStore) - the production
//!   spreadsheet, over the Sheets API v4
//! - [`MemoryStore`] - in-process, for tests and local demos
//! - [`CachedStore`] - a time-to-live read-through cache around either
//!
//! [`SheetsConfig`] picks and builds the store from the environment.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod error;
pub mod google;
pub mod memory;
pub mod store;

pub use cache::CachedStore;
pub use config::{ConfigError, Credentials, SheetsConfig, StoreBackend};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{StoreInfo, TableStore};
