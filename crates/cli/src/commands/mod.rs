//! Command implementations.
//!
//! Commands take any [`TableStore`](zeidan_sheets::TableStore) and return
//! values; printing happens in `main`.

pub mod orders;
pub mod sheets;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] zeidan_sheets::ConfigError),

    #[error(transparent)]
    Store(#[from] zeidan_sheets::StoreError),

    #[error("missing worksheets: {0} (run `zp-cli init`)")]
    MissingWorksheets(String),

    #[error("failed to install rustls crypto provider")]
    Tls,
}
