//! Store error contract.

use thiserror::Error;

/// Errors a [`TableStore`](crate::TableStore) can report.
///
/// The three kinds are what callers branch on: the storefront falls back to an
/// empty catalog on any of them, the admin shows a generic error page, and the
/// CLI prints the message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Credentials are missing, invalid, or lack access to the spreadsheet.
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    /// The spreadsheet or worksheet does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend could not be reached or returned something unusable.
    #[error("Store unreachable: {0}")]
    Unreachable(String),
}

impl StoreError {
    /// Short machine-readable kind, used as a tracing field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "unauthenticated",
            Self::NotFound(_) => "not_found",
            Self::Unreachable(_) => "unreachable",
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unreachable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = StoreError::NotFound("Vendas".to_string());
        assert_eq!(err.to_string(), "Not found: Vendas");
        assert_eq!(err.kind(), "not_found");
        assert!(err.is_not_found());
    }
}
