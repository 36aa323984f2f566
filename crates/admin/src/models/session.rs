//! Session-stored admin identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated back office session.
///
/// There is a single shared password, so the session carries no user
/// identity beyond when it was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    /// When the password was accepted.
    pub logged_in_at: DateTime<Utc>,
}

impl AdminSession {
    #[must_use]
    pub fn start() -> Self {
        Self {
            logged_in_at: Utc::now(),
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current admin session.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
