//! Domain models for admin.

pub mod session;

pub use session::AdminSession;
pub use session::keys as session_keys;
