//! Shared-password authentication for the back office.
//!
//! The configured password is never compared directly. Both sides are
//! reduced to an HMAC-SHA256 digest keyed by the session secret and the
//! digests are compared in constant time.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verifies login attempts against the configured password.
pub struct PasswordVerifier {
    key: SecretString,
    expected: Vec<u8>,
}

impl std::fmt::Debug for PasswordVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordVerifier([REDACTED])")
    }
}

impl PasswordVerifier {
    /// Build a verifier for `password`, keyed by `key`.
    #[must_use]
    pub fn new(password: &SecretString, key: SecretString) -> Self {
        let expected = digest(&key, password.expose_secret())
            .map(|mac| mac.finalize().into_bytes().to_vec())
            .unwrap_or_default();
        Self { key, expected }
    }

    /// Whether `candidate` is the configured password.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        if self.expected.is_empty() {
            return false;
        }
        digest(&self.key, candidate).is_some_and(|mac| mac.verify_slice(&self.expected).is_ok())
    }
}

fn digest(key: &SecretString, value: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(key.expose_secret().as_bytes()).ok()?;
    mac.update(value.as_bytes());
    Some(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> PasswordVerifier {
        PasswordVerifier::new(
            &SecretString::from("zeidan2024"),
            SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6-"),
        )
    }

    #[test]
    fn test_accepts_configured_password() {
        assert!(verifier().verify("zeidan2024"));
    }

    #[test]
    fn test_rejects_other_passwords() {
        let verifier = verifier();
        assert!(!verifier.verify(""));
        assert!(!verifier.verify("zeidan2025"));
        assert!(!verifier.verify("zeidan2024 "));
    }

    #[test]
    fn test_debug_redacts() {
        assert_eq!(format!("{:?}", verifier()), "PasswordVerifier([REDACTED])");
    }
}
