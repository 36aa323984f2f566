//! Service-account authentication.
//!
//! Google service accounts authenticate with the OAuth2 JWT-bearer grant: a
//! short-lived RS256-signed assertion is exchanged at the key's `token_uri`
//! for a bearer access token.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rustls::SignatureScheme;
use rustls::crypto::ring::sign::any_supported_type;
use rustls::pki_types::PrivateKeyDer;
use rustls::pki_types::pem::PemObject;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::StoreError;

/// OAuth scope for reading and writing spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime. Google rejects anything over an hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh this long before the access token expires.
const REFRESH_MARGIN_SECS: i64 = 60;

/// The parts of a service-account key file this client uses.
#[derive(Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: SecretString,
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Deserialize)]
struct KeyFile {
    client_email: String,
    private_key: String,
    #[serde(default)]
    token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Parse a service-account key file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unauthenticated` if the JSON is not a key file.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let file: KeyFile = serde_json::from_str(json).map_err(|e| {
            StoreError::Unauthenticated(format!("invalid service account key: {e}"))
        })?;
        Ok(Self {
            client_email: file.client_email,
            private_key: SecretString::from(file.private_key),
            token_uri: file
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        })
    }
}

#[derive(Serialize)]
struct JwtHeader<'a> {
    alg: &'a str,
    typ: &'a str,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Build a signed JWT-bearer assertion issued at `now` (Unix seconds).
///
/// # Errors
///
/// Returns `StoreError::Unauthenticated` if the private key cannot be used
/// for RS256 signing.
pub fn build_assertion(key: &ServiceAccountKey, now: i64) -> Result<String, StoreError> {
    let header = JwtHeader {
        alg: "RS256",
        typ: "JWT",
    };
    let claims = JwtClaims {
        iss: &key.client_email,
        scope: SPREADSHEETS_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    let signing_input = format!("{}.{}", encode_part(&header)?, encode_part(&claims)?);
    let signature = sign_rs256(key.private_key.expose_secret(), signing_input.as_bytes())?;

    Ok(format!(
        "{signing_input}.{}",
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

fn encode_part<T: Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_vec(value)
        .map(|json| URL_SAFE_NO_PAD.encode(json))
        .map_err(|e| StoreError::Unauthenticated(format!("cannot encode assertion: {e}")))
}

fn sign_rs256(pem: &str, message: &[u8]) -> Result<Vec<u8>, StoreError> {
    let der = PrivateKeyDer::from_pem_slice(pem.as_bytes())
        .map_err(|e| StoreError::Unauthenticated(format!("invalid private key: {e:?}")))?;
    let key = any_supported_type(&der)
        .map_err(|e| StoreError::Unauthenticated(format!("unsupported private key: {e}")))?;
    let signer = key
        .choose_scheme(&[SignatureScheme::RSA_PKCS1_SHA256])
        .ok_or_else(|| StoreError::Unauthenticated("private key is not an RSA key".to_string()))?;
    signer
        .sign(message)
        .map_err(|e| StoreError::Unauthenticated(format!("signing failed: {e}")))
}

/// A bearer token and its expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: SecretString,
    /// Unix timestamp.
    pub expires_at: i64,
}

impl AccessToken {
    /// Expired, or close enough to expiry that it should be refreshed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() >= self.expires_at - REFRESH_MARGIN_SECS
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Issues and caches access tokens for one service account.
pub struct TokenProvider {
    client: reqwest::Client,
    key: ServiceAccountKey,
    token: RwLock<Option<AccessToken>>,
}

impl TokenProvider {
    #[must_use]
    pub fn new(client: reqwest::Client, key: ServiceAccountKey) -> Self {
        Self {
            client,
            key,
            token: RwLock::new(None),
        }
    }

    /// Service account email, for diagnostics.
    #[must_use]
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// A valid access token, fetching a new one when the cached one is
    /// missing or about to expire.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unauthenticated` if the grant is rejected and
    /// `StoreError::Unreachable` if the token endpoint cannot be reached.
    pub async fn access_token(&self) -> Result<SecretString, StoreError> {
        if let Some(token) = self.token.read().await.as_ref()
            && !token.is_expired()
        {
            return Ok(token.token.clone());
        }

        let mut guard = self.token.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = guard.as_ref()
            && !token.is_expired()
        {
            return Ok(token.token.clone());
        }

        let token = self.fetch().await?;
        let secret = token.token.clone();
        *guard = Some(token);
        Ok(secret)
    }

    /// Forget the cached token so the next call fetches a new one.
    pub async fn clear(&self) {
        *self.token.write().await = None;
    }

    #[instrument(skip(self), fields(client_email = %self.key.client_email))]
    async fn fetch(&self) -> Result<AccessToken, StoreError> {
        let now = chrono::Utc::now().timestamp();
        let assertion = build_assertion(&self.key, now)?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: TokenResponse = response
                .json()
                .await
                .map_err(|e| StoreError::Unreachable(format!("invalid token response: {e}")))?;
            debug!(expires_in = body.expires_in, "Obtained access token");
            return Ok(AccessToken {
                token: SecretString::from(body.access_token),
                expires_at: now + body.expires_in,
            });
        }

        if status.is_client_error() {
            let body: Option<TokenErrorResponse> = response.json().await.ok();
            let message = body
                .and_then(|b| b.error_description.or(b.error))
                .unwrap_or_else(|| format!("token request rejected with HTTP {status}"));
            return Err(StoreError::Unauthenticated(message));
        }

        Err(StoreError::Unreachable(format!(
            "token endpoint returned HTTP {status}"
        )))
    }
}
