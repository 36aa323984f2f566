//! Integration test helpers for Zeidan Parfum.
//!
//! Tests drive the real admin and storefront routers in process with
//! `tower::ServiceExt::oneshot`, backed by a [`MemoryStore`] they can seed and
//! inspect. No network, no spreadsheet.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p zeidan-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use secrecy::SecretString;
use tower::ServiceExt;

use zeidan_core::CellValue;
use zeidan_core::schema::{ALL_TABLES, PRODUCT_COLUMNS, PRODUCTS};
use zeidan_sheets::{MemoryStore, SheetsConfig, TableStore};

/// Back office password used by [`admin_config`].
pub const TEST_PASSWORD: &str = "frasco-dourado-2026";

/// WhatsApp number used by [`storefront_config`].
pub const TEST_WHATSAPP: &str = "5531999999999";

/// An empty spreadsheet with all three worksheets.
#[must_use]
pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_schema(ALL_TABLES))
}

#[must_use]
pub fn admin_config() -> zeidan_admin::config::AdminConfig {
    zeidan_admin::config::AdminConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3001,
        base_url: "http://localhost:3001".to_string(),
        password: SecretString::from(TEST_PASSWORD),
        session_secret: SecretString::from("q8Z!r2#Lm9@xT4$wK7^pV1&nB6*cY3%d"),
        cache_ttl: Duration::from_secs(10),
        sheets: SheetsConfig::memory(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    }
}

#[must_use]
pub fn storefront_config() -> zeidan_storefront::config::StorefrontConfig {
    zeidan_storefront::config::StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        whatsapp_number: TEST_WHATSAPP.to_string(),
        store_name: "Zeidan Parfum".to_string(),
        cache_ttl: Duration::from_secs(60),
        sheets: SheetsConfig::memory(),
        sentry_dsn: None,
    }
}

/// The admin router over `store`.
#[must_use]
pub fn admin_app(store: Arc<MemoryStore>) -> Router {
    let store: Arc<dyn TableStore> = store;
    zeidan_admin::app(zeidan_admin::state::AppState::new(admin_config(), store))
}

/// The storefront router over `store`.
#[must_use]
pub fn storefront_app(store: Arc<MemoryStore>) -> Router {
    let store: Arc<dyn TableStore> = store;
    zeidan_storefront::app(zeidan_storefront::state::AppState::new(
        storefront_config(),
        store,
    ))
}

/// Replace the `Produtos` worksheet with `(id, name, cost, price, image)` rows.
pub async fn seed_products(store: &MemoryStore, products: &[(&str, &str, f64, f64, &str)]) {
    let mut columns: Vec<&str> = PRODUCT_COLUMNS.to_vec();
    columns.push("Imagem");
    let mut rows = vec![columns.iter().map(|c| CellValue::text(*c)).collect::<Vec<_>>()];
    for (id, name, cost, price, image) in products {
        rows.push(vec![
            CellValue::text(*id),
            CellValue::text(*name),
            CellValue::Number(*cost),
            CellValue::Number(*price),
            CellValue::text(*image),
        ]);
    }
    store.put_rows(PRODUCTS, rows).await;
}

/// Replace a worksheet with a header and text rows.
pub async fn seed_rows(store: &MemoryStore, name: &str, columns: &[&str], rows: &[&[&str]]) {
    let mut all = vec![columns.iter().map(|c| CellValue::text(*c)).collect::<Vec<_>>()];
    all.extend(
        rows.iter()
            .map(|row| row.iter().map(|cell| CellValue::text(*cell)).collect()),
    );
    store.put_rows(name, all).await;
}

/// GET `uri`, optionally with a session cookie.
#[must_use]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// POST an url-encoded form to `uri`, optionally with a session cookie.
#[must_use]
pub fn post_form(uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Send one request through a clone of `app`.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Collect a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `name=value` of the first `Set-Cookie` header, ready to send back.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|pair| pair.trim().to_string())
}

/// Log in with [`TEST_PASSWORD`] and return the session cookie.
pub async fn login(app: &Router) -> String {
    let response = send(
        app,
        post_form("/auth/login", &[("password", TEST_PASSWORD)], None),
    )
    .await;
    assert!(
        response.status().is_redirection(),
        "login failed with {}",
        response.status()
    );
    session_cookie(&response).unwrap()
}
