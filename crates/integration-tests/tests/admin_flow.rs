//! Back office flows over the in-memory spreadsheet.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::http::StatusCode;

use zeidan_core::CellValue;
use zeidan_core::schema::{PRODUCTS, PURCHASE_COLUMNS, PURCHASES, SALE_COLUMNS, SALES};
use zeidan_integration_tests::{
    admin_app, body_text, get, location, login, memory_store, post_form, seed_products, seed_rows,
    send,
};
use zeidan_sheets::{MemoryStore, StoreError};

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_unauthenticated_sales_redirects_to_login() {
    let app = admin_app(memory_store());

    let response = send(&app, get("/sales", None)).await;

    assert!(response.status().is_redirection());
    assert_eq!(location(&response).as_deref(), Some("/auth/login"));
}

#[tokio::test]
async fn test_wrong_password_rerenders_login() {
    let app = admin_app(memory_store());

    let response = send(
        &app,
        post_form("/auth/login", &[("password", "errada")], None),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_text(response).await;
    assert!(body.contains("Senha incorreta."));
    assert!(body.contains(r#"name="password""#));
}

#[tokio::test]
async fn test_rotating_forwarded_for_is_still_throttled() {
    let app = admin_app(memory_store());

    let mut statuses = Vec::new();
    for i in 0..8 {
        let mut request = post_form("/auth/login", &[("password", "errada")], None);
        let headers = request.headers_mut();
        headers.insert("cf-connecting-ip", "198.51.100.20".parse().unwrap());
        headers.insert("x-forwarded-for", format!("203.0.113.{i}").parse().unwrap());
        statuses.push(send(&app, request).await.status());
    }

    assert!(statuses[..5].iter().all(|s| *s == StatusCode::UNAUTHORIZED));
    assert!(statuses[5..].iter().all(|s| *s == StatusCode::TOO_MANY_REQUESTS));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = admin_app(memory_store());
    let cookie = login(&app).await;

    let response = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, post_form("/auth/logout", &[], Some(&cookie))).await;
    assert_eq!(location(&response).as_deref(), Some("/auth/login"));

    let response = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(location(&response).as_deref(), Some("/auth/login"));
}

#[tokio::test]
async fn test_health_needs_no_login() {
    let app = admin_app(memory_store());
    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, get("/health/ready", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ============================================================================
// Sales
// ============================================================================

#[tokio::test]
async fn test_sale_form_defaults_to_first_code() {
    let store = memory_store();
    let app = admin_app(store);
    let cookie = login(&app).await;

    let response = send(&app, get("/sales", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(r#"name="order_code" value="ZP01""#));
}

#[tokio::test]
async fn test_fresh_spreadsheet_creates_worksheets() {
    let store = Arc::new(MemoryStore::default());
    let app = admin_app(store.clone());
    let cookie = login(&app).await;

    let response = send(&app, get("/sales", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(r#"name="order_code" value="ZP01""#));

    let header: Vec<CellValue> = SALE_COLUMNS.iter().map(|c| CellValue::text(*c)).collect();
    assert_eq!(store.rows(SALES).await, Some(vec![header]));
    assert!(store.rows(PRODUCTS).await.is_some());
}

#[tokio::test]
async fn test_sale_form_follows_last_row() {
    let store = memory_store();
    seed_rows(&store, SALES, SALE_COLUMNS, &[&["ZP08"], &["ZP09"]]).await;
    let app = admin_app(store);
    let cookie = login(&app).await;

    let body = body_text(send(&app, get("/sales", Some(&cookie))).await).await;

    assert!(body.contains(r#"value="ZP10""#));
}

#[tokio::test]
async fn test_unparseable_code_shows_warning() {
    let store = memory_store();
    seed_rows(&store, SALES, SALE_COLUMNS, &[&["ZPAB"]]).await;
    let app = admin_app(store);
    let cookie = login(&app).await;

    let body = body_text(send(&app, get("/sales", Some(&cookie))).await).await;

    assert!(body.contains("ZP??"));
    assert!(body.contains(r#"class="banner warn""#));
}

#[tokio::test]
async fn test_recorded_sale_appends_row() {
    let store = memory_store();
    seed_products(&store, &[("1", "Sauvage", 400.0, 650.0, "")]).await;
    let app = admin_app(store.clone());
    let cookie = login(&app).await;

    let response = send(
        &app,
        post_form(
            "/sales",
            &[
                ("order_code", ""),
                ("product_id", "1"),
                ("received", "R$ 600,00"),
                ("date", "05/03/2026"),
                ("platform", "WhatsApp"),
            ],
            Some(&cookie),
        ),
    )
    .await;

    assert_eq!(
        location(&response).as_deref(),
        Some("/sales?recorded=ZP01")
    );

    let rows = store.rows(SALES).await.unwrap();
    assert_eq!(rows.len(), 2);
    let row = &rows[1];
    assert_eq!(row[0].as_text(), "ZP01");
    assert_eq!(row[2].as_text(), "Sauvage");
    // Custo, Preco_Tabela, Lucro_Dif, Valor_Recebido
    assert_eq!(row[4], CellValue::Number(400.0));
    assert_eq!(row[5], CellValue::Number(650.0));
    assert_eq!(row[6], CellValue::Number(200.0));
    assert_eq!(row[7], CellValue::Number(600.0));

    let body = body_text(send(&app, get("/sales?recorded=ZP01", Some(&cookie))).await).await;
    assert!(body.contains("Venda ZP01 registrada."));
    assert!(body.contains(r#"value="ZP02""#));
}

#[tokio::test]
async fn test_sale_for_unknown_product_is_rejected() {
    let store = memory_store();
    let app = admin_app(store.clone());
    let cookie = login(&app).await;

    let response = send(
        &app,
        post_form("/sales", &[("product_id", "99")], Some(&cookie)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Selecione um produto cadastrado."));
    assert_eq!(store.rows(SALES).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_store_failure_shows_generic_error() {
    let store = memory_store();
    let app = admin_app(store.clone());
    let cookie = login(&app).await;
    store
        .set_failure(Some(StoreError::Unreachable("quota exceeded".to_string())))
        .await;

    let response = send(&app, get("/sales", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_text(response).await;
    assert!(!body.contains("quota exceeded"));
}

// ============================================================================
// Purchases, products, reports
// ============================================================================

#[tokio::test]
async fn test_purchase_code_skips_other_prefixes() {
    let store = memory_store();
    seed_rows(
        &store,
        PURCHASES,
        PURCHASE_COLUMNS,
        &[&["CP01"], &["ZP05"], &["CP02"], &["avulso"]],
    )
    .await;
    let app = admin_app(store);
    let cookie = login(&app).await;

    let body = body_text(send(&app, get("/purchases", Some(&cookie))).await).await;

    assert!(body.contains(r#"name="order_code" value="CP03""#));
}

#[tokio::test]
async fn test_registered_product_is_listed() {
    let store = memory_store();
    let app = admin_app(store);
    let cookie = login(&app).await;

    let response = send(
        &app,
        post_form(
            "/products",
            &[
                ("id", "7"),
                ("name", "Club de Nuit"),
                ("standard_cost", "180,00"),
                ("sale_price", "R$ 350,00"),
            ],
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(location(&response).as_deref(), Some("/products?added=7"));

    let body = body_text(send(&app, get("/products", Some(&cookie))).await).await;
    assert!(body.contains("Club de Nuit"));
    assert!(body.contains("R$ 350,00"));

    let response = send(
        &app,
        post_form(
            "/products",
            &[("id", "7"), ("name", "Outro")],
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_sums_mixed_currency_cells() {
    let store = memory_store();
    seed_rows(
        &store,
        SALES,
        SALE_COLUMNS,
        &[
            &["ZP01", "1", "A", "Pago", "0", "", "", "R$ 100,00"],
            &["ZP02", "1", "A", "Pago", "0", "", "", "50,5"],
            &["ZP03", "1", "A", "Pago", "0", "", "", "20"],
            &["ZP04", "1", "A", "Cancelado", "0", "", "", "999"],
        ],
    )
    .await;
    let app = admin_app(store);
    let cookie = login(&app).await;

    let response = send(&app, get("/reports", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("R$ 170,50"));
}
