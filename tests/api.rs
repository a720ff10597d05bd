use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use promo_ledger::{
    build_router,
    config::AppState,
    db::{RecordBackend, SnapshotBackend},
    services::{DocumentService, IssuerProfile, LedgerService},
};

async fn app() -> Router {
    let backend: Arc<dyn RecordBackend> = Arc::new(SnapshotBackend::in_memory());
    let ledger_service = LedgerService::bootstrap(backend).await.unwrap();
    // Pasta sem fontes: o PDF falha de forma controlada
    let document_service = DocumentService::new("./no-fonts-here", IssuerProfile::default());
    build_router(AppState::new(ledger_service, document_service))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_with_lang(app, method, uri, body, None).await
}

async fn send_with_lang(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    lang: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(lang) = lang {
        request = request.header(header::ACCEPT_LANGUAGE, lang);
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_client(app: &Router, name: &str) -> String {
    let (status, client) = send(
        app,
        "POST",
        "/api/clients",
        Some(json!({ "displayName": name, "payerLegalName": format!("{name} S.L.") })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    client["id"].as_str().unwrap().to_string()
}

async fn create_campaign(app: &Router, client_id: &str, price: f64) -> String {
    let (status, campaign) = send(
        app,
        "POST",
        "/api/campaigns",
        Some(json!({
            "creationDate": "2024-11-02",
            "clientId": client_id,
            "actions": { "press": 3, "radio": 2 },
            "price": price,
            "status": "IN_PROGRESS",
            "billingMethod": "INVOICE_A"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    campaign["id"].as_str().unwrap().to_string()
}

fn as_f64(value: &Value) -> f64 {
    value.as_f64().unwrap()
}

#[tokio::test]
async fn health_check_answers() {
    let app = app().await;
    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn invoice_lifecycle_feeds_the_dashboard() {
    let app = app().await;
    let client_id = create_client(&app, "Acme").await;
    let campaign_id = create_campaign(&app, &client_id, 1200.0).await;

    let (_, summary) = send(&app, "GET", "/api/dashboard?month=11&year=2024", None).await;
    assert_eq!(as_f64(&summary["pendingInvoicingTotal"]), 1200.0);

    let (status, invoice) = send(
        &app,
        "POST",
        "/api/invoices",
        Some(json!({
            "date": "2024-11-20",
            "reference": "2024-017",
            "clientId": client_id,
            "basePrice": 1200.0,
            "campaignIds": [campaign_id]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(as_f64(&invoice["taxAmount"]), 252.0);
    assert_eq!(invoice["payerName"], "Acme S.L.");
    let invoice_id = invoice["id"].as_str().unwrap().to_string();

    let (status, receipt) = send(
        &app,
        "POST",
        &format!("/api/invoices/{invoice_id}/collect"),
        Some(json!({ "account": "CORPORATE_ACCOUNT", "date": "2024-11-30" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["invoice"]["collectionStatus"], "COLLECTED");
    assert_eq!(as_f64(&receipt["movement"]["amount"]), 1452.0);
    assert_eq!(receipt["campaignIds"], json!([campaign_id]));
    assert_eq!(receipt["alreadyCollected"], false);

    let (_, campaign) = send(&app, "GET", &format!("/api/campaigns/{campaign_id}"), None).await;
    assert_eq!(campaign["collectionStatus"], "COLLECTED");
    assert_eq!(campaign["invoicingStatus"], "INVOICED");

    let (status, summary) = send(&app, "GET", "/api/dashboard?month=11&year=2024", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_f64(&summary["corporateBalance"]), 1452.0);
    assert_eq!(as_f64(&summary["pendingInvoicingTotal"]), 0.0);
    assert_eq!(as_f64(&summary["pendingCollectionTotal"]), 0.0);
    assert_eq!(as_f64(&summary["month"]["totalInvoiced"]), 1452.0);
    assert_eq!(as_f64(&summary["month"]["collectedCorporate"]), 1452.0);
    assert_eq!(summary["month"]["campaignCount"], 1);
    assert_eq!(summary["month"]["actionCount"], 5);
}

#[tokio::test]
async fn editing_a_collected_campaign_keeps_it_collected() {
    let app = app().await;
    let client_id = create_client(&app, "Acme").await;
    let campaign_id = create_campaign(&app, &client_id, 1000.0).await;
    let (_, invoice) = send(
        &app,
        "POST",
        "/api/invoices",
        Some(json!({
            "date": "2024-11-20",
            "reference": "2024-021",
            "clientId": client_id,
            "basePrice": 1000.0,
            "campaignIds": [campaign_id]
        })),
    )
    .await;
    let invoice_id = invoice["id"].as_str().unwrap().to_string();
    send(
        &app,
        "POST",
        &format!("/api/invoices/{invoice_id}/collect"),
        Some(json!({ "account": "CORPORATE_ACCOUNT", "date": "2024-11-30" })),
    )
    .await;

    let (status, campaign) = send(
        &app,
        "PUT",
        &format!("/api/campaigns/{campaign_id}"),
        Some(json!({
            "creationDate": "2024-11-02",
            "clientId": client_id,
            "actions": { "press": 3, "radio": 2 },
            "price": 1000.0,
            "comments": "Segunda ronda de radio",
            "status": "DONE",
            "billingMethod": "INVOICE_A",
            "invoiceId": invoice_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(campaign["comments"], "Segunda ronda de radio");
    assert_eq!(campaign["collectionStatus"], "COLLECTED");
    assert_eq!(campaign["collectionDate"], "2024-11-30");
}

#[tokio::test]
async fn legal_entity_can_be_renamed() {
    let app = app().await;
    let client_id = create_client(&app, "Acme").await;
    let (_, entity) = send(
        &app,
        "POST",
        &format!("/api/clients/{client_id}/legal-entities"),
        Some(json!({ "legalName": "Acme Records S.L." })),
    )
    .await;
    let entity_id = entity["id"].as_str().unwrap().to_string();

    let (status, renamed) = send(
        &app,
        "PUT",
        &format!("/api/clients/{client_id}/legal-entities/{entity_id}"),
        Some(json!({ "legalName": "Acme Music S.L.", "taxId": "B12345678" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["legalName"], "Acme Music S.L.");

    let (_, entities) =
        send(&app, "GET", &format!("/api/clients/{client_id}/legal-entities"), None).await;
    assert_eq!(entities[0]["taxId"], "B12345678");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/clients/{client_id}/legal-entities/{}", uuid::Uuid::new_v4()),
        Some(json!({ "legalName": "Nadie S.L." })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn collecting_an_unknown_invoice_is_a_silent_no_op() {
    let app = app().await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/invoices/{}/collect", uuid::Uuid::new_v4()),
        Some(json!({ "account": "PAYPAL" })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, movements) = send(&app, "GET", "/api/movements", None).await;
    assert_eq!(movements, json!([]));
}

#[tokio::test]
async fn client_with_campaigns_cannot_be_deleted() {
    let app = app().await;
    let client_id = create_client(&app, "Acme").await;
    create_campaign(&app, &client_id, 850.0).await;

    let (status, body) =
        send_with_lang(&app, "DELETE", &format!("/api/clients/{client_id}"), None, Some("en-GB")).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "A client with campaigns cannot be deleted.");
    assert_eq!(body["details"]["campaigns"], 1);
    let (_, clients) = send(&app, "GET", "/api/clients", None).await;
    assert_eq!(clients.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn client_without_campaigns_is_deleted_with_its_legal_entities() {
    let app = app().await;
    let client_id = create_client(&app, "Acme").await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/clients/{client_id}/legal-entities"),
        Some(json!({ "legalName": "Acme Records S.L." })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "DELETE", &format!("/api/clients/{client_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/clients/{client_id}/legal-entities"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_payloads_are_rejected_with_field_details() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/clients",
        Some(json!({ "displayName": "", "payerLegalName": "Acme S.L." })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Uno o más campos no son válidos.");
    assert_eq!(body["details"].as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn negative_amounts_never_reach_the_ledger() {
    let app = app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/movements",
        Some(json!({
            "date": "2024-11-05",
            "kind": "PAYMENT",
            "payerName": "Colaborador",
            "amount": -10.0,
            "account": "PAYPAL"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, balances) = send(&app, "GET", "/api/movements/balances", None).await;
    assert_eq!(as_f64(&balances["paypalBalance"]), 0.0);
}

#[tokio::test]
async fn manual_movements_move_only_their_account() {
    let app = app().await;
    for (kind, amount) in [("COLLECTION", 300.0), ("PAYMENT", 120.0)] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/movements",
            Some(json!({
                "date": "2024-11-05",
                "kind": kind,
                "payerName": "Acme",
                "amount": amount,
                "account": "PAYPAL"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, balances) = send(&app, "GET", "/api/movements/balances", None).await;
    assert_eq!(as_f64(&balances["paypalBalance"]), 180.0);
    assert_eq!(as_f64(&balances["corporateBalance"]), 0.0);
}

#[tokio::test]
async fn duplicate_invoice_reference_conflicts() {
    let app = app().await;
    let client_id = create_client(&app, "Acme").await;
    let invoice = json!({
        "date": "2024-11-20",
        "reference": "2024-001",
        "clientId": client_id,
        "basePrice": 100.0
    });

    let (status, _) = send(&app, "POST", "/api/invoices", Some(invoice.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, "POST", "/api/invoices", Some(invoice)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["reference"], "2024-001");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app().await;
    let id = uuid::Uuid::new_v4();
    for uri in [
        format!("/api/clients/{id}"),
        format!("/api/campaigns/{id}"),
        format!("/api/invoices/{id}"),
        format!("/api/invoices/{id}/pdf"),
    ] {
        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn out_of_range_dashboard_period_is_a_bad_request() {
    let app = app().await;
    let (status, body) =
        send_with_lang(&app, "GET", "/api/dashboard?month=13&year=2024", None, Some("pt-BR")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Mês ou ano fora do intervalo.");
}

#[tokio::test]
async fn collaborator_payments_mark_campaigns_as_paid() {
    let app = app().await;
    let client_id = create_client(&app, "Acme").await;
    let campaign_id = create_campaign(&app, &client_id, 400.0).await;

    let (status, payment) = send(
        &app,
        "POST",
        "/api/collaborator-payments",
        Some(json!({ "date": "2024-12-01", "amount": 80.0, "paymentMethod": "Transferencia" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let payment_id = payment["id"].as_str().unwrap().to_string();

    let (_, unpaid) = send(&app, "GET", "/api/campaigns?unpaidCollaborator=true", None).await;
    assert_eq!(unpaid.as_array().unwrap().len(), 1);

    let (status, payment) = send(
        &app,
        "POST",
        &format!("/api/collaborator-payments/{payment_id}/campaigns"),
        Some(json!({ "campaignIds": [campaign_id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment["campaignIds"], json!([campaign_id]));

    let (_, unpaid) = send(&app, "GET", "/api/campaigns?unpaidCollaborator=true", None).await;
    assert_eq!(unpaid, json!([]));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app().await;
    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/invoices/{id}/collect"].is_object());
}
