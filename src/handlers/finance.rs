// src/handlers/finance.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::{non_negative, today_or},
    middleware::i18n::Locale,
    models::{
        dashboard::AccountBalances,
        finance::{Account, CollaboratorPayment, CollectionStatus, Invoice, Movement, MovementKind},
    },
    store::{CollaboratorPaymentDraft, InvoiceDraft, MovementDraft},
};

// =============================================================================
//  ÁREA 1: FATURAS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    /// Data de emissão (padrão: hoje)
    pub date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 40, message = "O número da fatura é obrigatório"))]
    #[schema(example = "2024-017")]
    pub reference: String,

    pub client_id: Uuid,

    /// Emitir em nome de outra razão social do cliente
    pub legal_entity_id: Option<Uuid>,

    #[validate(custom(function = "non_negative"))]
    #[schema(example = 1200.0)]
    pub base_price: Decimal,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Campanhas cobertas por esta fatura
    #[serde(default)]
    pub campaign_ids: Vec<Uuid>,

    pub collection_status: Option<CollectionStatus>,
    pub collection_date: Option<NaiveDate>,
}

impl From<InvoicePayload> for InvoiceDraft {
    fn from(p: InvoicePayload) -> Self {
        InvoiceDraft {
            date: today_or(p.date),
            reference: p.reference,
            client_id: p.client_id,
            legal_entity_id: p.legal_entity_id,
            base_price: p.base_price,
            description: p.description,
            campaign_ids: p.campaign_ids,
            collection_status: p.collection_status,
            collection_date: p.collection_date,
        }
    }
}

// GET /api/invoices
#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Faturas",
    responses((status = 200, description = "Todas as faturas", body = Vec<Invoice>))
)]
pub async fn list_invoices(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.ledger_service.list_invoices().await)
}

// POST /api/invoices
#[utoipa::path(
    post,
    path = "/api/invoices",
    tag = "Faturas",
    request_body = InvoicePayload,
    responses(
        (status = 201, description = "Fatura emitida (IVA calculado)", body = Invoice),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente, razão social ou campanha não encontrados"),
        (status = 409, description = "Número de fatura já usado")
    )
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<InvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .ledger_service
        .create_invoice(payload.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

// GET /api/invoices/{id}
#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = "Faturas",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Fatura", body = Invoice),
        (status = 404, description = "Fatura não encontrada")
    )
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice = app_state
        .ledger_service
        .get_invoice(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoice))
}

// PUT /api/invoices/{id}
#[utoipa::path(
    put,
    path = "/api/invoices/{id}",
    tag = "Faturas",
    request_body = InvoicePayload,
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Fatura revisada (IVA recalculado)", body = Invoice),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Fatura não encontrada"),
        (status = 409, description = "Número de fatura já usado")
    )
)]
pub async fn update_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<InvoicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let invoice = app_state
        .ledger_service
        .update_invoice(id, payload.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(invoice))
}

// DELETE /api/invoices/{id}
#[utoipa::path(
    delete,
    path = "/api/invoices/{id}",
    tag = "Faturas",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 204, description = "Fatura excluída (campanhas desvinculadas)"),
        (status = 404, description = "Fatura não encontrada")
    )
)]
pub async fn delete_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .ledger_service
        .delete_invoice(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectPayload {
    /// Conta que recebeu o dinheiro
    pub account: Account,
    /// Data da cobrança (padrão: hoje)
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReceipt {
    pub invoice: Invoice,
    pub movement: Movement,
    pub campaign_ids: Vec<Uuid>,
    /// A fatura já estava cobrada antes deste pedido
    pub already_collected: bool,
}

// POST /api/invoices/{id}/collect
#[utoipa::path(
    post,
    path = "/api/invoices/{id}/collect",
    tag = "Faturas",
    request_body = CollectPayload,
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Fatura cobrada, movimento lançado", body = CollectionReceipt),
        (status = 204, description = "Fatura inexistente: nada foi feito")
    )
)]
pub async fn collect_invoice(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<CollectPayload>,
) -> Result<Response, ApiError> {
    let outcome = app_state
        .ledger_service
        .collect_invoice(id, payload.account, today_or(payload.date))
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let Some(outcome) = outcome else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let receipt = CollectionReceipt {
        invoice: outcome.invoice,
        movement: outcome.movement,
        campaign_ids: outcome.campaign_ids,
        already_collected: outcome.was_collected,
    };
    Ok((StatusCode::OK, Json(receipt)).into_response())
}

// =============================================================================
//  ÁREA 2: MOVIMENTOS (LIVRO-CAIXA)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementPayload {
    /// Padrão: hoje
    pub date: Option<NaiveDate>,

    pub kind: MovementKind,

    #[validate(length(min = 1, max = 200, message = "O pagador é obrigatório"))]
    pub payer_name: String,

    pub client_id: Option<Uuid>,

    /// Sempre positivo; o sinal vem de `kind`
    #[validate(custom(function = "non_negative"))]
    #[schema(example = 300.0)]
    pub amount: Decimal,

    pub account: Account,
    pub invoice_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,

    #[validate(length(max = 2000))]
    pub details: Option<String>,
}

// GET /api/movements
#[utoipa::path(
    get,
    path = "/api/movements",
    tag = "Movimentos",
    responses((status = 200, description = "Livro-caixa em ordem de lançamento", body = Vec<Movement>))
)]
pub async fn list_movements(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.ledger_service.list_movements().await)
}

// POST /api/movements
#[utoipa::path(
    post,
    path = "/api/movements",
    tag = "Movimentos",
    request_body = MovementPayload,
    responses(
        (status = 201, description = "Movimento lançado", body = Movement),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente, fatura ou campanha não encontrados")
    )
)]
pub async fn record_movement(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<MovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let draft = MovementDraft {
        date: today_or(payload.date),
        kind: payload.kind,
        payer_name: payload.payer_name,
        client_id: payload.client_id,
        amount: payload.amount,
        account: payload.account,
        invoice_id: payload.invoice_id,
        campaign_id: payload.campaign_id,
        details: payload.details,
    };
    let movement = app_state
        .ledger_service
        .record_movement(draft)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(movement)))
}

// GET /api/movements/balances
#[utoipa::path(
    get,
    path = "/api/movements/balances",
    tag = "Movimentos",
    responses((status = 200, description = "Saldo por conta", body = AccountBalances))
)]
pub async fn get_balances(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.ledger_service.balances().await)
}

// =============================================================================
//  ÁREA 3: PAGAMENTOS AO COLABORADOR
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorPaymentPayload {
    /// Padrão: hoje
    pub date: Option<NaiveDate>,

    #[validate(custom(function = "non_negative"))]
    #[schema(example = 150.0)]
    pub amount: Decimal,

    #[validate(length(max = 120))]
    pub reference: Option<String>,

    #[validate(length(max = 60))]
    #[schema(example = "Transferencia")]
    pub payment_method: Option<String>,

    #[serde(default)]
    pub campaign_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssociateCampaignsPayload {
    #[validate(length(min = 1, message = "Informe ao menos uma campanha"))]
    pub campaign_ids: Vec<Uuid>,
}

// GET /api/collaborator-payments
#[utoipa::path(
    get,
    path = "/api/collaborator-payments",
    tag = "Colaborador",
    responses((status = 200, description = "Pagamentos ao colaborador", body = Vec<CollaboratorPayment>))
)]
pub async fn list_collaborator_payments(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.ledger_service.list_collaborator_payments().await)
}

// POST /api/collaborator-payments
#[utoipa::path(
    post,
    path = "/api/collaborator-payments",
    tag = "Colaborador",
    request_body = CollaboratorPaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado", body = CollaboratorPayment),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Campanha não encontrada")
    )
)]
pub async fn create_collaborator_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CollaboratorPaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let draft = CollaboratorPaymentDraft {
        date: today_or(payload.date),
        amount: payload.amount,
        reference: payload.reference,
        payment_method: payload.payment_method,
        campaign_ids: payload.campaign_ids,
    };
    let payment = app_state
        .ledger_service
        .create_collaborator_payment(draft)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(payment)))
}

// POST /api/collaborator-payments/{id}/campaigns
#[utoipa::path(
    post,
    path = "/api/collaborator-payments/{id}/campaigns",
    tag = "Colaborador",
    request_body = AssociateCampaignsPayload,
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 200, description = "Campanhas associadas", body = CollaboratorPayment),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Pagamento ou campanha não encontrados")
    )
)]
pub async fn associate_campaigns(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssociateCampaignsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let payment = app_state
        .ledger_service
        .associate_campaigns(id, payload.campaign_ids)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(payment))
}

// DELETE /api/collaborator-payments/{id}
#[utoipa::path(
    delete,
    path = "/api/collaborator-payments/{id}",
    tag = "Colaborador",
    params(("id" = Uuid, Path, description = "ID do pagamento")),
    responses(
        (status = 204, description = "Pagamento excluído"),
        (status = 404, description = "Pagamento não encontrado")
    )
)]
pub async fn delete_collaborator_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .ledger_service
        .delete_collaborator_payment(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
