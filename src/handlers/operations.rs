// src/handlers/operations.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::{non_negative, today_or},
    middleware::i18n::Locale,
    models::{
        finance::CollectionStatus,
        operations::{ActionCounts, BillingMethod, Campaign, CampaignStatus, InvoicingStatus},
    },
    store::{CampaignDraft, CampaignFilter},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPayload {
    /// Padrão: hoje
    pub creation_date: Option<NaiveDate>,

    pub client_id: Uuid,

    #[serde(default)]
    pub actions: ActionCounts,

    #[validate(custom(function = "non_negative"))]
    #[schema(example = "850.00")]
    pub price: Decimal,

    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub collaborator_fee: Decimal,

    #[validate(length(max = 2000))]
    pub comments: Option<String>,

    pub status: CampaignStatus,
    pub billing_method: BillingMethod,

    // Ajustes manuais. Sem invoicingStatus, vale o vínculo com a fatura;
    // sem collectionStatus, a edição mantém a cobrança atual
    pub invoicing_status: Option<InvoicingStatus>,
    pub collection_status: Option<CollectionStatus>,
    pub collection_date: Option<NaiveDate>,
    pub invoice_id: Option<Uuid>,
}

impl From<CampaignPayload> for CampaignDraft {
    fn from(p: CampaignPayload) -> Self {
        CampaignDraft {
            creation_date: today_or(p.creation_date),
            client_id: p.client_id,
            actions: p.actions,
            price: p.price,
            collaborator_fee: p.collaborator_fee,
            comments: p.comments,
            status: p.status,
            billing_method: p.billing_method,
            invoicing_status: p.invoicing_status,
            collection_status: p.collection_status,
            collection_date: p.collection_date,
            invoice_id: p.invoice_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CampaignQuery {
    /// Só campanhas deste cliente
    pub client_id: Option<Uuid>,
    /// true = ainda não associadas a um pagamento ao colaborador
    pub unpaid_collaborator: Option<bool>,
}

// GET /api/campaigns
#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = "Campanhas",
    params(CampaignQuery),
    responses((status = 200, description = "Campanhas filtradas", body = Vec<Campaign>))
)]
pub async fn list_campaigns(
    State(app_state): State<AppState>,
    Query(query): Query<CampaignQuery>,
) -> impl IntoResponse {
    let filter = CampaignFilter {
        client_id: query.client_id,
        unpaid_collaborator: query.unpaid_collaborator,
    };
    Json(app_state.ledger_service.list_campaigns(filter).await)
}

// POST /api/campaigns
#[utoipa::path(
    post,
    path = "/api/campaigns",
    tag = "Campanhas",
    request_body = CampaignPayload,
    responses(
        (status = 201, description = "Campanha criada", body = Campaign),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente ou fatura não encontrados")
    )
)]
pub async fn create_campaign(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CampaignPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let campaign = app_state
        .ledger_service
        .create_campaign(payload.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(campaign)))
}

// GET /api/campaigns/{id}
#[utoipa::path(
    get,
    path = "/api/campaigns/{id}",
    tag = "Campanhas",
    params(("id" = Uuid, Path, description = "ID da campanha")),
    responses(
        (status = 200, description = "Campanha", body = Campaign),
        (status = 404, description = "Campanha não encontrada")
    )
)]
pub async fn get_campaign(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let campaign = app_state
        .ledger_service
        .get_campaign(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(campaign))
}

// PUT /api/campaigns/{id}
#[utoipa::path(
    put,
    path = "/api/campaigns/{id}",
    tag = "Campanhas",
    request_body = CampaignPayload,
    params(("id" = Uuid, Path, description = "ID da campanha")),
    responses(
        (status = 200, description = "Campanha atualizada", body = Campaign),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Campanha não encontrada")
    )
)]
pub async fn update_campaign(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<CampaignPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let campaign = app_state
        .ledger_service
        .update_campaign(id, payload.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(campaign))
}

// DELETE /api/campaigns/{id}
#[utoipa::path(
    delete,
    path = "/api/campaigns/{id}",
    tag = "Campanhas",
    params(("id" = Uuid, Path, description = "ID da campanha")),
    responses(
        (status = 204, description = "Campanha excluída"),
        (status = 404, description = "Campanha não encontrada")
    )
)]
pub async fn delete_campaign(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .ledger_service
        .delete_campaign(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
