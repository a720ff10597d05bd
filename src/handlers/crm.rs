// src/handlers/crm.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::crm::{Client, LegalEntity},
    store::{ClientDraft, LegalEntityDraft},
};

// =============================================================================
//  ÁREA 1: CLIENTES
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[validate(length(min = 1, max = 120, message = "O nome é obrigatório"))]
    #[schema(example = "Los Planetas")]
    pub display_name: String,

    #[validate(length(min = 1, max = 200, message = "A razão social é obrigatória"))]
    #[schema(example = "Planetas Música S.L.")]
    pub payer_legal_name: String,

    #[validate(length(max = 32))]
    #[schema(example = "B12345678")]
    pub tax_id: Option<String>,

    pub address: Option<String>,
}

impl From<ClientPayload> for ClientDraft {
    fn from(p: ClientPayload) -> Self {
        ClientDraft {
            display_name: p.display_name,
            payer_legal_name: p.payer_legal_name,
            tax_id: p.tax_id,
            address: p.address,
        }
    }
}

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clientes",
    responses((status = 200, description = "Todos os clientes", body = Vec<Client>))
)]
pub async fn list_clients(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.ledger_service.list_clients().await)
}

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clientes",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let client = app_state
        .ledger_service
        .create_client(payload.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(client)))
}

// GET /api/clients/{id}
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let client = app_state
        .ledger_service
        .get_client(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(client))
}

// PUT /api/clients/{id}
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clientes",
    request_body = ClientPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = Client),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let client = app_state
        .ledger_service
        .update_client(id, payload.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(client))
}

// DELETE /api/clients/{id}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente excluído"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Cliente possui campanhas")
    )
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .ledger_service
        .delete_client(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: RAZÕES SOCIAIS DO CLIENTE
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegalEntityPayload {
    #[validate(length(min = 1, max = 200, message = "A razão social é obrigatória"))]
    #[schema(example = "Planetas Records S.L.")]
    pub legal_name: String,

    #[validate(length(max = 32))]
    pub tax_id: Option<String>,

    pub address: Option<String>,
}

// GET /api/clients/{id}/legal-entities
#[utoipa::path(
    get,
    path = "/api/clients/{id}/legal-entities",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Razões sociais do cliente", body = Vec<LegalEntity>),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn list_legal_entities(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entities = app_state
        .ledger_service
        .list_legal_entities(client_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(entities))
}

// POST /api/clients/{id}/legal-entities
#[utoipa::path(
    post,
    path = "/api/clients/{id}/legal-entities",
    tag = "Clientes",
    request_body = LegalEntityPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 201, description = "Razão social adicionada", body = LegalEntity),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn create_legal_entity(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<LegalEntityPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let draft = LegalEntityDraft {
        legal_name: payload.legal_name,
        tax_id: payload.tax_id,
        address: payload.address,
    };
    let entity = app_state
        .ledger_service
        .create_legal_entity(client_id, draft)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(entity)))
}

// PUT /api/clients/{id}/legal-entities/{entity_id}
#[utoipa::path(
    put,
    path = "/api/clients/{id}/legal-entities/{entity_id}",
    tag = "Clientes",
    request_body = LegalEntityPayload,
    params(
        ("id" = Uuid, Path, description = "ID do cliente"),
        ("entity_id" = Uuid, Path, description = "ID da razão social")
    ),
    responses(
        (status = 200, description = "Razão social atualizada", body = LegalEntity),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Razão social não encontrada")
    )
)]
pub async fn update_legal_entity(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((client_id, entity_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<LegalEntityPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let draft = LegalEntityDraft {
        legal_name: payload.legal_name,
        tax_id: payload.tax_id,
        address: payload.address,
    };
    let entity = app_state
        .ledger_service
        .update_legal_entity(client_id, entity_id, draft)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(entity))
}

// DELETE /api/clients/{id}/legal-entities/{entity_id}
#[utoipa::path(
    delete,
    path = "/api/clients/{id}/legal-entities/{entity_id}",
    tag = "Clientes",
    params(
        ("id" = Uuid, Path, description = "ID do cliente"),
        ("entity_id" = Uuid, Path, description = "ID da razão social")
    ),
    responses(
        (status = 204, description = "Razão social removida"),
        (status = 404, description = "Razão social não encontrada")
    )
)]
pub async fn delete_legal_entity(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((client_id, entity_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .ledger_service
        .delete_legal_entity(client_id, entity_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
