// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

/// Entidades que podem faltar numa busca por ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Client,
    LegalEntity,
    Campaign,
    Invoice,
    CollaboratorPayment,
}

impl Entity {
    fn key(self) -> &'static str {
        match self {
            Entity::Client => "not_found.client",
            Entity::LegalEntity => "not_found.legal_entity",
            Entity::Campaign => "not_found.campaign",
            Entity::Invoice => "not_found.invoice",
            Entity::CollaboratorPayment => "not_found.collaborator_payment",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Entity::Client => "client",
            Entity::LegalEntity => "legal entity",
            Entity::Campaign => "campaign",
            Entity::Invoice => "invoice",
            Entity::CollaboratorPayment => "collaborator payment",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Período inválido: {month}/{year}")]
    InvalidPeriod { month: u32, year: i32 },

    #[error("{entity} não encontrado: {id}")]
    NotFound { entity: Entity, id: Uuid },

    #[error("Cliente {client_id} possui {campaigns} campanha(s) vinculada(s)")]
    ClientHasCampaigns { client_id: Uuid, campaigns: usize },

    #[error("Número de fatura duplicado: {0}")]
    DuplicateInvoiceReference(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Snapshot local, PDF e qualquer outra coisa inesperada
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(entity: Entity, id: Uuid) -> Self {
        AppError::NotFound { entity, id }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidPeriod { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::ClientHasCampaigns { .. } | AppError::DuplicateInvoiceReference(_) => {
                StatusCode::CONFLICT
            }
            AppError::FontNotFound(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave do catálogo de mensagens.
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::InvalidPeriod { .. } => "invalid_period",
            AppError::NotFound { entity, .. } => entity.key(),
            AppError::ClientHasCampaigns { .. } => "client_has_campaigns",
            AppError::DuplicateInvoiceReference(_) => "duplicate_invoice_reference",
            AppError::FontNotFound(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_) => "internal",
        }
    }

    /// Converte o erro de domínio na resposta traduzida para o idioma do pedido.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            AppError::ClientHasCampaigns { campaigns, .. } => Some(json!({ "campaigns": campaigns })),
            AppError::DuplicateInvoiceReference(reference) => Some(json!({ "reference": reference })),
            _ => None,
        };

        ApiError {
            status,
            message: store.translate(&locale.0, self.message_key()),
            details,
        }
    }
}

// O erro "pronto para o cliente": status + mensagem já traduzida
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}
