// src/models/crm.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- CLIENTE ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    // Nome artístico / comercial usado nas telas
    #[schema(example = "Los Planetas")]
    pub display_name: String,

    // Quem paga de fato (vai para a fatura)
    #[schema(example = "Planetas Producciones S.L.")]
    pub payer_legal_name: String,

    #[schema(example = "B12345678")]
    pub tax_id: Option<String>,

    #[schema(example = "Calle Mayor 1, 18001 Granada")]
    pub address: Option<String>,
}

// --- IDENTIDADES FISCAIS EXTRAS ---

/// Outra razão social pela qual o cliente pode ser faturado
/// (selo, editora, produtora...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegalEntity {
    pub id: Uuid,
    pub client_id: Uuid,

    #[schema(example = "El Ejército Rojo Records S.L.")]
    pub legal_name: String,

    pub tax_id: Option<String>,
    pub address: Option<String>,
}

/// Dados do pagador copiados para a fatura no momento da emissão.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayerIdentity {
    pub name: String,
    pub tax_id: Option<String>,
    pub address: Option<String>,
}

impl From<&Client> for PayerIdentity {
    fn from(client: &Client) -> Self {
        Self {
            name: client.payer_legal_name.clone(),
            tax_id: client.tax_id.clone(),
            address: client.address.clone(),
        }
    }
}

impl From<&LegalEntity> for PayerIdentity {
    fn from(entity: &LegalEntity) -> Self {
        Self {
            name: entity.legal_name.clone(),
            tax_id: entity.tax_id.clone(),
            address: entity.address.clone(),
        }
    }
}
