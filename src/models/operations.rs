// src/models/operations.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::finance::CollectionStatus;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "campaign_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Done,
    InProgress,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "billing_method")]
pub enum BillingMethod {
    #[sqlx(rename = "PAYPAL")]
    #[serde(rename = "PAYPAL")]
    PayPal,
    #[sqlx(rename = "INVOICE_A")]
    #[serde(rename = "INVOICE_A")]
    InvoiceA,
    #[sqlx(rename = "INVOICE_B")]
    #[serde(rename = "INVOICE_B")]
    InvoiceB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoicing_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoicingStatus {
    Invoiced,
    NotInvoiced,
}

// --- Contadores de ações por canal ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionCounts {
    #[schema(example = 12)]
    pub press: u32,
    #[schema(example = 4)]
    pub radio: u32,
    pub television: u32,
    #[schema(example = 20)]
    pub online: u32,
    pub playlists: u32,
    pub social: u32,
    #[schema(example = "Entrevista en podcast")]
    pub other_actions: Option<String>,
}

impl ActionCounts {
    /// Soma de todos os canais contados (o texto livre não entra).
    pub fn total(&self) -> u64 {
        [self.press, self.radio, self.television, self.online, self.playlists, self.social]
            .iter()
            .map(|n| u64::from(*n))
            .sum()
    }
}

// --- Campanha ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440001")]
    pub id: Uuid,

    #[serde(default, deserialize_with = "crate::models::lenient_date")]
    #[schema(value_type = Option<String>, format = Date, example = "2024-11-02")]
    pub creation_date: Option<NaiveDate>,

    pub client_id: Uuid,

    #[sqlx(json)]
    #[serde(default)]
    pub actions: ActionCounts,

    #[serde(default, deserialize_with = "crate::models::nullable_decimal")]
    #[schema(example = "850.00")]
    pub price: Decimal,

    #[serde(default, deserialize_with = "crate::models::nullable_decimal")]
    #[schema(example = "150.00")]
    pub collaborator_fee: Decimal,

    pub comments: Option<String>,

    pub status: CampaignStatus,
    pub billing_method: BillingMethod,
    pub invoicing_status: InvoicingStatus,
    pub collection_status: CollectionStatus,

    #[serde(default, deserialize_with = "crate::models::lenient_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub collection_date: Option<NaiveDate>,

    // Vínculo por ID com a fatura (nunca pelo número da fatura)
    pub invoice_id: Option<Uuid>,
}

impl Campaign {
    pub fn is_invoiced(&self) -> bool {
        self.invoice_id.is_some()
    }
}
