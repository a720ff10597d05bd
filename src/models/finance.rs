// src/models/finance.rs

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// IVA fixo aplicado na emissão (21%).
pub const TAX_RATE: Decimal = Decimal::from_parts(21, 0, 0, false, 2);

/// Imposto da fatura: base × 0,21 arredondado para centavos.
pub fn tax_for(base_price: Decimal) -> Decimal {
    (base_price * TAX_RATE).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "collection_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionStatus {
    Collected,    // Cobrado
    NotCollected, // Pendiente de cobro
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    Collection, // Entrada
    Payment,    // Saída
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cash_account")]
pub enum Account {
    #[sqlx(rename = "CORPORATE_ACCOUNT")]
    #[serde(rename = "CORPORATE_ACCOUNT")]
    CorporateAccount,
    #[sqlx(rename = "PAYPAL")]
    #[serde(rename = "PAYPAL")]
    PayPal,
}

// --- Fatura ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,

    #[serde(default, deserialize_with = "crate::models::lenient_date")]
    #[schema(value_type = Option<String>, format = Date, example = "2024-11-20")]
    pub date: Option<NaiveDate>,

    #[schema(example = "2024-017")]
    pub reference: String,

    pub client_id: Uuid,

    // Snapshot do pagador (copiado na emissão, não é join)
    #[schema(example = "Planetas Producciones S.L.")]
    pub payer_name: String,
    pub payer_tax_id: Option<String>,
    pub payer_address: Option<String>,

    #[serde(default, deserialize_with = "crate::models::nullable_decimal")]
    #[schema(example = "1200.00")]
    pub base_price: Decimal,

    #[serde(default, deserialize_with = "crate::models::nullable_decimal")]
    #[schema(example = "252.00")]
    pub tax_amount: Decimal,

    pub collection_status: CollectionStatus,

    #[serde(default, deserialize_with = "crate::models::lenient_date")]
    #[schema(value_type = Option<String>, format = Date)]
    pub collection_date: Option<NaiveDate>,

    pub description: Option<String>,
}

impl Invoice {
    pub fn total(&self) -> Decimal {
        self.base_price + self.tax_amount
    }

    pub fn is_collected(&self) -> bool {
        self.collection_status == CollectionStatus::Collected
    }
}

// --- Movimento de caixa ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: Uuid,

    #[serde(default, deserialize_with = "crate::models::lenient_date")]
    #[schema(value_type = Option<String>, format = Date, example = "2024-11-25")]
    pub date: Option<NaiveDate>,

    pub kind: MovementKind,

    #[schema(example = "Planetas Producciones S.L.")]
    pub payer_name: String,

    pub client_id: Option<Uuid>,

    // Sempre positivo, o sinal vem do `kind`
    #[serde(default, deserialize_with = "crate::models::nullable_decimal")]
    #[schema(example = "1452.00")]
    pub amount: Decimal,

    pub account: Account,

    pub invoice_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,

    pub details: Option<String>,

    // Foto do saldo da conta logo após o lançamento (derivado, só informativo)
    pub balance_after: Option<Decimal>,
}

impl Movement {
    /// Valor com sinal: entradas somam, saídas subtraem.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            MovementKind::Collection => self.amount,
            MovementKind::Payment => -self.amount,
        }
    }
}

// --- Pagamento ao colaborador ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorPayment {
    pub id: Uuid,

    #[serde(default, deserialize_with = "crate::models::lenient_date")]
    #[schema(value_type = Option<String>, format = Date, example = "2024-12-01")]
    pub date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "crate::models::nullable_decimal")]
    #[schema(example = "300.00")]
    pub amount: Decimal,

    #[schema(example = "TRF-2024-12-01")]
    pub reference: Option<String>,

    #[schema(example = "Transferencia")]
    pub payment_method: Option<String>,

    // Tabela de associação (N:M); carregada à parte
    #[sqlx(skip)]
    #[serde(default)]
    pub campaign_ids: Vec<Uuid>,
}
