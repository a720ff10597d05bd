// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// 1. Cards do topo (saldos, pendências e histórico)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub corporate_balance: Decimal,        // Saldo da conta da empresa
    pub paypal_balance: Decimal,           // Saldo do PayPal
    pub pending_collection_total: Decimal, // Faturas emitidas ainda não cobradas
    pub pending_invoicing_total: Decimal,  // Campanhas sem fatura vinculada
    pub historical_invoiced_total: Decimal,
    pub historical_collected_total: Decimal,
    pub month: MonthRollup,
}

// 2. Visão do mês selecionado
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthRollup {
    #[schema(example = 11)]
    pub month: u32,
    #[schema(example = 2024)]
    pub year: i32,
    pub total_invoiced: Decimal,
    pub collected_corporate: Decimal,
    pub collected_paypal: Decimal,
    pub total_collected: Decimal,
    pub total_paid_out: Decimal,
    pub invoice_count: usize,
    pub campaign_count: usize,
    pub action_count: u64,
}

// 3. Saldos por conta (GET /api/movements/balances)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalances {
    pub corporate_balance: Decimal,
    pub paypal_balance: Decimal,
}
