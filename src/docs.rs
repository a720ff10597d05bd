// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Promo Ledger API",
        description = "Clientes, campanhas, faturas, livro-caixa e painel do escritório de promoção"
    ),
    paths(
        // --- Clientes ---
        handlers::crm::list_clients,
        handlers::crm::create_client,
        handlers::crm::get_client,
        handlers::crm::update_client,
        handlers::crm::delete_client,
        handlers::crm::list_legal_entities,
        handlers::crm::create_legal_entity,
        handlers::crm::update_legal_entity,
        handlers::crm::delete_legal_entity,

        // --- Campanhas ---
        handlers::operations::list_campaigns,
        handlers::operations::create_campaign,
        handlers::operations::get_campaign,
        handlers::operations::update_campaign,
        handlers::operations::delete_campaign,

        // --- Faturas ---
        handlers::finance::list_invoices,
        handlers::finance::create_invoice,
        handlers::finance::get_invoice,
        handlers::finance::update_invoice,
        handlers::finance::delete_invoice,
        handlers::finance::collect_invoice,
        handlers::documents::invoice_pdf,

        // --- Movimentos ---
        handlers::finance::list_movements,
        handlers::finance::record_movement,
        handlers::finance::get_balances,

        // --- Colaborador ---
        handlers::finance::list_collaborator_payments,
        handlers::finance::create_collaborator_payment,
        handlers::finance::associate_campaigns,
        handlers::finance::delete_collaborator_payment,

        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            // --- CRM ---
            models::crm::Client,
            models::crm::LegalEntity,
            handlers::crm::ClientPayload,
            handlers::crm::LegalEntityPayload,

            // --- Operations ---
            models::operations::CampaignStatus,
            models::operations::BillingMethod,
            models::operations::InvoicingStatus,
            models::operations::ActionCounts,
            models::operations::Campaign,
            handlers::operations::CampaignPayload,

            // --- Finance ---
            models::finance::CollectionStatus,
            models::finance::MovementKind,
            models::finance::Account,
            models::finance::Invoice,
            models::finance::Movement,
            models::finance::CollaboratorPayment,
            handlers::finance::InvoicePayload,
            handlers::finance::CollectPayload,
            handlers::finance::CollectionReceipt,
            handlers::finance::MovementPayload,
            handlers::finance::CollaboratorPaymentPayload,
            handlers::finance::AssociateCampaignsPayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
            models::dashboard::MonthRollup,
            models::dashboard::AccountBalances,
        )
    ),
    tags(
        (name = "Clientes", description = "Clientes e razões sociais de faturamento"),
        (name = "Campanhas", description = "Campanhas de imprensa e ações por canal"),
        (name = "Faturas", description = "Emissão, cobrança e PDF de faturas"),
        (name = "Movimentos", description = "Livro-caixa por conta (empresa e PayPal)"),
        (name = "Colaborador", description = "Pagamentos ao colaborador externo"),
        (name = "Dashboard", description = "Saldos, pendências e visão mensal")
    )
)]
pub struct ApiDoc;
