// src/lib.rs

//! Back office de um escritório de promoção musical: clientes, campanhas,
//! faturas, livro-caixa por conta e painel mensal, servidos por HTTP.

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use crate::config::AppState;
use crate::docs::ApiDoc;

/// Monta o router principal com todas as rotas e a documentação.
pub fn build_router(app_state: AppState) -> Router {
    // Clientes e razões sociais
    let crm_routes = Router::new()
        .route(
            "/api/clients",
            get(handlers::crm::list_clients).post(handlers::crm::create_client),
        )
        .route(
            "/api/clients/{id}",
            get(handlers::crm::get_client)
                .put(handlers::crm::update_client)
                .delete(handlers::crm::delete_client),
        )
        .route(
            "/api/clients/{id}/legal-entities",
            get(handlers::crm::list_legal_entities).post(handlers::crm::create_legal_entity),
        )
        .route(
            "/api/clients/{id}/legal-entities/{entity_id}",
            axum::routing::put(handlers::crm::update_legal_entity)
                .delete(handlers::crm::delete_legal_entity),
        );

    let campaign_routes = Router::new()
        .route(
            "/api/campaigns",
            get(handlers::operations::list_campaigns).post(handlers::operations::create_campaign),
        )
        .route(
            "/api/campaigns/{id}",
            get(handlers::operations::get_campaign)
                .put(handlers::operations::update_campaign)
                .delete(handlers::operations::delete_campaign),
        );

    let finance_routes = Router::new()
        .route(
            "/api/invoices",
            get(handlers::finance::list_invoices).post(handlers::finance::create_invoice),
        )
        .route(
            "/api/invoices/{id}",
            get(handlers::finance::get_invoice)
                .put(handlers::finance::update_invoice)
                .delete(handlers::finance::delete_invoice),
        )
        .route("/api/invoices/{id}/collect", post(handlers::finance::collect_invoice))
        .route("/api/invoices/{id}/pdf", get(handlers::documents::invoice_pdf))
        .route(
            "/api/movements",
            get(handlers::finance::list_movements).post(handlers::finance::record_movement),
        )
        .route("/api/movements/balances", get(handlers::finance::get_balances))
        .route(
            "/api/collaborator-payments",
            get(handlers::finance::list_collaborator_payments)
                .post(handlers::finance::create_collaborator_payment),
        )
        .route(
            "/api/collaborator-payments/{id}",
            axum::routing::delete(handlers::finance::delete_collaborator_payment),
        )
        .route(
            "/api/collaborator-payments/{id}/campaigns",
            post(handlers::finance::associate_campaigns),
        );

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .merge(crm_routes)
        .merge(campaign_routes)
        .merge(finance_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
