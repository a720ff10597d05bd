// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    services::document_service::pdf_file_name,
};

// GET /api/invoices/{id}/pdf
#[utoipa::path(
    get,
    path = "/api/invoices/{id}/pdf",
    tag = "Faturas",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Fatura em PDF (A4)", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Fatura não encontrada"),
        (status = 500, description = "Fonte ausente ou falha ao gerar o PDF")
    )
)]
pub async fn invoice_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(invoice_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let (invoice, client_name) = app_state
        .ledger_service
        .invoice_with_client_name(invoice_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf_bytes = app_state
        .document_service
        .render_invoice(&invoice, client_name.as_deref())
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    // Configura os headers para o navegador baixar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", pdf_file_name(&invoice)),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
