// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::dashboard::DashboardSummary,
    store::dashboard::Period,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// 1-12 (padrão: mês atual)
    pub month: Option<u32>,
    /// 2000-2100 (padrão: ano atual)
    pub year: Option<i32>,
}

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Saldos, pendências, histórico e visão do mês", body = DashboardSummary),
        (status = 400, description = "Mês ou ano fora do intervalo")
    )
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let current = Period::containing(chrono::Local::now().date_naive());
    let period = Period::new(
        query.month.unwrap_or(current.month()),
        query.year.unwrap_or(current.year()),
    )
    .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let summary = app_state.ledger_service.dashboard(period).await;

    Ok((StatusCode::OK, Json(summary)))
}
