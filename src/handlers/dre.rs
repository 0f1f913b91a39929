// src/handlers/dre.rs
// DRE: importação de planilha e demonstrativo do período.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::dre::{DreEntry, DreImportPayload, DreImportReport, DrePeriodQuery, DreSummary},
};

// POST /api/dre/import
#[utoipa::path(
    post,
    path = "/api/dre/import",
    tag = "DRE",
    request_body = DreImportPayload,
    responses(
        (status = 201, description = "Linhas importadas e linhas ignoradas", body = DreImportReport),
        (status = 400, description = "Colunas obrigatórias não identificadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_entries(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<DreImportPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let report = app_state
        .dre_service
        .import(&app_state.db_pool, user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("📊 DRE importado: {} linhas, {} ignoradas", report.imported, report.skipped.len());
    Ok((StatusCode::CREATED, Json(report)))
}

// GET /api/dre/entries?from=&to=
#[utoipa::path(
    get,
    path = "/api/dre/entries",
    tag = "DRE",
    params(
        ("from" = Option<String>, Query, description = "Data inicial (AAAA-MM-DD)"),
        ("to" = Option<String>, Query, description = "Data final (AAAA-MM-DD)")
    ),
    responses((status = 200, description = "Lançamentos do período", body = Vec<DreEntry>)),
    security(("api_jwt" = []))
)]
pub async fn list_entries(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(period): Query<DrePeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = app_state
        .dre_service
        .entries(user.id, &period)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/dre/summary?from=&to=
#[utoipa::path(
    get,
    path = "/api/dre/summary",
    tag = "DRE",
    params(
        ("from" = Option<String>, Query, description = "Data inicial (AAAA-MM-DD)"),
        ("to" = Option<String>, Query, description = "Data final (AAAA-MM-DD)")
    ),
    responses(
        (status = 200, description = "Receitas, despesas, resultado e margem", body = DreSummary),
        (status = 400, description = "Período inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(period): Query<DrePeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .dre_service
        .summary(user.id, &period)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// DELETE /api/dre/entries/{id}
#[utoipa::path(
    delete,
    path = "/api/dre/entries/{id}",
    tag = "DRE",
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    responses((status = 204, description = "Lançamento removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_entry(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .dre_service
        .delete(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
