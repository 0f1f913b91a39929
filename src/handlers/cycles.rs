// src/handlers/cycles.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::cycle::{
        CreateCyclePayload, Cycle, CycleCheckin, CycleProgress, ToggleCheckinPayload, ToggleCheckinResponse,
    },
};

// GET /api/cycles
#[utoipa::path(
    get,
    path = "/api/cycles",
    tag = "Cycles",
    responses((status = 200, description = "Ciclos de hábitos", body = Vec<Cycle>)),
    security(("api_jwt" = []))
)]
pub async fn list_cycles(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let cycles = app_state
        .cycle_service
        .list(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(cycles)))
}

// POST /api/cycles
#[utoipa::path(
    post,
    path = "/api/cycles",
    tag = "Cycles",
    request_body = CreateCyclePayload,
    responses(
        (status = 201, description = "Ciclo criado", body = Cycle),
        (status = 400, description = "Datas ou hábitos inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_cycle(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateCyclePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let cycle = app_state
        .cycle_service
        .create(user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(cycle)))
}

// DELETE /api/cycles/{id}
#[utoipa::path(
    delete,
    path = "/api/cycles/{id}",
    tag = "Cycles",
    params(("id" = Uuid, Path, description = "ID do ciclo")),
    responses((status = 204, description = "Ciclo removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_cycle(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .cycle_service
        .delete(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/cycles/{id}/checkins
#[utoipa::path(
    get,
    path = "/api/cycles/{id}/checkins",
    tag = "Cycles",
    params(("id" = Uuid, Path, description = "ID do ciclo")),
    responses((status = 200, description = "Check-ins marcados", body = Vec<CycleCheckin>)),
    security(("api_jwt" = []))
)]
pub async fn list_checkins(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let checkins = app_state
        .cycle_service
        .checkins(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(checkins)))
}

// POST /api/cycles/{id}/checkins/toggle
#[utoipa::path(
    post,
    path = "/api/cycles/{id}/checkins/toggle",
    tag = "Cycles",
    params(("id" = Uuid, Path, description = "ID do ciclo")),
    request_body = ToggleCheckinPayload,
    responses(
        (status = 200, description = "Novo estado do check-in", body = ToggleCheckinResponse),
        (status = 400, description = "Hábito ou dia fora do ciclo")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_checkin(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ToggleCheckinPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let response = app_state
        .cycle_service
        .toggle(&app_state.db_pool, user.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(response)))
}

// GET /api/cycles/{id}/progress
#[utoipa::path(
    get,
    path = "/api/cycles/{id}/progress",
    tag = "Cycles",
    params(("id" = Uuid, Path, description = "ID do ciclo")),
    responses((status = 200, description = "Progresso por hábito", body = CycleProgress)),
    security(("api_jwt" = []))
)]
pub async fn get_progress(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let progress = app_state
        .cycle_service
        .progress(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(progress)))
}
