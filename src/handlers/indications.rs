// src/handlers/indications.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::indication::{CreateIndicationPayload, Indication, IndicationWithStats, UpdateIndicationPayload},
};

// GET /api/indications
#[utoipa::path(
    get,
    path = "/api/indications",
    tag = "Indications",
    responses((status = 200, description = "Links com contadores e URL pública", body = Vec<IndicationWithStats>)),
    security(("api_jwt" = []))
)]
pub async fn list_indications(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let rows = app_state
        .indication_service
        .list(&user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(rows)))
}

// POST /api/indications
#[utoipa::path(
    post,
    path = "/api/indications",
    tag = "Indications",
    request_body = CreateIndicationPayload,
    responses(
        (status = 201, description = "Link criado", body = Indication),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Limite do plano gratuito"),
        (status = 409, description = "Slug em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_indication(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateIndicationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let indication = app_state
        .indication_service
        .create(&app_state.db_pool, &user, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(indication)))
}

// PATCH /api/indications/{id}
#[utoipa::path(
    patch,
    path = "/api/indications/{id}",
    tag = "Indications",
    params(("id" = Uuid, Path, description = "ID da indicação")),
    request_body = UpdateIndicationPayload,
    responses(
        (status = 200, description = "Link atualizado", body = Indication),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_indication(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateIndicationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let indication = app_state
        .indication_service
        .update(&app_state.db_pool, user.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(indication)))
}

// DELETE /api/indications/{id}
#[utoipa::path(
    delete,
    path = "/api/indications/{id}",
    tag = "Indications",
    params(("id" = Uuid, Path, description = "ID da indicação")),
    responses((status = 204, description = "Link removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_indication(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .indication_service
        .delete(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/indications/{id}/qrcode
#[utoipa::path(
    get,
    path = "/api/indications/{id}/qrcode",
    tag = "Indications",
    params(("id" = Uuid, Path, description = "ID da indicação")),
    responses((status = 200, description = "QR code do link público", content_type = "image/svg+xml", body = String)),
    security(("api_jwt" = []))
)]
pub async fn get_qrcode(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let svg = app_state
        .indication_service
        .qrcode_svg(&app_state.db_pool, &user, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "image/svg+xml")], svg))
}
