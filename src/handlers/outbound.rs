// src/handlers/outbound.rs
// Prospecção ativa de outros profissionais (quadro próprio).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        outbound::{
            ContactNote, CreateNotePayload, CreateOutboundPayload, OutboundBoardColumn, OutboundContact,
            OutboundDetail, UpdateOutboundPayload,
        },
        pipeline::{MoveCardPayload, MoveResult, UpdateStatusPayload},
    },
};

#[derive(Debug, Deserialize)]
pub struct OutboundListQuery {
    pub status: Option<String>,
}

// GET /api/outbound
#[utoipa::path(
    get,
    path = "/api/outbound",
    tag = "Outbound",
    params(("status" = Option<String>, Query, description = "Filtra pelo status")),
    responses(
        (status = 200, description = "Contatos de prospecção", body = Vec<OutboundContact>),
        (status = 400, description = "Status desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_contacts(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<OutboundListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let contacts = app_state
        .outbound_service
        .list(&app_state.db_pool, user.id, query.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contacts)))
}

// POST /api/outbound
#[utoipa::path(
    post,
    path = "/api/outbound",
    tag = "Outbound",
    request_body = CreateOutboundPayload,
    responses(
        (status = 201, description = "Contato criado", body = OutboundContact),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateOutboundPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let contact = app_state
        .outbound_service
        .create(&app_state.db_pool, user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(contact)))
}

// GET /api/outbound/{id}
#[utoipa::path(
    get,
    path = "/api/outbound/{id}",
    tag = "Outbound",
    params(("id" = Uuid, Path, description = "ID do contato")),
    responses(
        (status = 200, description = "Contato com histórico de notas", body = OutboundDetail),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .outbound_service
        .get_detail(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// PATCH /api/outbound/{id}
#[utoipa::path(
    patch,
    path = "/api/outbound/{id}",
    tag = "Outbound",
    params(("id" = Uuid, Path, description = "ID do contato")),
    request_body = UpdateOutboundPayload,
    responses((status = 200, description = "Contato atualizado", body = OutboundContact)),
    security(("api_jwt" = []))
)]
pub async fn update_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOutboundPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let contact = app_state
        .outbound_service
        .update(&app_state.db_pool, user.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(contact)))
}

// DELETE /api/outbound/{id}
#[utoipa::path(
    delete,
    path = "/api/outbound/{id}",
    tag = "Outbound",
    params(("id" = Uuid, Path, description = "ID do contato")),
    responses((status = 204, description = "Contato removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_contact(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .outbound_service
        .delete(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/outbound/{id}/notes
#[utoipa::path(
    post,
    path = "/api/outbound/{id}/notes",
    tag = "Outbound",
    params(("id" = Uuid, Path, description = "ID do contato")),
    request_body = CreateNotePayload,
    responses((status = 201, description = "Nota registrada", body = ContactNote)),
    security(("api_jwt" = []))
)]
pub async fn add_note(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateNotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let note = app_state
        .outbound_service
        .add_note(&app_state.db_pool, user.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(note)))
}

// GET /api/outbound/board
#[utoipa::path(
    get,
    path = "/api/outbound/board",
    tag = "Outbound",
    responses((status = 200, description = "Colunas do quadro, na ordem", body = Vec<OutboundBoardColumn>)),
    security(("api_jwt" = []))
)]
pub async fn get_board(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let board = app_state
        .outbound_service
        .board(&app_state.db_pool, user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(board)))
}

// PATCH /api/outbound/{id}/status
#[utoipa::path(
    patch,
    path = "/api/outbound/{id}/status",
    tag = "Outbound",
    params(("id" = Uuid, Path, description = "ID do contato")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status aplicado", body = MoveResult),
        (status = 400, description = "Status desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .outbound_service
        .set_status(&app_state.db_pool, user.id, id, &payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(result)))
}

// POST /api/outbound/board/move
#[utoipa::path(
    post,
    path = "/api/outbound/board/move",
    tag = "Outbound",
    request_body = MoveCardPayload,
    responses(
        (status = 200, description = "Card movido (ou já estava na coluna)", body = MoveResult),
        (status = 400, description = "Coluna inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn move_card(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<MoveCardPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .outbound_service
        .move_on_board(&app_state.db_pool, user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(result)))
}
