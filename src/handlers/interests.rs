// src/handlers/interests.rs
// Opções de interesse do formulário de lead (configuráveis por médico).

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
    models::interest::{CreateInterestPayload, InterestOption},
};

// GET /api/interest-options
#[utoipa::path(
    get,
    path = "/api/interest-options",
    tag = "Interests",
    responses((status = 200, description = "Opções de interesse", body = Vec<InterestOption>)),
    security(("api_jwt" = []))
)]
pub async fn list_interests(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let options = app_state
        .interest_repo
        .list(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(options)))
}

// POST /api/interest-options
#[utoipa::path(
    post,
    path = "/api/interest-options",
    tag = "Interests",
    request_body = CreateInterestPayload,
    responses(
        (status = 201, description = "Opção criada", body = InterestOption),
        (status = 409, description = "Opção já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_interest(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateInterestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let option = app_state
        .interest_repo
        .create(user.id, payload.label.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(option)))
}

// DELETE /api/interest-options/{id}
#[utoipa::path(
    delete,
    path = "/api/interest-options/{id}",
    tag = "Interests",
    params(("id" = Uuid, Path, description = "ID da opção")),
    responses((status = 204, description = "Opção removida")),
    security(("api_jwt" = []))
)]
pub async fn delete_interest(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .interest_repo
        .delete(user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
