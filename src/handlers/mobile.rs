// src/handlers/mobile.rs
// API do aplicativo: mesmas regras da web, rotas e respostas próprias.

use axum::{
    extract::{Path, Query, State},
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
    models::{
        auth::{AuthResponse, LoginUserPayload, UpdateProfilePayload, User, VerifyResponse},
        lead::{CreateLeadPayload, Lead, LeadFilter, LeadUpsertResponse, UpdateLeadPayload},
    },
};

// POST /api/mobile/auth/login
#[utoipa::path(
    post,
    path = "/api/mobile/auth/login",
    tag = "Mobile",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Token e dados do médico", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (token, user) = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("📱 Login mobile: {}", user.id);
    Ok((StatusCode::OK, Json(AuthResponse { token, user })))
}

// GET /api/mobile/auth/verify
// O guard já validou o token; aqui só devolvemos o usuário.
#[utoipa::path(
    get,
    path = "/api/mobile/auth/verify",
    tag = "Mobile",
    responses(
        (status = 200, description = "Token válido", body = VerifyResponse),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn verify(AuthenticatedUser(user): AuthenticatedUser) -> Json<VerifyResponse> {
    Json(VerifyResponse { valid: true, user })
}

// GET /api/mobile/doctor/profile
#[utoipa::path(
    get,
    path = "/api/mobile/doctor/profile",
    tag = "Mobile",
    responses((status = 200, description = "Perfil do médico", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_profile(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

// PUT /api/mobile/doctor/profile
#[utoipa::path(
    put,
    path = "/api/mobile/doctor/profile",
    tag = "Mobile",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil atualizado", body = User),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Slug em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .auth_service
        .update_profile(user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

// GET /api/mobile/doctor/leads
#[utoipa::path(
    get,
    path = "/api/mobile/doctor/leads",
    tag = "Mobile",
    params(
        ("status" = Option<String>, Query, description = "Filtra pelo status (ex: Agendado)"),
        ("search" = Option<String>, Query, description = "Busca por nome ou telefone")
    ),
    responses(
        (status = 200, description = "Leads do médico", body = Vec<Lead>),
        (status = 400, description = "Status desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<LeadFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let leads = app_state
        .lead_service
        .list(&app_state.db_pool, user.id, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(leads)))
}

// POST /api/mobile/doctor/leads
// Telefone já cadastrado atualiza o lead existente (200); novo cria (201).
#[utoipa::path(
    post,
    path = "/api/mobile/doctor/leads",
    tag = "Mobile",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = LeadUpsertResponse),
        (status = 200, description = "Lead existente atualizado", body = LeadUpsertResponse),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .lead_service
        .create_or_update(&app_state.db_pool, user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let status = if response.created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(response)))
}

// GET /api/mobile/doctor/leads/{id}
#[utoipa::path(
    get,
    path = "/api/mobile/doctor/leads/{id}",
    tag = "Mobile",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead", body = Lead),
        (status = 403, description = "Lead de outro médico"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let lead = app_state
        .lead_service
        .get_owned(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(lead)))
}

// PATCH /api/mobile/doctor/leads/{id}
#[utoipa::path(
    patch,
    path = "/api/mobile/doctor/leads/{id}",
    tag = "Mobile",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = UpdateLeadPayload,
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 403, description = "Lead de outro médico"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lead = app_state
        .lead_service
        .update(&app_state.db_pool, user.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(lead)))
}

// DELETE /api/mobile/doctor/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/mobile/doctor/leads/{id}",
    tag = "Mobile",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 204, description = "Lead removido"),
        (status = 403, description = "Lead de outro médico"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .lead_service
        .delete(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
