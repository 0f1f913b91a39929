// src/handlers/pages.rs

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
    models::page::{CreatePagePayload, DeletePageQuery, Page, PageView, UpdatePagePayload},
};

// GET /api/pages
#[utoipa::path(
    get,
    path = "/api/pages",
    tag = "Pages",
    responses((status = 200, description = "Páginas de links do médico", body = Vec<Page>)),
    security(("api_jwt" = []))
)]
pub async fn list_pages(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let pages = app_state
        .page_service
        .list(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(pages)))
}

// POST /api/pages
#[utoipa::path(
    post,
    path = "/api/pages",
    tag = "Pages",
    request_body = CreatePagePayload,
    responses(
        (status = 201, description = "Página criada (rascunho)", body = PageView),
        (status = 400, description = "Blocos inválidos"),
        (status = 409, description = "Slug em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_page(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreatePagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let page = app_state
        .page_service
        .create(&app_state.db_pool, user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let public_url = app_state.page_service.public_url(&page.slug);
    Ok((StatusCode::CREATED, Json(PageView { page, public_url })))
}

// GET /api/pages/{id}
#[utoipa::path(
    get,
    path = "/api/pages/{id}",
    tag = "Pages",
    params(("id" = Uuid, Path, description = "ID da página")),
    responses(
        (status = 200, description = "Página", body = PageView),
        (status = 403, description = "Página de outro médico"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_page(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .page_service
        .get_owned(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let public_url = app_state.page_service.public_url(&page.slug);
    Ok((StatusCode::OK, Json(PageView { page, public_url })))
}

// PUT /api/pages/{id}
#[utoipa::path(
    put,
    path = "/api/pages/{id}",
    tag = "Pages",
    params(("id" = Uuid, Path, description = "ID da página")),
    request_body = UpdatePagePayload,
    responses(
        (status = 200, description = "Página salva", body = PageView),
        (status = 400, description = "Blocos inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_page(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let page = app_state
        .page_service
        .update(&app_state.db_pool, user.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let public_url = app_state.page_service.public_url(&page.slug);
    Ok((StatusCode::OK, Json(PageView { page, public_url })))
}

// DELETE /api/pages/{id}?confirmation=excluir
#[utoipa::path(
    delete,
    path = "/api/pages/{id}",
    tag = "Pages",
    params(
        ("id" = Uuid, Path, description = "ID da página"),
        ("confirmation" = String, Query, description = "Deve ser exatamente \"excluir\"")
    ),
    responses(
        (status = 204, description = "Página excluída"),
        (status = 400, description = "Confirmação ausente ou incorreta")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_page(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DeletePageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .page_service
        .delete(&app_state.db_pool, user.id, id, query.confirmation.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
