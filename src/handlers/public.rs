// src/handlers/public.rs
// Rotas abertas: páginas, quizzes e links de indicação vistos pelo paciente.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        lead::{CreateLeadPayload, LeadUpsertResponse, Utm},
        page::PageView,
        quiz::{QuizDetail, QuizSubmissionPayload, QuizSubmissionResponse},
    },
};

// GET /api/public/pages/{slug}
#[utoipa::path(
    get,
    path = "/api/public/pages/{slug}",
    tag = "Public",
    params(("slug" = String, Path, description = "Slug da página")),
    responses(
        (status = 200, description = "Página publicada", body = PageView),
        (status = 404, description = "Inexistente ou em rascunho")
    )
)]
pub async fn get_page(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .page_service
        .get_public(&slug)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let public_url = app_state.page_service.public_url(&page.slug);
    Ok((StatusCode::OK, Json(PageView { page, public_url })))
}

// GET /api/public/quizzes/{slug}
#[utoipa::path(
    get,
    path = "/api/public/quizzes/{slug}",
    tag = "Public",
    params(("slug" = String, Path, description = "Slug do quiz")),
    responses(
        (status = 200, description = "Quiz publicado com perguntas", body = QuizDetail),
        (status = 404, description = "Inexistente ou não publicado")
    )
)]
pub async fn get_quiz(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .quiz_service
        .get_public(&app_state.db_pool, &slug)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// POST /api/public/quizzes/{slug}/submit
#[utoipa::path(
    post,
    path = "/api/public/quizzes/{slug}/submit",
    tag = "Public",
    params(("slug" = String, Path, description = "Slug do quiz")),
    request_body = QuizSubmissionPayload,
    responses(
        (status = 201, description = "Respostas gravadas", body = QuizSubmissionResponse),
        (status = 400, description = "Contato ou resposta inválida"),
        (status = 404, description = "Quiz não publicado")
    )
)]
pub async fn submit_quiz(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(slug): Path<String>,
    Json(payload): Json<QuizSubmissionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let response = app_state
        .quiz_service
        .submit(&app_state.db_pool, &slug, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("📝 Quiz respondido: {} (lead {})", slug, response.lead_id);
    Ok((StatusCode::CREATED, Json(response)))
}

// GET /api/public/indications/{slug}/click
// Registra o clique com as UTMs e redireciona para o destino do link.
#[utoipa::path(
    get,
    path = "/api/public/indications/{slug}/click",
    tag = "Public",
    params(
        ("slug" = String, Path, description = "Slug da indicação"),
        ("utm_source" = Option<String>, Query, description = "Origem"),
        ("utm_medium" = Option<String>, Query, description = "Mídia"),
        ("utm_campaign" = Option<String>, Query, description = "Campanha")
    ),
    responses(
        (status = 307, description = "Redireciona para o destino"),
        (status = 404, description = "Link inexistente")
    )
)]
pub async fn click(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(slug): Path<String>,
    Query(utm): Query<Utm>,
) -> Result<impl IntoResponse, ApiError> {
    let target = app_state
        .indication_service
        .click(&app_state.db_pool, &slug, &utm)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Redirect::temporary(&target))
}

// POST /api/public/indications/{slug}/leads
#[utoipa::path(
    post,
    path = "/api/public/indications/{slug}/leads",
    tag = "Public",
    params(("slug" = String, Path, description = "Slug da indicação")),
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = LeadUpsertResponse),
        (status = 200, description = "Telefone já existente: lead atualizado", body = LeadUpsertResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Link inexistente")
    )
)]
pub async fn capture_lead(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(slug): Path<String>,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .indication_service
        .capture_lead(&app_state.db_pool, &slug, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let status = if response.created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(response)))
}
