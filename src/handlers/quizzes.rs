// src/handlers/quizzes.rs

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
    models::quiz::{
        CreateQuizPayload, PublishQuizPayload, Question, QuizDetail, QuizView, ReplaceQuestionsPayload,
        UpdateQuizPayload,
    },
};

// GET /api/quizzes
#[utoipa::path(
    get,
    path = "/api/quizzes",
    tag = "Quizzes",
    responses((status = 200, description = "Quizzes do médico", body = Vec<QuizView>)),
    security(("api_jwt" = []))
)]
pub async fn list_quizzes(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let quizzes = app_state
        .quiz_service
        .list(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(quizzes)))
}

// POST /api/quizzes
#[utoipa::path(
    post,
    path = "/api/quizzes",
    tag = "Quizzes",
    request_body = CreateQuizPayload,
    responses(
        (status = 201, description = "Quiz criado (não publicado)", body = QuizView),
        (status = 409, description = "Slug em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quiz(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateQuizPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let quiz = app_state
        .quiz_service
        .create(&app_state.db_pool, user.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(app_state.quiz_service.view(quiz))))
}

// GET /api/quizzes/{id}
#[utoipa::path(
    get,
    path = "/api/quizzes/{id}",
    tag = "Quizzes",
    params(("id" = Uuid, Path, description = "ID do quiz")),
    responses(
        (status = 200, description = "Quiz com perguntas em ordem", body = QuizDetail),
        (status = 403, description = "Quiz de outro médico"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quiz(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .quiz_service
        .get_detail(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// PATCH /api/quizzes/{id}
#[utoipa::path(
    patch,
    path = "/api/quizzes/{id}",
    tag = "Quizzes",
    params(("id" = Uuid, Path, description = "ID do quiz")),
    request_body = UpdateQuizPayload,
    responses((status = 200, description = "Quiz atualizado", body = QuizView)),
    security(("api_jwt" = []))
)]
pub async fn update_quiz(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuizPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let quiz = app_state
        .quiz_service
        .update(&app_state.db_pool, user.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(app_state.quiz_service.view(quiz))))
}

// DELETE /api/quizzes/{id}
#[utoipa::path(
    delete,
    path = "/api/quizzes/{id}",
    tag = "Quizzes",
    params(("id" = Uuid, Path, description = "ID do quiz")),
    responses((status = 204, description = "Quiz removido")),
    security(("api_jwt" = []))
)]
pub async fn delete_quiz(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .quiz_service
        .delete(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/quizzes/{id}/questions
#[utoipa::path(
    put,
    path = "/api/quizzes/{id}/questions",
    tag = "Quizzes",
    params(("id" = Uuid, Path, description = "ID do quiz")),
    request_body = ReplaceQuestionsPayload,
    responses(
        (status = 200, description = "Perguntas substituídas", body = Vec<Question>),
        (status = 400, description = "Pergunta inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn replace_questions(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReplaceQuestionsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let questions = app_state
        .quiz_service
        .replace_questions(&app_state.db_pool, user.id, id, &payload.questions)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(questions)))
}

// PATCH /api/quizzes/{id}/publish
#[utoipa::path(
    patch,
    path = "/api/quizzes/{id}/publish",
    tag = "Quizzes",
    params(("id" = Uuid, Path, description = "ID do quiz")),
    request_body = PublishQuizPayload,
    responses((status = 200, description = "Publicação alterada", body = QuizView)),
    security(("api_jwt" = []))
)]
pub async fn publish_quiz(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PublishQuizPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let quiz = app_state
        .quiz_service
        .set_published(&app_state.db_pool, user.id, id, payload.is_published)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(app_state.quiz_service.view(quiz))))
}
