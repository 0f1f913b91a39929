// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// O erro interno de repositórios e serviços.
// Os handlers convertem em ApiError (traduzido) antes de responder.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Erros por campo com códigos (ex: respostas do quiz, blocos da página)
    #[error("Campos inválidos: {0:?}")]
    FieldErrors(HashMap<String, String>),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Slug já existe: {0}")]
    SlugAlreadyExists(String),

    #[error("Registro duplicado: {0}")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Limite do plano atingido ({0})")]
    PlanLimitReached(i64),

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Status desconhecido: {0}")]
    InvalidStatus(String),

    #[error("Coluna inexistente: {0}")]
    InvalidColumn(usize),

    #[error("Confirmação de exclusão ausente")]
    ConfirmationRequired,

    #[error("Intervalo de datas inválido")]
    InvalidDateRange,

    #[error("Colunas obrigatórias não mapeadas: {0:?}")]
    ImportMappingIncomplete(Vec<String>),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro que vai para o cliente: status + mensagem já traduzida.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    /// Status HTTP de cada variante.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::FieldErrors(_)
            | AppError::InvalidStatus(_)
            | AppError::InvalidColumn(_)
            | AppError::ConfirmationRequired
            | AppError::InvalidDateRange
            | AppError::ImportMappingIncomplete(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists
            | AppError::SlugAlreadyExists(_)
            | AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden | AppError::PlanLimitReached(_) => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro em resposta traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status_code();
        let lang = locale.0.as_str();

        let (error, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            let code = e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string());
                            store.translate(lang, &format!("field.{}", code), &[])
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                (store.translate(lang, "error.validation", &[]), Some(json!(details)))
            }
            AppError::FieldErrors(errors) => {
                let details: HashMap<&String, String> = errors
                    .iter()
                    .map(|(field, code)| (field, store.translate(lang, &format!("field.{}", code), &[])))
                    .collect();
                (store.translate(lang, "error.validation", &[]), Some(json!(details)))
            }
            AppError::EmailAlreadyExists => (store.translate(lang, "error.email_exists", &[]), None),
            AppError::SlugAlreadyExists(slug) => {
                (store.translate(lang, "error.slug_exists", &[("slug", slug.as_str())]), None)
            }
            AppError::UniqueConstraintViolation(what) => {
                (store.translate(lang, "error.duplicate", &[("value", what.as_str())]), None)
            }
            AppError::InvalidCredentials => (store.translate(lang, "error.invalid_credentials", &[]), None),
            AppError::InvalidToken => (store.translate(lang, "error.invalid_token", &[]), None),
            AppError::Forbidden => (store.translate(lang, "error.forbidden", &[]), None),
            AppError::PlanLimitReached(limit) => {
                let limit = limit.to_string();
                (store.translate(lang, "error.plan_limit", &[("limit", limit.as_str())]), None)
            }
            AppError::UserNotFound => (store.translate(lang, "error.user_not_found", &[]), None),
            AppError::NotFound(resource) => {
                let resource_name = store.translate(lang, &format!("resource.{}", resource), &[]);
                (store.translate(lang, "error.not_found", &[("resource", resource_name.as_str())]), None)
            }
            AppError::InvalidStatus(status) => {
                (store.translate(lang, "error.invalid_status", &[("status", status.as_str())]), None)
            }
            AppError::InvalidColumn(index) => {
                let index = index.to_string();
                (store.translate(lang, "error.invalid_column", &[("column", index.as_str())]), None)
            }
            AppError::ConfirmationRequired => (store.translate(lang, "error.confirmation_required", &[]), None),
            AppError::InvalidDateRange => (store.translate(lang, "error.invalid_date_range", &[]), None),
            AppError::ImportMappingIncomplete(missing) => (
                store.translate(lang, "error.import_mapping", &[]),
                Some(json!({ "missing": missing })),
            ),

            // Todos os outros viram 500. O detalhe fica só no log.
            e => {
                tracing::error!("🔥 Erro Interno do Servidor: {}", e);
                (store.translate(lang, "error.internal", &[]), None)
            }
        };

        ApiError { status, error, details }
    }
}

// Converte violação de unicidade do Postgres em erro de conflito.
pub(crate) fn map_unique_violation(e: sqlx::Error, conflict: impl FnOnce() -> AppError) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return conflict();
        }
    }
    AppError::DatabaseError(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn store() -> I18nStore {
        I18nStore::load().expect("locales embutidos devem ser válidos")
    }

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "required"))]
        name: String,
    }

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("lead").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::ConfirmationRequired.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::SlugAlreadyExists("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_is_translated_with_resource_name() {
        let api = AppError::NotFound("lead").to_api_error(&Locale("pt".into()), &store());
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Lead não encontrado.");

        let api = AppError::NotFound("lead").to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.error, "Lead not found.");
    }

    #[test]
    fn internal_errors_hide_details() {
        let api = AppError::InternalServerError(anyhow::anyhow!("segredo do banco"))
            .to_api_error(&Locale("pt".into()), &store());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("segredo"));
        assert!(api.details.is_none());
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let errors = Payload { name: String::new() }.validate().unwrap_err();
        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("detalhes por campo");
        assert_eq!(details["name"][0], "This field is required.");
    }
}
