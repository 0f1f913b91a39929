// src/models/quiz.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::text::validate_slug, models::lead::Utm};

// Mapeia o CREATE TYPE question_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "question_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Number,
    Select,
    Radio,
    Checkbox,
    Boolean,
    Scale,
    Date,
}

impl QuestionType {
    pub fn needs_options(&self) -> bool {
        matches!(self, QuestionType::Select | QuestionType::Radio | QuestionType::Checkbox)
    }
}

// Configuração das telas de abertura e de conclusão
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScreenConfig {
    #[schema(example = "Descubra o tratamento ideal")]
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[schema(example = "Começar")]
    pub button_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(example = "avaliacao-pele")]
    pub slug: String,
    #[schema(example = "Avaliação de pele")]
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = ScreenConfig)]
    pub opening_screen: Json<ScreenConfig>,
    #[schema(value_type = ScreenConfig)]
    pub completion_screen: Json<ScreenConfig>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub position: i32,
    #[schema(example = "Qual é o seu tipo de pele?")]
    pub prompt: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub is_required: bool,
    pub scale_min: Option<i32>,
    pub scale_max: Option<i32>,
}

// Quiz com o link público já montado
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    #[serde(flatten)]
    pub quiz: Quiz,
    #[schema(example = "https://app.clinica.com/quiz/avaliacao-pele")]
    pub public_url: String,
}

// Quiz com as perguntas em ordem
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizDetail {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub public_url: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizPayload {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub opening_screen: ScreenConfig,
    #[serde(default)]
    pub completion_screen: ScreenConfig,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizPayload {
    #[validate(length(min = 1, message = "required"))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    pub description: Option<String>,
    pub opening_screen: Option<ScreenConfig>,
    pub completion_screen: Option<ScreenConfig>,
}

// Uma pergunta no PUT /api/quizzes/{id}/questions (substitui a lista toda)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    #[validate(length(min = 1, message = "required"))]
    pub prompt: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub is_required: bool,
    pub scale_min: Option<i32>,
    pub scale_max: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplaceQuestionsPayload {
    #[validate(nested)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishQuizPayload {
    pub is_published: bool,
}

// Resposta já normalizada para o tipo da pergunta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

// Dados de contato que acompanham a submissão
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    // Guardado junto da resposta (o lead não tem e-mail)
    #[schema(example = "maria@exemplo.com")]
    pub email: Option<String>,
}

// POST /api/public/quizzes/{slug}/submit
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmissionPayload {
    #[serde(default)]
    pub contact: QuizContact,
    // id da pergunta -> valor cru do formulário
    #[serde(default)]
    #[schema(value_type = Object)]
    pub answers: HashMap<Uuid, Value>,
    // Indicação que trouxe o visitante (?ref=)
    pub indication_slug: Option<String>,
    #[serde(default)]
    pub utm: Utm,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmissionResponse {
    pub lead_id: Uuid,
    pub created: bool,
    pub completion_screen: ScreenConfig,
}
