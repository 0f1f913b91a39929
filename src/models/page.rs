// src/models/page.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::text::validate_slug;

// A palavra que o usuário precisa digitar para excluir uma página
pub const DELETE_CONFIRMATION: &str = "excluir";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockKind {
    Button,
    Form,
}

// Um bloco da página de links. A ordem no array é a ordem na tela.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageBlock {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub kind: BlockKind,
    #[schema(example = "Agende sua consulta")]
    pub label: String,
    // Obrigatório para BUTTON
    #[schema(example = "https://wa.me/5511999998888")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    #[schema(example = "instagram")]
    pub network: String,
    #[schema(example = "https://instagram.com/dra.ana")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(example = "dra-ana")]
    pub slug: String,
    pub title: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    #[schema(example = "list")]
    pub layout: String,
    #[schema(example = "#0F766E")]
    pub theme_color: Option<String>,
    pub is_published: bool,
    #[schema(value_type = Vec<PageBlock>)]
    pub blocks: Json<Vec<PageBlock>>,
    #[schema(value_type = Vec<SocialLink>)]
    pub social_links: Json<Vec<SocialLink>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePagePayload {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub layout: Option<String>,
    pub theme_color: Option<String>,
    #[serde(default)]
    pub blocks: Vec<PageBlock>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

// PUT substitui a página inteira (blocos inclusive)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePagePayload {
    #[validate(length(min = 1, message = "required"))]
    pub title: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub layout: String,
    pub theme_color: Option<String>,
    pub is_published: bool,
    pub blocks: Vec<PageBlock>,
    pub social_links: Vec<SocialLink>,
}

// DELETE /api/pages/{id}?confirmation=excluir
#[derive(Debug, Default, Deserialize)]
pub struct DeletePageQuery {
    pub confirmation: Option<String>,
}

// Página com o link público já montado
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    #[serde(flatten)]
    pub page: Page,
    #[schema(example = "https://app.clinica.com/p/dra-ana")]
    pub public_url: String,
}
