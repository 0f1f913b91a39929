// src/models/indication.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::text::validate_slug;

// Mapeia o CREATE TYPE indication_kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "indication_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IndicationKind {
    #[default]
    Link,
    Chatbot,
    Quiz,
    Page,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Indication {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(example = "instagram-bio")]
    pub slug: String,
    #[schema(example = "Bio do Instagram")]
    pub name: String,
    pub kind: IndicationKind,
    pub quiz_id: Option<Uuid>,
    pub page_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Linha da listagem, com os contadores
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndicationWithStats {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub indication: Indication,
    pub lead_count: i64,
    pub event_count: i64,
    #[sqlx(skip)]
    #[schema(example = "https://app.clinica.com/dra-ana/instagram-bio")]
    pub public_url: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndicationPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    // Sem slug, ele é gerado a partir do nome
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[serde(default)]
    pub kind: IndicationKind,
    pub quiz_id: Option<Uuid>,
    pub page_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIndicationPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,
    pub kind: Option<IndicationKind>,
    pub quiz_id: Option<Uuid>,
    pub page_id: Option<Uuid>,
}

// Indicação resolvida pelo slug público, com os slugs de destino
#[derive(Debug, Clone, FromRow)]
pub struct PublicIndication {
    #[sqlx(flatten)]
    pub indication: Indication,
    pub owner_slug: String,
    pub quiz_slug: Option<String>,
    pub page_slug: Option<String>,
}
