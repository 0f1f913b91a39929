// src/models/outbound.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::pipeline::PipelineStatus;

// --- ENUMS ---

// Funil de prospecção ativa. Vocabulário próprio, independente do LeadStatus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "outbound_status")]
pub enum OutboundStatus {
    #[default]
    #[sqlx(rename = "prospectado")]
    #[serde(rename = "prospectado")]
    Prospectado,
    #[sqlx(rename = "contatado")]
    #[serde(rename = "contatado")]
    Contatado,
    #[sqlx(rename = "respondeu")]
    #[serde(rename = "respondeu")]
    Respondeu,
    #[sqlx(rename = "reunião agendada")]
    #[serde(rename = "reunião agendada")]
    ReuniaoAgendada,
    #[sqlx(rename = "fechado")]
    #[serde(rename = "fechado")]
    Fechado,
    #[sqlx(rename = "upgrade lead")]
    #[serde(rename = "upgrade lead")]
    UpgradeLead,
}

impl PipelineStatus for OutboundStatus {
    const COLUMNS: &'static [Self] = &[
        OutboundStatus::Prospectado,
        OutboundStatus::Contatado,
        OutboundStatus::Respondeu,
        OutboundStatus::ReuniaoAgendada,
        OutboundStatus::Fechado,
        OutboundStatus::UpgradeLead,
    ];

    fn label(&self) -> &'static str {
        match self {
            OutboundStatus::Prospectado => "prospectado",
            OutboundStatus::Contatado => "contatado",
            OutboundStatus::Respondeu => "respondeu",
            OutboundStatus::ReuniaoAgendada => "reunião agendada",
            OutboundStatus::Fechado => "fechado",
            OutboundStatus::UpgradeLead => "upgrade lead",
        }
    }
}

// Mapeia o CREATE TYPE contact_note_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contact_note_type")]
pub enum ContactNoteType {
    #[sqlx(rename = "ligação")]
    #[serde(rename = "ligação")]
    Ligacao,
    #[sqlx(rename = "whatsapp")]
    #[serde(rename = "whatsapp")]
    Whatsapp,
    #[sqlx(rename = "email")]
    #[serde(rename = "email")]
    Email,
    #[sqlx(rename = "reunião")]
    #[serde(rename = "reunião")]
    Reuniao,
    #[sqlx(rename = "anotação")]
    #[serde(rename = "anotação")]
    Anotacao,
}

// --- CONTATO ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutboundContact {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(example = "Clínica Bem Estar")]
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[schema(example = "@clinicabemestar")]
    pub instagram: Option<String>,
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub status: OutboundStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactNote {
    pub id: Uuid,
    pub outbound_id: Uuid,
    pub note_type: ContactNoteType,
    #[schema(example = "Pediu para retornar na segunda.")]
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// Contato com o histórico de interações
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutboundDetail {
    #[serde(flatten)]
    pub contact: OutboundContact,
    pub notes: Vec<ContactNote>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutboundPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutboundPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub instagram: Option<String>,
    pub specialty: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotePayload {
    pub note_type: ContactNoteType,
    #[validate(length(min = 1, message = "required"))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutboundBoardColumn {
    pub index: usize,
    pub status: OutboundStatus,
    pub contacts: Vec<OutboundContact>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_vocabulary_is_independent_from_leads() {
        assert_eq!(OutboundStatus::COLUMNS.len(), 6);
        assert_eq!(OutboundStatus::parse_label("Reuniao agendada").unwrap(), OutboundStatus::ReuniaoAgendada);
        assert_eq!(OutboundStatus::parse_label("upgrade lead").unwrap(), OutboundStatus::UpgradeLead);
        // "Novo" é do funil de leads, não deste
        assert!(OutboundStatus::parse_label("Novo").is_err());
    }

    #[test]
    fn note_types_use_portuguese_labels() {
        let note: CreateNotePayload =
            serde_json::from_value(serde_json::json!({ "noteType": "ligação", "content": "Sem resposta" })).unwrap();
        assert_eq!(note.note_type, ContactNoteType::Ligacao);
    }
}
