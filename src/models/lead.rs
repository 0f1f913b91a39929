// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::pipeline::PipelineStatus;

// --- ENUMS ---

// Mapeia o CREATE TYPE lead_status do banco.
// Os rótulos são os mesmos que aparecem nas colunas do quadro.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status")]
pub enum LeadStatus {
    #[default]
    Novo,
    Agendado,
    Compareceu,
    Fechado,
    #[sqlx(rename = "Não veio")]
    #[serde(rename = "Não veio")]
    NaoVeio,
}

impl PipelineStatus for LeadStatus {
    const COLUMNS: &'static [Self] = &[
        LeadStatus::Novo,
        LeadStatus::Agendado,
        LeadStatus::Compareceu,
        LeadStatus::Fechado,
        LeadStatus::NaoVeio,
    ];

    fn label(&self) -> &'static str {
        match self {
            LeadStatus::Novo => "Novo",
            LeadStatus::Agendado => "Agendado",
            LeadStatus::Compareceu => "Compareceu",
            LeadStatus::Fechado => "Fechado",
            LeadStatus::NaoVeio => "Não veio",
        }
    }
}

// --- LEAD ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    pub indication_id: Option<Uuid>,

    #[schema(example = "Maria da Silva")]
    pub name: String,
    // Só dígitos (ver common::text::normalize_phone)
    #[schema(example = "11999998888")]
    pub phone: String,
    #[schema(example = "Botox")]
    pub interest: Option<String>,
    pub status: LeadStatus,
    pub appointment_date: Option<DateTime<Utc>>,
    pub medical_notes: Option<String>,

    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Parâmetros de atribuição que acompanham leads e eventos
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Utm {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
}

// Dados para criação (web, mobile e formulário público)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[validate(length(min = 8, message = "required"))]
    #[schema(example = "(11) 99999-8888")]
    pub phone: String,
    pub interest: Option<String>,
    // Texto livre validado contra LeadStatus
    pub status: Option<String>,
    pub appointment_date: Option<DateTime<Utc>>,
    pub medical_notes: Option<String>,
    pub indication_id: Option<Uuid>,
    #[serde(flatten)]
    pub utm: Utm,
}

// Atualização parcial (PATCH)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    #[validate(length(min = 8, message = "required"))]
    pub phone: Option<String>,
    pub interest: Option<String>,
    pub status: Option<String>,
    pub appointment_date: Option<DateTime<Utc>>,
    pub medical_notes: Option<String>,
}

// Filtro do GET /leads
#[derive(Debug, Default, Deserialize)]
pub struct LeadFilter {
    pub status: Option<String>,
    pub search: Option<String>,
}

// Lead já normalizado, pronto para gravar
#[derive(Debug, Clone)]
pub struct NewLead {
    pub user_id: Uuid,
    pub indication_id: Option<Uuid>,
    pub name: String,
    pub phone: String,
    pub interest: Option<String>,
    // None: lead novo entra como "Novo"; lead existente mantém o status
    pub status: Option<LeadStatus>,
    pub appointment_date: Option<DateTime<Utc>>,
    pub medical_notes: Option<String>,
    pub utm: Utm,
}

// Resposta do upsert por telefone
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadUpsertResponse {
    pub lead: Lead,
    pub created: bool,
}

// Uma coluna do quadro de leads
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadBoardColumn {
    pub index: usize,
    pub status: LeadStatus,
    pub leads: Vec<Lead>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip_through_parse() {
        for status in LeadStatus::COLUMNS {
            assert_eq!(LeadStatus::parse_label(status.label()).unwrap(), *status);
        }
    }

    #[test]
    fn status_parse_ignores_case_and_accents() {
        assert_eq!(LeadStatus::parse_label("nao veio").unwrap(), LeadStatus::NaoVeio);
        assert_eq!(LeadStatus::parse_label("  AGENDADO ").unwrap(), LeadStatus::Agendado);
        assert!(LeadStatus::parse_label("Perdido").is_err());
        assert!(LeadStatus::parse_label("").is_err());
    }

    #[test]
    fn columns_are_in_board_order() {
        assert_eq!(LeadStatus::from_column(0), Some(LeadStatus::Novo));
        assert_eq!(LeadStatus::from_column(4), Some(LeadStatus::NaoVeio));
        assert_eq!(LeadStatus::from_column(5), None);
        assert_eq!(LeadStatus::Compareceu.column_index(), 2);
    }

    #[test]
    fn serializes_with_portuguese_labels() {
        assert_eq!(serde_json::to_value(LeadStatus::NaoVeio).unwrap(), "Não veio");
        assert_eq!(serde_json::to_value(LeadStatus::Novo).unwrap(), "Novo");
    }

    #[test]
    fn create_payload_reads_flattened_utm() {
        let payload: CreateLeadPayload = serde_json::from_value(serde_json::json!({
            "name": "Maria",
            "phone": "11999998888",
            "utm_source": "instagram",
            "utm_campaign": "verao"
        }))
        .unwrap();
        assert_eq!(payload.utm.utm_source.as_deref(), Some("instagram"));
        assert_eq!(payload.utm.utm_campaign.as_deref(), Some("verao"));
        assert!(payload.status.is_none());
    }
}
