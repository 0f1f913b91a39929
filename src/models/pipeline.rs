// src/models/pipeline.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::{error::AppError, text::slugify};

/// Vocabulário fechado de um quadro kanban.
/// A ordem de `COLUMNS` é a ordem das colunas na tela.
pub trait PipelineStatus: Copy + Eq + Send + Sync + std::fmt::Debug + 'static {
    const COLUMNS: &'static [Self];

    fn label(&self) -> &'static str;

    fn from_column(index: usize) -> Option<Self> {
        Self::COLUMNS.get(index).copied()
    }

    fn column_index(&self) -> usize {
        Self::COLUMNS
            .iter()
            .position(|status| status == self)
            .unwrap_or_default()
    }

    // Comparação sem acento e sem caixa: "nao veio" == "Não veio"
    fn parse_label(raw: &str) -> Result<Self, AppError> {
        let wanted = slugify(raw);
        Self::COLUMNS
            .iter()
            .copied()
            .find(|status| !wanted.is_empty() && slugify(status.label()) == wanted)
            .ok_or_else(|| AppError::InvalidStatus(raw.trim().to_string()))
    }
}

// PATCH /{id}/status
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusPayload {
    #[schema(example = "Agendado")]
    pub status: String,
}

// POST /board/move (o "drag end" do quadro)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardPayload {
    pub card_id: Uuid,
    #[schema(example = 1)]
    pub to_column: usize,
}

// Resultado de um movimento no quadro
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveResult {
    pub card_id: Uuid,
    pub from: String,
    pub to: String,
    pub changed: bool,
}
