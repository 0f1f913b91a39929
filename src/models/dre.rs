// src/models/dre.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "dre_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DreKind {
    Revenue,
    Expense,
}

// Uma linha do DRE (sempre com valor positivo; o sinal vem do `kind`)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DreEntry {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    #[schema(example = "Consulta particular")]
    pub description: String,
    #[schema(example = "Consultas")]
    pub category: String,
    pub kind: DreKind,
    #[schema(example = "350.00")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

// Linha interpretada da planilha, antes de gravar
#[derive(Debug, Clone, PartialEq)]
pub struct NewDreEntry {
    pub entry_date: NaiveDate,
    pub description: String,
    pub category: String,
    pub kind: DreKind,
    pub amount: Decimal,
}

// Índice (0-based) de cada coluna da planilha
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    pub date: Option<usize>,
    pub description: Option<usize>,
    pub category: Option<usize>,
    pub amount: Option<usize>,
    // Coluna opcional com "receita"/"despesa"
    pub kind: Option<usize>,
}

// A planilha já lida pelo frontend (cabeçalho + linhas)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DreImportPayload {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    // Sem mapeamento, as colunas são deduzidas pelos nomes do cabeçalho
    pub mapping: Option<ColumnMapping>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    // Número da linha na planilha (1 = primeira linha de dados)
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DreImportReport {
    pub mapping: ColumnMapping,
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DrePeriodQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub kind: DreKind,
    pub total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DreSummary {
    pub revenue: Decimal,
    pub expenses: Decimal,
    // revenue - expenses
    pub net_result: Decimal,
    // net_result / revenue, em %
    pub margin_percent: Decimal,
    pub by_category: Vec<CategoryTotal>,
}
