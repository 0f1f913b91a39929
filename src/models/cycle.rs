// src/models/cycle.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Ciclo de hábitos (ex: "Março saudável", 30 dias, 3 hábitos)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub habits: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CycleCheckin {
    pub cycle_id: Uuid,
    pub habit: String,
    pub day: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCyclePayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub habits: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleCheckinPayload {
    pub habit: String,
    pub day: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleCheckinResponse {
    pub habit: String,
    pub day: NaiveDate,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HabitProgress {
    pub habit: String,
    pub done_days: i64,
    pub total_days: i64,
    // 0..=100
    pub percent: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CycleProgress {
    pub cycle_id: Uuid,
    pub total_days: i64,
    pub habits: Vec<HabitProgress>,
    pub overall_percent: f64,
}
