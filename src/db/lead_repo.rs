// src/db/lead_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Executor, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{Lead, LeadStatus, NewLead},
    services::pipeline::StatusStore,
};

#[derive(FromRow)]
struct LeadUpsertRow {
    #[sqlx(flatten)]
    lead: Lead,
    created: bool,
}

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        status: Option<LeadStatus>,
        search: Option<&str>,
    ) -> Result<Vec<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let leads = sqlx::query_as::<_, Lead>(
            r#"
            SELECT * FROM leads
            WHERE user_id = $1
              AND ($2::lead_status IS NULL OR status = $2)
              AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%' OR phone LIKE '%' || $3 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(search)
        .fetch_all(executor)
        .await?;

        Ok(leads)
    }

    // Sem filtro de dono: o serviço decide entre 404 e 403
    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(lead)
    }

    /// Cria o lead ou, se o telefone já existe para este médico, atualiza o existente.
    /// Retorna `(lead, criado?)`.
    pub async fn upsert_by_phone<'e, E>(&self, executor: E, new_lead: &NewLead) -> Result<(Lead, bool), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, LeadUpsertRow>(
            r#"
            INSERT INTO leads (
                user_id, indication_id, name, phone, interest, status,
                appointment_date, medical_notes,
                utm_source, utm_medium, utm_campaign, utm_term, utm_content
            )
            VALUES ($1, $2, $3, $4, $5, COALESCE($6::lead_status, 'Novo'::lead_status),
                    $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (user_id, phone) DO UPDATE SET
                name = EXCLUDED.name,
                indication_id = COALESCE(EXCLUDED.indication_id, leads.indication_id),
                interest = COALESCE(EXCLUDED.interest, leads.interest),
                status = COALESCE($6::lead_status, leads.status),
                appointment_date = COALESCE(EXCLUDED.appointment_date, leads.appointment_date),
                medical_notes = COALESCE(EXCLUDED.medical_notes, leads.medical_notes),
                utm_source = COALESCE(EXCLUDED.utm_source, leads.utm_source),
                utm_medium = COALESCE(EXCLUDED.utm_medium, leads.utm_medium),
                utm_campaign = COALESCE(EXCLUDED.utm_campaign, leads.utm_campaign),
                utm_term = COALESCE(EXCLUDED.utm_term, leads.utm_term),
                utm_content = COALESCE(EXCLUDED.utm_content, leads.utm_content),
                updated_at = NOW()
            RETURNING *, (xmax = 0) AS created
            "#,
        )
        .bind(new_lead.user_id)
        .bind(new_lead.indication_id)
        .bind(&new_lead.name)
        .bind(&new_lead.phone)
        .bind(&new_lead.interest)
        .bind(new_lead.status)
        .bind(new_lead.appointment_date)
        .bind(&new_lead.medical_notes)
        .bind(&new_lead.utm.utm_source)
        .bind(&new_lead.utm.utm_medium)
        .bind(&new_lead.utm.utm_campaign)
        .bind(&new_lead.utm.utm_term)
        .bind(&new_lead.utm.utm_content)
        .fetch_one(executor)
        .await?;

        Ok((row.lead, row.created))
    }

    // Atualização parcial (campos None ficam como estão)
    #[allow(clippy::too_many_arguments)]
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
        interest: Option<&str>,
        status: Option<LeadStatus>,
        appointment_date: Option<DateTime<Utc>>,
        medical_notes: Option<&str>,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                interest = COALESCE($4, interest),
                status = COALESCE($5::lead_status, status),
                appointment_date = COALESCE($6, appointment_date),
                medical_notes = COALESCE($7, medical_notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(interest)
        .bind(status)
        .bind(appointment_date)
        .bind(medical_notes)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            crate::common::error::map_unique_violation(e, || {
                AppError::UniqueConstraintViolation(phone.unwrap_or_default().to_string())
            })
        })?
        .ok_or(AppError::NotFound("lead"))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

// O quadro kanban de leads grava direto na pool
#[async_trait]
impl StatusStore<LeadStatus> for LeadRepository {
    async fn current_status(&self, owner_id: Uuid, card_id: Uuid) -> Result<Option<LeadStatus>, AppError> {
        let status = sqlx::query_scalar::<_, LeadStatus>(
            "SELECT status FROM leads WHERE id = $1 AND user_id = $2",
        )
        .bind(card_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(status)
    }

    async fn set_status(&self, owner_id: Uuid, card_id: Uuid, status: LeadStatus) -> Result<(), AppError> {
        sqlx::query("UPDATE leads SET status = $3, updated_at = NOW() WHERE id = $1 AND user_id = $2")
            .bind(card_id)
            .bind(owner_id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
