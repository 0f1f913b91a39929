// src/db/outbound_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::outbound::{ContactNote, ContactNoteType, OutboundContact, OutboundStatus, UpdateOutboundPayload},
    services::pipeline::StatusStore,
};

#[derive(Clone)]
pub struct OutboundRepository {
    pool: PgPool,
}

impl OutboundRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        status: Option<OutboundStatus>,
    ) -> Result<Vec<OutboundContact>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contacts = sqlx::query_as::<_, OutboundContact>(
            r#"
            SELECT * FROM outbound_contacts
            WHERE user_id = $1
              AND ($2::outbound_status IS NULL OR status = $2)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(executor)
        .await?;

        Ok(contacts)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<OutboundContact>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contact = sqlx::query_as::<_, OutboundContact>("SELECT * FROM outbound_contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(contact)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        name: &str,
        phone: Option<&str>,
        email: Option<&str>,
        instagram: Option<&str>,
        specialty: Option<&str>,
        city: Option<&str>,
        status: OutboundStatus,
    ) -> Result<OutboundContact, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contact = sqlx::query_as::<_, OutboundContact>(
            r#"
            INSERT INTO outbound_contacts (user_id, name, phone, email, instagram, specialty, city, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(instagram)
        .bind(specialty)
        .bind(city)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(contact)
    }

    // Atualização parcial (campos None ficam como estão)
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateOutboundPayload,
    ) -> Result<OutboundContact, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OutboundContact>(
            r#"
            UPDATE outbound_contacts SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                email = COALESCE($4, email),
                instagram = COALESCE($5, instagram),
                specialty = COALESCE($6, specialty),
                city = COALESCE($7, city),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.instagram)
        .bind(&payload.specialty)
        .bind(&payload.city)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound("outbound"))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM outbound_contacts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // Histórico, do mais recente para o mais antigo
    pub async fn list_notes<'e, E>(&self, executor: E, outbound_id: Uuid) -> Result<Vec<ContactNote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let notes = sqlx::query_as::<_, ContactNote>(
            "SELECT * FROM contact_notes WHERE outbound_id = $1 ORDER BY created_at DESC",
        )
        .bind(outbound_id)
        .fetch_all(executor)
        .await?;
        Ok(notes)
    }

    pub async fn add_note<'e, E>(
        &self,
        executor: E,
        outbound_id: Uuid,
        note_type: ContactNoteType,
        content: &str,
    ) -> Result<ContactNote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let note = sqlx::query_as::<_, ContactNote>(
            r#"
            INSERT INTO contact_notes (outbound_id, note_type, content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(outbound_id)
        .bind(note_type)
        .bind(content)
        .fetch_one(executor)
        .await?;
        Ok(note)
    }
}

#[async_trait]
impl StatusStore<OutboundStatus> for OutboundRepository {
    async fn current_status(&self, owner_id: Uuid, card_id: Uuid) -> Result<Option<OutboundStatus>, AppError> {
        let status = sqlx::query_scalar::<_, OutboundStatus>(
            "SELECT status FROM outbound_contacts WHERE id = $1 AND user_id = $2",
        )
        .bind(card_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(status)
    }

    async fn set_status(&self, owner_id: Uuid, card_id: Uuid, status: OutboundStatus) -> Result<(), AppError> {
        sqlx::query("UPDATE outbound_contacts SET status = $3, updated_at = NOW() WHERE id = $1 AND user_id = $2")
            .bind(card_id)
            .bind(owner_id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
