// src/db/event_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::event::{EventStatsQuery, EventTypeCount, NewEvent, UtmSourceCount},
};

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(&self, executor: E, event: &NewEvent) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO events (
                user_id, indication_id, lead_id, event_type,
                utm_source, utm_medium, utm_campaign, utm_term, utm_content
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.user_id)
        .bind(event.indication_id)
        .bind(event.lead_id)
        .bind(event.event_type)
        .bind(&event.utm.utm_source)
        .bind(&event.utm.utm_medium)
        .bind(&event.utm.utm_campaign)
        .bind(&event.utm.utm_term)
        .bind(&event.utm.utm_content)
        .execute(executor)
        .await?;

        Ok(())
    }

    // Contagem simples por tipo no período
    pub async fn count_by_type(&self, user_id: Uuid, query: &EventStatsQuery) -> Result<Vec<EventTypeCount>, AppError> {
        let counts = sqlx::query_as::<_, EventTypeCount>(
            r#"
            SELECT event_type, COUNT(*) AS total
            FROM events
            WHERE user_id = $1
              AND ($2::uuid IS NULL OR indication_id = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at < $4)
            GROUP BY event_type
            "#,
        )
        .bind(user_id)
        .bind(query.indication_id)
        .bind(query.from)
        .bind(query.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    // Leads criados por origem (utm_source)
    pub async fn leads_by_source(&self, user_id: Uuid, query: &EventStatsQuery) -> Result<Vec<UtmSourceCount>, AppError> {
        let counts = sqlx::query_as::<_, UtmSourceCount>(
            r#"
            SELECT utm_source, COUNT(*) AS total
            FROM events
            WHERE user_id = $1
              AND event_type = 'lead_create'
              AND ($2::uuid IS NULL OR indication_id = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at < $4)
            GROUP BY utm_source
            ORDER BY total DESC
            "#,
        )
        .bind(user_id)
        .bind(query.indication_id)
        .bind(query.from)
        .bind(query.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
