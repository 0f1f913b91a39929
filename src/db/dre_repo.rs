// src/db/dre_repo.rs

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::dre::{CategoryTotal, DreEntry, DrePeriodQuery, NewDreEntry},
};

#[derive(Clone)]
pub struct DreRepository {
    pool: PgPool,
}

impl DreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Grava as linhas dentro da transação da importação
    pub async fn insert_many(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        entries: &[NewDreEntry],
    ) -> Result<usize, AppError> {
        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO dre_entries (user_id, entry_date, description, category, kind, amount)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(user_id)
            .bind(entry.entry_date)
            .bind(&entry.description)
            .bind(&entry.category)
            .bind(entry.kind)
            .bind(entry.amount)
            .execute(&mut **tx)
            .await?;
        }

        Ok(entries.len())
    }

    pub async fn list(&self, user_id: Uuid, period: &DrePeriodQuery) -> Result<Vec<DreEntry>, AppError> {
        let entries = sqlx::query_as::<_, DreEntry>(
            r#"
            SELECT * FROM dre_entries
            WHERE user_id = $1
              AND ($2::date IS NULL OR entry_date >= $2)
              AND ($3::date IS NULL OR entry_date <= $3)
            ORDER BY entry_date ASC, created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(period.from)
        .bind(period.to)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn totals_by_category(&self, user_id: Uuid, period: &DrePeriodQuery) -> Result<Vec<CategoryTotal>, AppError> {
        let totals = sqlx::query_as::<_, CategoryTotal>(
            r#"
            SELECT category, kind, SUM(amount) AS total
            FROM dre_entries
            WHERE user_id = $1
              AND ($2::date IS NULL OR entry_date >= $2)
              AND ($3::date IS NULL OR entry_date <= $3)
            GROUP BY category, kind
            ORDER BY kind ASC, total DESC
            "#,
        )
        .bind(user_id)
        .bind(period.from)
        .bind(period.to)
        .fetch_all(&self.pool)
        .await?;
        Ok(totals)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM dre_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("dre_entry"));
        }
        Ok(())
    }
}
