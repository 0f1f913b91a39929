// src/db/cycle_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::cycle::{Cycle, CycleCheckin},
};

#[derive(Clone)]
pub struct CycleRepository {
    pool: PgPool,
}

impl CycleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Cycle>, AppError> {
        let cycles = sqlx::query_as::<_, Cycle>(
            "SELECT * FROM cycles WHERE user_id = $1 ORDER BY start_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(cycles)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Cycle>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cycle = sqlx::query_as::<_, Cycle>("SELECT * FROM cycles WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(cycle)
    }

    pub async fn insert(
        &self,
        user_id: Uuid,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        habits: &[String],
    ) -> Result<Cycle, AppError> {
        let cycle = sqlx::query_as::<_, Cycle>(
            r#"
            INSERT INTO cycles (user_id, name, start_date, end_date, habits)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(start_date)
        .bind(end_date)
        .bind(habits)
        .fetch_one(&self.pool)
        .await?;
        Ok(cycle)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM cycles WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_checkins<'e, E>(&self, executor: E, cycle_id: Uuid) -> Result<Vec<CycleCheckin>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let checkins = sqlx::query_as::<_, CycleCheckin>(
            "SELECT cycle_id, habit, day FROM cycle_checkins WHERE cycle_id = $1 ORDER BY day ASC, habit ASC",
        )
        .bind(cycle_id)
        .fetch_all(executor)
        .await?;
        Ok(checkins)
    }

    /// Marca ou desmarca o hábito no dia. Retorna `true` se ficou marcado.
    pub async fn toggle_checkin(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cycle_id: Uuid,
        habit: &str,
        day: NaiveDate,
    ) -> Result<bool, AppError> {
        let removed = sqlx::query("DELETE FROM cycle_checkins WHERE cycle_id = $1 AND habit = $2 AND day = $3")
            .bind(cycle_id)
            .bind(habit)
            .bind(day)
            .execute(&mut **tx)
            .await?;

        if removed.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query("INSERT INTO cycle_checkins (cycle_id, habit, day) VALUES ($1, $2, $3)")
            .bind(cycle_id)
            .bind(habit)
            .bind(day)
            .execute(&mut **tx)
            .await?;

        Ok(true)
    }
}
