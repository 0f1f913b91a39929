// src/db/interest_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::interest::InterestOption,
};

#[derive(Clone)]
pub struct InterestRepository {
    pool: PgPool,
}

impl InterestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<InterestOption>, AppError> {
        let options = sqlx::query_as::<_, InterestOption>(
            "SELECT * FROM interest_options WHERE user_id = $1 ORDER BY label ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(options)
    }

    pub async fn create(&self, user_id: Uuid, label: &str) -> Result<InterestOption, AppError> {
        sqlx::query_as::<_, InterestOption>(
            "INSERT INTO interest_options (user_id, label) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(label)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::UniqueConstraintViolation(label.to_string())))
    }

    // Só apaga opções do próprio usuário
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM interest_options WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("interest_option"));
        }
        Ok(())
    }
}
