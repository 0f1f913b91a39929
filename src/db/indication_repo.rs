// src/db/indication_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::indication::{Indication, IndicationKind, IndicationWithStats, PublicIndication},
};

#[derive(Clone)]
pub struct IndicationRepository {
    pool: PgPool,
}

impl IndicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista com os contadores de leads e eventos de cada link
    pub async fn list_with_stats(&self, user_id: Uuid) -> Result<Vec<IndicationWithStats>, AppError> {
        let rows = sqlx::query_as::<_, IndicationWithStats>(
            r#"
            SELECT
                i.*,
                (SELECT COUNT(*) FROM leads l WHERE l.indication_id = i.id) AS lead_count,
                (SELECT COUNT(*) FROM events e WHERE e.indication_id = i.id) AS event_count
            FROM indications i
            WHERE i.user_id = $1
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Indication>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let indication = sqlx::query_as::<_, Indication>("SELECT * FROM indications WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(indication)
    }

    // Busca pública (clique no link, formulário de captura)
    pub async fn find_public_by_slug(&self, slug: &str) -> Result<Option<PublicIndication>, AppError> {
        let row = sqlx::query_as::<_, PublicIndication>(
            r#"
            SELECT
                i.*,
                u.slug AS owner_slug,
                q.slug AS quiz_slug,
                p.slug AS page_slug
            FROM indications i
            JOIN users u ON u.id = i.user_id
            LEFT JOIN quizzes q ON q.id = i.quiz_id
            LEFT JOIN pages p ON p.id = i.page_id
            WHERE i.slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Trava a linha do médico até o fim da transação, serializando
    /// criações concorrentes contra o limite do plano.
    pub async fn lock_owner<'e, E>(&self, executor: E, user_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(executor)
            .await?;
        Ok(())
    }

    pub async fn count_by_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM indications WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    pub async fn slugs_like<'e, E>(&self, executor: E, base: &str) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slugs = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM indications WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(base)
        .fetch_all(executor)
        .await?;
        Ok(slugs)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        slug: &str,
        name: &str,
        kind: IndicationKind,
        quiz_id: Option<Uuid>,
        page_id: Option<Uuid>,
    ) -> Result<Indication, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Indication>(
            r#"
            INSERT INTO indications (user_id, slug, name, kind, quiz_id, page_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(slug)
        .bind(name)
        .bind(kind)
        .bind(quiz_id)
        .bind(page_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::SlugAlreadyExists(slug.to_string())))
    }

    // Grava o estado completo já resolvido pelo serviço
    pub async fn update<'e, E>(&self, executor: E, indication: &Indication) -> Result<Indication, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Indication>(
            r#"
            UPDATE indications SET
                slug = $2, name = $3, kind = $4, quiz_id = $5, page_id = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(indication.id)
        .bind(&indication.slug)
        .bind(&indication.name)
        .bind(indication.kind)
        .bind(indication.quiz_id)
        .bind(indication.page_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::SlugAlreadyExists(indication.slug.clone())))?
        .ok_or(AppError::NotFound("indication"))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM indications WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
