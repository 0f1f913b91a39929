// src/db/page_repo.rs

use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::page::{Page, PageBlock, SocialLink},
};

// Campos graváveis de uma página (já validados pelo serviço)
pub struct PageFields<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub bio: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub layout: &'a str,
    pub theme_color: Option<&'a str>,
    pub is_published: bool,
    pub blocks: &'a [PageBlock],
    pub social_links: &'a [SocialLink],
}

#[derive(Clone)]
pub struct PageRepository {
    pool: PgPool,
}

impl PageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Page>, AppError> {
        let pages = sqlx::query_as::<_, Page>("SELECT * FROM pages WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(pages)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Page>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let page = sqlx::query_as::<_, Page>("SELECT * FROM pages WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(page)
    }

    pub async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError> {
        let page = sqlx::query_as::<_, Page>("SELECT * FROM pages WHERE slug = $1 AND is_published")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(page)
    }

    pub async fn slugs_like<'e, E>(&self, executor: E, base: &str) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slugs = sqlx::query_scalar::<_, String>("SELECT slug FROM pages WHERE slug = $1 OR slug LIKE $1 || '-%'")
            .bind(base)
            .fetch_all(executor)
            .await?;
        Ok(slugs)
    }

    pub async fn insert<'e, E>(&self, executor: E, user_id: Uuid, fields: &PageFields<'_>) -> Result<Page, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Page>(
            r#"
            INSERT INTO pages (
                user_id, slug, title, bio, avatar_url, layout, theme_color,
                is_published, blocks, social_links
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(fields.slug)
        .bind(fields.title)
        .bind(fields.bio)
        .bind(fields.avatar_url)
        .bind(fields.layout)
        .bind(fields.theme_color)
        .bind(fields.is_published)
        .bind(Json(fields.blocks))
        .bind(Json(fields.social_links))
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::SlugAlreadyExists(fields.slug.to_string())))
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, fields: &PageFields<'_>) -> Result<Page, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Page>(
            r#"
            UPDATE pages SET
                slug = $2, title = $3, bio = $4, avatar_url = $5, layout = $6,
                theme_color = $7, is_published = $8, blocks = $9, social_links = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.slug)
        .bind(fields.title)
        .bind(fields.bio)
        .bind(fields.avatar_url)
        .bind(fields.layout)
        .bind(fields.theme_color)
        .bind(fields.is_published)
        .bind(Json(fields.blocks))
        .bind(Json(fields.social_links))
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::SlugAlreadyExists(fields.slug.to_string())))?
        .ok_or(AppError::NotFound("page"))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
