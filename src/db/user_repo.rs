use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::User,
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Slugs já usados que começam com a base (para gerar "base-2", "base-3"...)
    pub async fn slugs_like<'e, E>(&self, executor: E, base: &str) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slugs = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM users WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(base)
        .fetch_all(executor)
        .await?;
        Ok(slugs)
    }

    // Cria um novo usuário no banco de dados
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        hashed_password: &str,
        slug: &str,
        specialty: Option<&str>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, slug, specialty)
            VALUES ($1, lower($2), $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .bind(slug)
        .bind(specialty)
        .fetch_one(executor)
        .await
        .map_err(|e| map_user_conflict(e, slug))
    }

    // Atualização parcial do perfil (campos None ficam como estão)
    pub async fn update_profile<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        specialty: Option<&str>,
        image: Option<&str>,
        slug: Option<&str>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                specialty = COALESCE($3, specialty),
                image = COALESCE($4, image),
                slug = COALESCE($5, slug),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(specialty)
        .bind(image)
        .bind(slug)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_user_conflict(e, slug.unwrap_or_default()))?
        .ok_or(AppError::UserNotFound)
    }
}

// Converte erro de violação de chave única em um erro mais amigável
fn map_user_conflict(e: sqlx::Error, slug: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_slug_key") => AppError::SlugAlreadyExists(slug.to_string()),
                _ => AppError::EmailAlreadyExists,
            };
        }
    }
    AppError::DatabaseError(e)
}
