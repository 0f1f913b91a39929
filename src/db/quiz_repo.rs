// src/db/quiz_repo.rs

use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::quiz::{AnswerValue, Question, QuestionInput, Quiz, ScreenConfig},
};

#[derive(Clone)]
pub struct QuizRepository {
    pool: PgPool,
}

impl QuizRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Quiz>, AppError> {
        let quizzes = sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE user_id = $1 ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(quizzes)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Quiz>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quiz = sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(quiz)
    }

    pub async fn find_published_by_slug<'e, E>(&self, executor: E, slug: &str) -> Result<Option<Quiz>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quiz = sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE slug = $1 AND is_published")
            .bind(slug)
            .fetch_optional(executor)
            .await?;
        Ok(quiz)
    }

    // Perguntas na ordem de exibição
    pub async fn list_questions<'e, E>(&self, executor: E, quiz_id: Uuid) -> Result<Vec<Question>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT * FROM quiz_questions WHERE quiz_id = $1 ORDER BY position ASC",
        )
        .bind(quiz_id)
        .fetch_all(executor)
        .await?;
        Ok(questions)
    }

    pub async fn slugs_like<'e, E>(&self, executor: E, base: &str) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let slugs = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM quizzes WHERE slug = $1 OR slug LIKE $1 || '-%'",
        )
        .bind(base)
        .fetch_all(executor)
        .await?;
        Ok(slugs)
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        slug: &str,
        title: &str,
        description: Option<&str>,
        opening_screen: &ScreenConfig,
        completion_screen: &ScreenConfig,
    ) -> Result<Quiz, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (user_id, slug, title, description, opening_screen, completion_screen)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(slug)
        .bind(title)
        .bind(description)
        .bind(Json(opening_screen))
        .bind(Json(completion_screen))
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::SlugAlreadyExists(slug.to_string())))
    }

    // Grava o estado completo já resolvido pelo serviço
    pub async fn update<'e, E>(&self, executor: E, quiz: &Quiz) -> Result<Quiz, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Quiz>(
            r#"
            UPDATE quizzes SET
                slug = $2, title = $3, description = $4,
                opening_screen = $5, completion_screen = $6, is_published = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(quiz.id)
        .bind(&quiz.slug)
        .bind(&quiz.title)
        .bind(&quiz.description)
        .bind(&quiz.opening_screen)
        .bind(&quiz.completion_screen)
        .bind(quiz.is_published)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::SlugAlreadyExists(quiz.slug.clone())))?
        .ok_or(AppError::NotFound("quiz"))
    }

    pub async fn delete_questions<'e, E>(&self, executor: E, quiz_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM quiz_questions WHERE quiz_id = $1")
            .bind(quiz_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn insert_question<'e, E>(
        &self,
        executor: E,
        quiz_id: Uuid,
        position: i32,
        input: &QuestionInput,
    ) -> Result<Question, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO quiz_questions (
                quiz_id, position, prompt, question_type, options, is_required, scale_min, scale_max
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(quiz_id)
        .bind(position)
        .bind(&input.prompt)
        .bind(input.question_type)
        .bind(&input.options)
        .bind(input.is_required)
        .bind(input.scale_min)
        .bind(input.scale_max)
        .fetch_one(executor)
        .await?;
        Ok(question)
    }

    pub async fn insert_response<'e, E>(
        &self,
        executor: E,
        quiz_id: Uuid,
        lead_id: Uuid,
        contact_email: Option<&str>,
        answers: &[(Uuid, AnswerValue)],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Guarda como objeto { "<id da pergunta>": valor }
        let answers: serde_json::Map<String, serde_json::Value> = answers
            .iter()
            .map(|(question_id, value)| {
                serde_json::to_value(value).map(|json| (question_id.to_string(), json))
            })
            .collect::<Result<_, _>>()
            .map_err(anyhow::Error::from)?;

        sqlx::query(
            "INSERT INTO quiz_responses (quiz_id, lead_id, contact_email, answers) VALUES ($1, $2, $3, $4)",
        )
        .bind(quiz_id)
        .bind(lead_id)
        .bind(contact_email)
        .bind(serde_json::Value::Object(answers))
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
