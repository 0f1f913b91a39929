// src/db/test_support.rs
// Banco real para os testes de integração: só roda com DATABASE_URL definida.

use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{db::UserRepository, models::auth::User};

/// Conecta e aplica as migrações; `None` quando não há banco configurado.
pub async fn database() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("DATABASE_URL definida mas inacessível");
    sqlx::migrate!().run(&pool).await.expect("migrações falharam");
    Some(pool)
}

/// Médico descartável (e-mail e slug únicos por chamada).
pub async fn new_user(pool: &PgPool) -> User {
    let tag = Uuid::new_v4().simple().to_string();
    UserRepository::new(pool.clone())
        .create_user(
            pool,
            "Dra. Teste",
            &format!("{tag}@teste.local"),
            "hash-irrelevante",
            &format!("dra-{tag}"),
            None,
        )
        .await
        .expect("falha ao criar usuário de teste")
}
